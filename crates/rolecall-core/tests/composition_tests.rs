use rolecall_core::{
    emit_node, live_state_count, location_key, mutableStateOf, remember, useState, with_key,
    Applier, Composition, MutableState, Node, NodeError, NodeId,
};
use rolecall_macros::composable;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
struct Label {
    text: String,
    children: Vec<NodeId>,
}

impl Node for Label {
    fn children(&self) -> Vec<NodeId> {
        self.children.clone()
    }

    fn update_children(&mut self, children: &[NodeId]) {
        self.children = children.to_vec();
    }

    fn describe(&self) -> String {
        format!("Label({})", self.text)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[composable]
fn LabelNode(text: String, content: impl FnOnce()) -> NodeId {
    emit_node(
        Label::default,
        move |node: &mut Label| node.text = text,
        content,
    )
}

fn root_key() -> u64 {
    location_key(file!(), line!(), column!())
}

#[test]
fn remembered_values_survive_recomposition() {
    let inits = Rc::new(Cell::new(0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let (inits_in, seen_in) = (Rc::clone(&inits), Rc::clone(&seen));

    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            let counter = remember(|| {
                inits_in.set(inits_in.get() + 1);
                0u32
            });
            counter.update(|value| *value += 1);
            seen_in.borrow_mut().push(counter.with(|value| *value));
        })
        .expect("render");
    composition.recompose().expect("recompose");
    composition.recompose().expect("recompose");

    assert_eq!(inits.get(), 1);
    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert_eq!(composition.passes(), 3);
}

#[test]
fn state_is_released_with_its_group() {
    let show = mutableStateOf(true);
    let captured: Rc<Cell<Option<MutableState<i32>>>> = Rc::new(Cell::new(None));
    let captured_in = Rc::clone(&captured);

    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            if show.value() {
                let state = useState(|| 7);
                captured_in.set(Some(state));
            }
        })
        .expect("render");

    let state = captured.get().expect("state captured");
    assert!(state.is_alive());
    let live = live_state_count();

    show.set(false);
    assert!(composition.has_pending_recomposition());
    assert!(composition.process_invalid_scopes().expect("recompose"));
    assert!(!state.is_alive());
    assert_eq!(live_state_count(), live - 1);
    assert!(!composition.process_invalid_scopes().expect("idle"));
    show.dispose();
}

#[test]
fn keyed_groups_follow_their_key() {
    let order = mutableStateOf(vec!["a", "b"]);
    let states: Rc<RefCell<Vec<(&'static str, MutableState<String>)>>> = Rc::default();
    let states_in = Rc::clone(&states);

    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            states_in.borrow_mut().clear();
            for item in order.value() {
                with_key(&item, || {
                    let state = useState(|| format!("state of {item}"));
                    states_in.borrow_mut().push((item, state));
                });
            }
        })
        .expect("render");

    let first: Vec<_> = states.borrow().clone();
    order.set(vec!["b", "a"]);
    composition.process_invalid_scopes().expect("recompose");

    for (item, state) in states.borrow().iter() {
        let before = first
            .iter()
            .find(|(name, _)| name == item)
            .map(|(_, state)| *state);
        assert_eq!(before, Some(*state));
        assert_eq!(state.value(), format!("state of {item}"));
    }
}

#[test]
fn node_ids_are_stable_and_unemitted_nodes_removed() {
    let count = mutableStateOf(3usize);
    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            LabelNode("list".into(), || {
                for index in 0..count.value() {
                    LabelNode(format!("item {index}"), || {});
                }
            });
        })
        .expect("render");

    let root = composition.root().expect("root");
    let list = composition.applier().get(root).expect("root node").children()[0];
    let before = composition.applier().get(list).expect("list").children();
    assert_eq!(before.len(), 3);

    count.set(2);
    composition.process_invalid_scopes().expect("recompose");
    let after = composition.applier().get(list).expect("list").children();
    assert_eq!(after, before[..2].to_vec());
    assert!(!composition.applier().contains(before[2]));
    assert_eq!(composition.applier().len(), 4);

    let dump = composition.applier().dump_tree(Some(root));
    assert!(dump.starts_with(&format!("#{root} Root")));
    assert!(dump.contains("Label(item 1)"));
    count.dispose();
}

#[test]
fn reset_forgets_everything() {
    let mut composition: Composition = Composition::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = Rc::clone(&seen);
    composition
        .render(root_key(), move || {
            let clicks = useState(|| 0);
            seen_in.borrow_mut().push(clicks.value());
            if clicks.value() == 0 {
                clicks.set(1);
            }
        })
        .expect("render");
    composition.process_invalid_scopes().expect("recompose");
    composition.reset().expect("reset");

    assert_eq!(*seen.borrow(), vec![0, 1, 0]);
}

#[test]
fn nested_composition_is_rejected() {
    let result = Rc::new(RefCell::new(None));
    let result_in = Rc::clone(&result);
    let mut outer: Composition = Composition::default();
    outer
        .render(root_key(), move || {
            let mut inner: Composition = Composition::default();
            *result_in.borrow_mut() = Some(inner.render(root_key(), || {}));
        })
        .expect("outer render");

    assert_eq!(
        result.borrow_mut().take(),
        Some(Err(NodeError::AlreadyComposing))
    );
}

#[test]
fn state_changes_only_invalidate_their_readers() {
    let title = mutableStateOf(String::from("one"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in = Rc::clone(&seen);

    let mut reader: Composition = Composition::default();
    reader
        .render(root_key(), move || {
            seen_in.borrow_mut().push(title.value());
        })
        .expect("render reader");
    let mut bystander: Composition = Composition::default();
    bystander
        .render(root_key(), || {
            LabelNode("static".into(), || {});
        })
        .expect("render bystander");
    assert_ne!(reader.id(), bystander.id());
    assert_eq!(title.readers(), vec![reader.id()]);

    title.set(String::from("two"));
    assert!(!bystander.has_pending_recomposition());
    let recomposed = bystander.process_invalid_scopes().expect("bystander frame");
    assert!(!recomposed);
    assert!(reader.has_pending_recomposition());
    assert!(reader.process_invalid_scopes().expect("reader frame"));

    assert_eq!(*seen.borrow(), vec!["one", "two"]);
    assert_eq!(bystander.passes(), 1);
    title.dispose();
}

#[test]
fn states_created_during_a_pass_belong_to_it() {
    let captured: Rc<Cell<Option<MutableState<u8>>>> = Rc::default();
    let captured_in = Rc::clone(&captured);
    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            let unread = useState(|| 0u8);
            captured_in.set(Some(unread));
        })
        .expect("render");

    let unread = captured.get().expect("state captured");
    assert_eq!(unread.readers(), vec![composition.id()]);
    unread.set(1);
    assert!(composition.has_pending_recomposition());
}

#[test]
fn dropped_compositions_stop_reading() {
    let title = mutableStateOf(String::from("one"));
    let mut composition: Composition = Composition::default();
    composition
        .render(root_key(), move || {
            let _ = title.value();
        })
        .expect("render");
    assert_eq!(title.readers(), vec![composition.id()]);

    drop(composition);
    assert!(title.readers().is_empty());
    title.set(String::from("two"));
    title.dispose();
}
