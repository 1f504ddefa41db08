//! Positional memoization.
//!
//! Every composable call opens a group keyed by its call site. On recomposition
//! a group is matched against the previous pass by key, in call order, and its
//! slots are handed back in the order they were written. Groups that are not
//! matched are dropped together with everything they remembered.

use crate::collections::map::HashSet;
use crate::node::Applier;
use crate::state::MutableState;
use crate::{hash_key, Key, NodeId};
use smallvec::SmallVec;
use std::any::Any;
use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;

const KEYED_GROUP_SALT: Key = 0x9e37_79b9_7f4a_7c15;

pub(crate) struct Group {
    key: Key,
    slots: Vec<Box<dyn Any>>,
    children: Vec<Group>,
}

struct Frame {
    key: Key,
    previous_slots: std::vec::IntoIter<Box<dyn Any>>,
    slots: Vec<Box<dyn Any>>,
    previous_children: Vec<Option<Group>>,
    children: Vec<Group>,
}

impl Frame {
    fn new(key: Key, previous: Option<Group>) -> Self {
        let (slots, children) = match previous {
            Some(group) => (group.slots, group.children),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            key,
            previous_slots: slots.into_iter(),
            slots: Vec::new(),
            previous_children: children.into_iter().map(Some).collect(),
            children: Vec::new(),
        }
    }

    fn take_previous_child(&mut self, key: Key) -> Option<Group> {
        self.previous_children
            .iter_mut()
            .find(|candidate| {
                candidate
                    .as_ref()
                    .is_some_and(|group| group.key == key)
            })
            .and_then(Option::take)
    }

    fn finish(self) -> Group {
        Group {
            key: self.key,
            slots: self.slots,
            children: self.children,
        }
    }
}

struct NodeSlot(NodeId);

struct StateSlot<T: 'static> {
    state: MutableState<T>,
}

impl<T: 'static> Drop for StateSlot<T> {
    fn drop(&mut self) {
        self.state.dispose();
    }
}

/// A remembered value shared between the slot table and its readers.
pub struct Owned<T>(Rc<RefCell<T>>);

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> Owned<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

/// Output of a finished composition pass.
pub(crate) struct ComposeOutcome {
    pub(crate) root_group: Option<Group>,
    pub(crate) root_children: Vec<NodeId>,
    pub(crate) emitted: HashSet<NodeId>,
    pub(crate) next_node_id: NodeId,
}

/// Per-pass composition state, installed thread-locally while content runs.
pub struct Composer {
    applier: Rc<RefCell<dyn Applier>>,
    frames: Vec<Frame>,
    parents: Vec<(NodeId, SmallVec<[NodeId; 8]>)>,
    next_node_id: NodeId,
    emitted: HashSet<NodeId>,
}

impl Composer {
    pub(crate) fn new(
        applier: Rc<RefCell<dyn Applier>>,
        root: NodeId,
        next_node_id: NodeId,
        previous_root: Option<Group>,
    ) -> Self {
        let mut base = Frame::new(0, None);
        base.previous_children = previous_root.into_iter().map(Some).collect();
        Self {
            applier,
            frames: vec![base],
            parents: vec![(root, SmallVec::new())],
            next_node_id,
            emitted: HashSet::default(),
        }
    }

    pub fn applier(&self) -> Rc<RefCell<dyn Applier>> {
        Rc::clone(&self.applier)
    }

    pub fn start_group(&mut self, key: Key) {
        let previous = self
            .frames
            .last_mut()
            .and_then(|frame| frame.take_previous_child(key));
        self.frames.push(Frame::new(key, previous));
    }

    pub fn end_group(&mut self) {
        if self.frames.len() <= 1 {
            log::error!("end_group called without a matching start_group");
            return;
        }
        if let Some(frame) = self.frames.pop() {
            let group = frame.finish();
            if let Some(parent) = self.frames.last_mut() {
                parent.children.push(group);
            }
        }
    }

    /// Pops the next slot of the current group if it holds an `S`.
    ///
    /// A slot of another type means the group changed shape; it is dropped.
    pub fn take_slot<S: 'static>(&mut self) -> Option<Box<S>> {
        let frame = self.frames.last_mut()?;
        let slot = frame.previous_slots.next()?;
        match slot.downcast::<S>() {
            Ok(slot) => Some(slot),
            Err(_) => {
                log::debug!(
                    "group {:#x}: slot type changed, expected {}",
                    frame.key,
                    std::any::type_name::<S>()
                );
                None
            }
        }
    }

    pub fn push_slot(&mut self, slot: Box<dyn Any>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.slots.push(slot);
        }
    }

    pub fn allocate_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    fn record_child(&mut self, id: NodeId) {
        self.emitted.insert(id);
        if let Some((_, children)) = self.parents.last_mut() {
            children.push(id);
        }
    }

    fn push_parent(&mut self, id: NodeId) {
        self.parents.push((id, SmallVec::new()));
    }

    fn pop_parent(&mut self) -> Option<(NodeId, SmallVec<[NodeId; 8]>)> {
        if self.parents.len() <= 1 {
            return None;
        }
        self.parents.pop()
    }

    pub(crate) fn finish(mut self) -> ComposeOutcome {
        while self.frames.len() > 1 {
            log::warn!("composition finished with an unclosed group");
            self.end_group();
        }
        let root_group = self
            .frames
            .pop()
            .and_then(|base| base.children.into_iter().next());
        let root_children = self
            .parents
            .pop()
            .map(|(_, children)| children.into_vec())
            .unwrap_or_default();
        ComposeOutcome {
            root_group,
            root_children,
            emitted: self.emitted,
            next_node_id: self.next_node_id,
        }
    }
}

thread_local! {
    static CURRENT_COMPOSER: RefCell<Option<Composer>> = const { RefCell::new(None) };
}

pub(crate) fn install_composer(composer: Composer) -> Result<(), Composer> {
    CURRENT_COMPOSER.with(|current| {
        let mut current = current.borrow_mut();
        if current.is_some() {
            return Err(composer);
        }
        *current = Some(composer);
        Ok(())
    })
}

pub(crate) fn uninstall_composer() -> Option<Composer> {
    CURRENT_COMPOSER
        .try_with(|current| {
            current
                .try_borrow_mut()
                .ok()
                .and_then(|mut composer| composer.take())
        })
        .ok()
        .flatten()
}

/// Returns true while content is being composed on this thread.
pub fn is_composing() -> bool {
    CURRENT_COMPOSER.with(|current| current.borrow().is_some())
}

/// Runs `f` against the active composer.
///
/// # Panics
///
/// Panics when called outside of a composition.
pub fn with_current_composer<R>(f: impl FnOnce(&mut Composer) -> R) -> R {
    CURRENT_COMPOSER.with(|current| {
        let mut current = current.borrow_mut();
        let composer = current
            .as_mut()
            .unwrap_or_else(|| panic!("composable called outside of a composition"));
        f(composer)
    })
}

/// Runs `content` inside a group identified by `key`.
pub fn with_group<R>(key: Key, content: impl FnOnce() -> R) -> R {
    with_current_composer(|composer| composer.start_group(key));
    let result = content();
    with_current_composer(|composer| composer.end_group());
    result
}

/// Runs `content` in a group identified by a value instead of a call site.
///
/// Use it to keep remembered state attached to data when siblings reorder.
pub fn with_key<K: Hash, R>(key: &K, content: impl FnOnce() -> R) -> R {
    with_group(hash_key(key) ^ KEYED_GROUP_SALT, content)
}

/// Returns the value remembered by this call site, creating it on first use.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Owned<T> {
    if let Some(slot) = with_current_composer(|composer| composer.take_slot::<Owned<T>>()) {
        let owned = (*slot).clone();
        with_current_composer(|composer| composer.push_slot(slot));
        return owned;
    }
    let owned = Owned::new(init());
    with_current_composer(|composer| composer.push_slot(Box::new(owned.clone())));
    owned
}

/// Remembers a state cell that lives as long as the calling group.
#[allow(non_snake_case)]
pub fn useState<T: 'static>(init: impl FnOnce() -> T) -> MutableState<T> {
    if let Some(slot) = with_current_composer(|composer| composer.take_slot::<StateSlot<T>>()) {
        let state = slot.state;
        with_current_composer(|composer| composer.push_slot(slot));
        return state;
    }
    let state = MutableState::new(init());
    with_current_composer(|composer| composer.push_slot(Box::new(StateSlot { state })));
    state
}

/// Creates a state cell that no group owns.
#[allow(non_snake_case)]
pub fn mutableStateOf<T: 'static>(value: T) -> MutableState<T> {
    MutableState::new(value)
}

/// Emits a node of type `N` at this position of the tree.
///
/// The node is created with `factory` on first composition and reused
/// afterwards; `update` runs on every pass. Nodes emitted by `content` become
/// its children, in emission order.
pub fn emit_node<N, F, U, C>(factory: F, update: U, content: C) -> NodeId
where
    N: crate::Node,
    F: FnOnce() -> N,
    U: FnOnce(&mut N),
    C: FnOnce(),
{
    let (previous, applier) = with_current_composer(|composer| {
        (composer.take_slot::<NodeSlot>(), composer.applier())
    });

    let reused = previous.map(|slot| slot.0).filter(|&id| {
        applier
            .borrow()
            .get(id)
            .map(|node| node.as_any().is::<N>())
            .unwrap_or(false)
    });
    let id = match reused {
        Some(id) => id,
        None => {
            let id = with_current_composer(|composer| composer.allocate_node_id());
            let node = factory();
            applier.borrow_mut().insert(id, Box::new(node));
            id
        }
    };

    with_current_composer(|composer| {
        composer.push_slot(Box::new(NodeSlot(id)));
        composer.record_child(id);
        composer.push_parent(id);
    });

    if let Err(err) = applier.borrow_mut().with_node::<N, ()>(id, update) {
        log::error!("failed to update node #{id}: {err}");
    }

    content();

    let children = with_current_composer(|composer| composer.pop_parent())
        .map(|(_, children)| children)
        .unwrap_or_default();
    match applier.borrow_mut().get_mut(id) {
        Ok(node) => node.update_children(&children),
        Err(err) => log::error!("failed to attach children of #{id}: {err}"),
    }
    id
}
