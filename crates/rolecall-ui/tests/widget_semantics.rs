use rolecall_core::{location_key, mutableStateOf, Applier, Composition, MutableState};
use std::rc::Rc;
use rolecall_ui::{
    composable, Button, Column, Divider, Form, Heading, Image, Label, List, ListItem, Modifier,
    SemanticsRole, SemanticsTree, SubmitButton, Table, TableBody, TableCell, TableRow, Text,
    TextField, TextFieldSpec,
};

fn tree_of(composition: &Composition) -> SemanticsTree {
    let root = composition.root().expect("composition has a root");
    let applier = composition.applier();
    SemanticsTree::build(&*applier, root, None).expect("semantics tree")
}

fn names_with_role(tree: &SemanticsTree, role: SemanticsRole) -> Vec<String> {
    tree.find_all(|node| node.role == role)
        .into_iter()
        .map(|node| node.name.clone())
        .collect()
}

#[composable]
fn People(people: MutableState<Vec<&'static str>>) {
    Table(Modifier::empty(), || {
        TableBody(Modifier::empty().test_tag("people"), || {
            for person in people.value() {
                TableRow(Modifier::empty(), || {
                    TableCell(Modifier::empty(), || {
                        Text(person, Modifier::empty());
                    });
                });
            }
        });
    });
}

#[test]
fn table_rows_follow_state() {
    let people = mutableStateOf(vec!["jane", "sam"]);
    let mut composition: Composition = Composition::default();
    composition
        .render(location_key(file!(), line!(), column!()), move || {
            People(people)
        })
        .expect("render");

    let tree = tree_of(&composition);
    assert_eq!(
        names_with_role(&tree, SemanticsRole::Row),
        vec!["jane", "sam"]
    );
    let body = tree
        .find(|node| node.test_tag.as_deref() == Some("people"))
        .expect("tagged body");
    assert_eq!(body.role, SemanticsRole::RowGroup);

    people.update(|list| list.push("alex"));
    assert!(composition.process_invalid_scopes().expect("recompose"));
    let tree = tree_of(&composition);
    assert_eq!(
        names_with_role(&tree, SemanticsRole::Cell),
        vec!["jane", "sam", "alex"]
    );

    people.set(Vec::new());
    assert!(composition.process_invalid_scopes().expect("recompose"));
    let tree = tree_of(&composition);
    assert!(names_with_role(&tree, SemanticsRole::Row).is_empty());
    assert_eq!(names_with_role(&tree, SemanticsRole::Table).len(), 1);
}

#[test]
fn node_ids_are_stable_and_stale_nodes_are_removed() {
    let show_extra = mutableStateOf(true);
    let mut composition: Composition = Composition::default();
    composition
        .render(location_key(file!(), line!(), column!()), move || {
            Column(Modifier::empty(), || {
                Text("always", Modifier::empty());
                if show_extra.value() {
                    Text("extra", Modifier::empty());
                }
            });
        })
        .expect("render");

    let before = tree_of(&composition);
    let always = before.find(|node| node.text.as_deref() == Some("always")).map(|n| n.node_id);
    let node_count = composition.applier().len();

    show_extra.set(false);
    composition.process_invalid_scopes().expect("recompose");
    let after = tree_of(&composition);
    assert_eq!(
        after.find(|node| node.text.as_deref() == Some("always")).map(|n| n.node_id),
        always
    );
    let extra = after.find(|node| node.text.as_deref() == Some("extra"));
    assert!(extra.is_none());
    assert_eq!(composition.applier().len(), node_count - 1);
}

#[test]
fn accessible_names_follow_precedence() {
    let mut composition: Composition = Composition::default();
    composition
        .render(location_key(file!(), line!(), column!()), || {
            Form(Modifier::empty(), |_| {}, || {
                Label(Some("email"), Modifier::empty(), || {
                    Text("Email address", Modifier::empty());
                });
                TextField(
                    Modifier::empty().field_id("email"),
                    TextFieldSpec::new().placeholder("you@example.com"),
                    "jane@jane.com",
                    |_| {},
                );
                Label(None, Modifier::empty(), || {
                    Text("Nickname", Modifier::empty());
                    TextField(Modifier::empty(), TextFieldSpec::new(), "", |_| {});
                });
                let age = TextFieldSpec::new().label("Age");
                TextField(Modifier::empty(), age, "", |_| {});
                Button(Modifier::empty(), || {}, || {
                    Image("Delete", Modifier::empty());
                });
                Button(Modifier::empty().title("Settings"), || {}, || {});
                SubmitButton(Modifier::empty().content_description("Send"), || {
                    Text("Go", Modifier::empty());
                });
            });
        })
        .expect("render");

    let tree = tree_of(&composition);
    assert_eq!(
        names_with_role(&tree, SemanticsRole::TextBox),
        vec!["Email address", "Nickname", "Age"]
    );
    assert_eq!(
        names_with_role(&tree, SemanticsRole::Button),
        vec!["Delete", "Settings", "Send"]
    );
    let email = tree
        .find(|node| {
            node.role == SemanticsRole::TextBox && node.name == "Email address"
        })
        .expect("email field");
    assert_eq!(email.value.as_deref(), Some("jane@jane.com"));
    assert_eq!(email.placeholder.as_deref(), Some("you@example.com"));
}

#[test]
fn headings_lists_and_separators() {
    let mut composition: Composition = Composition::default();
    composition
        .render(location_key(file!(), line!(), column!()), || {
            Heading(9, Modifier::empty(), || {
                Text("Colors", Modifier::empty());
            });
            Divider(Modifier::empty());
            List(Modifier::empty(), || {
                for color in ["red", "green"] {
                    ListItem(Modifier::empty(), || {
                        Text(color, Modifier::empty());
                    });
                }
            });
        })
        .expect("render");

    let tree = tree_of(&composition);
    let heading = tree
        .find(|node| node.role == SemanticsRole::Heading)
        .expect("heading");
    assert_eq!(heading.level, Some(6));
    assert_eq!(heading.name, "Colors");
    assert_eq!(
        names_with_role(&tree, SemanticsRole::ListItem),
        vec!["red", "green"]
    );
    assert_eq!(names_with_role(&tree, SemanticsRole::Separator).len(), 1);
    assert!(tree.dump().contains("listitem"));
}

#[test]
fn text_takes_borrowed_owned_and_shared_strings() {
    let count = mutableStateOf(0u32);
    let shared: Rc<str> = Rc::from("shared");
    let mut composition: Composition = Composition::default();
    composition
        .render(location_key(file!(), line!(), column!()), move || {
            Column(Modifier::empty(), || {
                Text("borrowed", Modifier::empty());
                Text(format!("count {}", count.value()), Modifier::empty());
                Text(Rc::clone(&shared), Modifier::empty());
            });
        })
        .expect("render");

    let texts = |tree: &SemanticsTree| -> Vec<String> {
        tree.find_all(|node| node.role == SemanticsRole::Text)
            .into_iter()
            .filter_map(|node| node.text.clone())
            .collect()
    };
    assert_eq!(
        texts(&tree_of(&composition)),
        vec!["borrowed", "count 0", "shared"]
    );

    count.set(4);
    assert!(composition.process_invalid_scopes().expect("recompose"));
    assert_eq!(
        texts(&tree_of(&composition)),
        vec!["borrowed", "count 4", "shared"]
    );
}
