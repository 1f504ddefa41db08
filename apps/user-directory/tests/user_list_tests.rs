use rolecall_testing::prelude::*;
use user_directory::{User, UserList, USERS_TAG};

fn users() -> Vec<User> {
    vec![
        User::new("jane", "jane@jane.com"),
        User::new("sam", "sam@sam.com"),
    ]
}

#[test]
fn render_one_row_per_user() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| UserList(users()));

    let screen = rule.screen();
    let rows = screen
        .within(&has_test_tag(USERS_TAG))
        .and_then(|body| body.get_all(&has_role(SemanticsRole::Row)))
        .expect("rows inside the users body");
    assert_eq!(rows.len(), 2);
}

#[test]
fn render_the_email_and_name_of_each_user() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| UserList(users()));

    for user in users() {
        rule.get_by(has_role_named(SemanticsRole::Cell, user.name.as_str()))
            .assert_text_equals(&user.name);
        rule.get_by(has_role_named(SemanticsRole::Cell, user.email.as_str()))
            .assert_text_equals(&user.email);
    }
    assert_eq!(rule.get_all_by(has_role(SemanticsRole::Cell)).len(), 4);
}

#[test]
fn no_users_renders_an_empty_body() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| UserList(Vec::new()));

    rule.get_by(has_role(SemanticsRole::Table)).assert_exists();
    rule.get_by(has_test_tag(USERS_TAG)).assert_exists();
    assert!(rule.query_all_by(has_role(SemanticsRole::Row)).is_empty());
}

#[test]
fn cells_keep_text_verbatim_and_order() {
    let mut rule = ComposeTestRule::new();
    let list = vec![
        User::new("b", "b@x"),
        User::new("a", "a@x"),
        User::new("b", "b@x"),
    ];
    let rendered = list.clone();
    rule.set_content(move || UserList(rendered.clone()));

    let screen = rule.screen();
    let names: Vec<String> = screen
        .query_all(&has_role(SemanticsRole::Row))
        .into_iter()
        .map(|row| row.name.clone())
        .collect();
    assert_eq!(names, vec!["b b@x", "a a@x", "b b@x"]);
}

#[test]
fn rendering_twice_gives_the_same_tree() {
    let mut first = ComposeTestRule::new();
    first.set_content(|| UserList(users()));
    let mut second = ComposeTestRule::new();
    second.set_content(|| UserList(users()));

    let shape = |rule: &mut ComposeTestRule| -> Vec<(SemanticsRole, String, Option<String>)> {
        rule.screen()
            .tree()
            .iter()
            .map(|node| (node.role, node.name.clone(), node.test_tag.clone()))
            .collect()
    };
    assert_eq!(shape(&mut first), shape(&mut second));
    assert_eq!(
        first.dump_tree().lines().count(),
        second.dump_tree().lines().count()
    );
}
