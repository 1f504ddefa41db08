use rolecall_core::{mutableStateOf, useState};
use rolecall_testing::prelude::*;
use rolecall_ui::{
    composable, Button, Column, Form, Heading, Image, Label, List, ListItem, Modifier, Text,
    TextField, TextFieldSpec,
};
use web_time::Duration;

fn pattern(source: &str) -> TextMatch {
    TextMatch::regex(source).expect("valid pattern")
}

#[composable]
fn AccessibleName() {
    Column(Modifier::empty(), || {
        Button(Modifier::empty(), || {}, || {
            Text("Submit", Modifier::empty());
        });
        Button(Modifier::empty(), || {}, || {
            Text("Cancel", Modifier::empty());
        });
    });
}

#[test]
fn can_select_by_accessible_name() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| AccessibleName());

    rule.get_by(has_role_named(SemanticsRole::Button, pattern("(?i)submit")))
        .assert_exists();
    rule.get_by(has_role_named(SemanticsRole::Button, pattern("(?i)cancel")))
        .assert_exists();
}

#[composable]
fn MoreNames() {
    Column(Modifier::empty(), || {
        Label(Some("email"), Modifier::empty(), || {
            Text("Email", Modifier::empty());
        });
        let target = Modifier::empty().field_id("email");
        TextField(target, TextFieldSpec::new(), "", |_| {});

        Label(Some("search"), Modifier::empty(), || {
            Text("Search", Modifier::empty());
        });
        let target = Modifier::empty().field_id("search");
        TextField(target, TextFieldSpec::new(), "", |_| {});
    });
}

#[test]
fn shows_an_email_and_search_input() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| MoreNames());

    let email = rule
        .get_by(has_role_named(SemanticsRole::TextBox, pattern("(?i)email")))
        .node_id();
    let search_box = has_role_named(SemanticsRole::TextBox, pattern("(?i)search"));
    let search = rule.get_by(search_box).node_id();
    assert_ne!(email, search);
}

#[composable]
fn IconButtons() {
    Column(Modifier::empty(), || {
        Button(Modifier::empty().content_description("sign in"), || {}, || {
            Image("", Modifier::empty());
        });
        Button(Modifier::empty().content_description("sign out"), || {}, || {
            Image("", Modifier::empty());
        });
    });
}

#[test]
fn icon_buttons_are_named_by_their_description() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| IconButtons());

    let sign_in = has_role_named(SemanticsRole::Button, pattern("(?i)sign in"));
    let sign_in = rule.get_by(sign_in).fetch_semantics_node();
    assert_eq!(sign_in.name, "sign in");
    let sign_out = has_role_named(SemanticsRole::Button, pattern("(?i)sign out"));
    rule.get_by(sign_out).assert_exists();
}

#[composable]
fn ColorList() {
    List(Modifier::empty(), || {
        for color in ["Red", "Blue", "Green"] {
            ListItem(Modifier::empty(), || {
                Text(color, Modifier::empty());
            });
        }
    });
}

#[test]
fn get_query_and_find_a_single_node() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| ColorList());

    rule.get_by(has_role(SemanticsRole::List)).assert_exists();
    assert!(rule.query_by(has_role(SemanticsRole::List)).is_some());
    rule.find_by(has_role(SemanticsRole::List)).assert_exists();
    assert!(rule.query_by(has_role(SemanticsRole::Table)).is_none());
}

#[test]
fn get_query_and_find_all() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| ColorList());

    assert_eq!(rule.get_all_by(has_role(SemanticsRole::ListItem)).len(), 3);
    assert_eq!(
        rule.query_all_by(has_role(SemanticsRole::ListItem)).len(),
        3
    );
    assert_eq!(rule.find_all_by(has_role(SemanticsRole::ListItem)).len(), 3);
    assert!(rule.query_all_by(has_role(SemanticsRole::Row)).is_empty());

    let items = rule.get_all_by(has_role(SemanticsRole::ListItem));
    rule.node(items[1]).assert_text_equals("Blue");
}

#[test]
fn failed_queries_report_why() {
    let config = TestConfig::default()
        .with_find_timeout(Duration::from_millis(40))
        .with_find_interval(Duration::from_millis(5));
    let mut rule = ComposeTestRule::with_config(config);
    rule.set_content(|| ColorList());

    let listitem = has_role(SemanticsRole::ListItem);
    assert_eq!(
        rule.try_get_by(&listitem),
        Err(QueryError::Multiple {
            description: "has role listitem".into(),
            count: 3,
        })
    );
    assert_eq!(
        rule.try_get_by(&has_role(SemanticsRole::Table)),
        Err(QueryError::NotFound {
            description: "has role table".into(),
        })
    );
    match rule.try_find_by(&has_text("Purple")) {
        Err(QueryError::Timeout {
            description,
            waited,
        }) => {
            assert_eq!(description, "has text \"Purple\"");
            assert!(waited >= Duration::from_millis(40));
        }
        other => panic!("expected a timeout, got {other:?}"),
    }
}

#[test]
#[should_panic(expected = "unable to find a node that has role table")]
fn get_by_panics_with_the_tree() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| ColorList());
    rule.get_by(has_role(SemanticsRole::Table));
}

#[composable]
fn FormData() {
    Form(Modifier::empty().content_description("form"), |event| event.prevent_default(), || {
        Button(Modifier::empty(), || {}, || {
            Text("Save", Modifier::empty());
        });
        Button(Modifier::empty(), || {}, || {
            Text("Cancel", Modifier::empty());
        });
    });
}

#[test]
fn the_form_displays_two_buttons() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| FormData());

    assert_eq!(rule.get_all_by(has_role(SemanticsRole::Button)).len(), 2);
    rule.get_by(has_role_named(SemanticsRole::Form, "form")).assert_exists();
}

#[composable]
fn DataForm() {
    let email = useState(|| "asdf@asdf.com".to_string());
    let color = useState(String::new);
    Form(Modifier::empty(), |event| event.prevent_default(), || {
        Heading(3, Modifier::empty(), || {
            Text("Enter Data", Modifier::empty());
        });

        Column(Modifier::empty().test_tag("image-wrapper"), || {
            Image("data", Modifier::empty());
        });

        Label(Some("email"), Modifier::empty(), || {
            Text("Email", Modifier::empty());
        });
        TextField(
            Modifier::empty().field_id("email"),
            TextFieldSpec::new(),
            email.value(),
            move |value| email.set(value),
        );

        Label(Some("color"), Modifier::empty(), || {
            Text("Color", Modifier::empty());
        });
        TextField(
            Modifier::empty().field_id("color"),
            TextFieldSpec::new().placeholder("Red"),
            color.value(),
            move |value| color.set(value),
        );

        rolecall_ui::SubmitButton(Modifier::empty().title("Click when ready to submit"), || {
            Text("Submit", Modifier::empty());
        });
    });
}

#[test]
fn selecting_different_elements() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| DataForm());

    let matchers = [
        has_role(SemanticsRole::Button),
        has_text(pattern("(?i)enter")),
        has_label_text(pattern("(?i)email")),
        has_placeholder("Red"),
        has_display_value("asdf@asdf.com"),
        has_alt_text("data"),
        has_title(pattern("(?i)ready to submit")),
        has_test_tag("image-wrapper"),
    ];
    for matcher in matchers {
        rule.get_by(matcher).assert_exists();
    }

    let screen = rule.screen();
    let wrapper = screen.within(&has_test_tag("image-wrapper")).expect("wrapper");
    assert_eq!(wrapper.query_all(&has_role(SemanticsRole::Img)).len(), 1);
    let button = wrapper.query(&has_role(SemanticsRole::Button)).expect("query");
    assert!(button.is_none());
}

#[test]
fn text_inputs_update_the_displayed_value() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| DataForm());

    rule.get_by(has_label_text("Email"))
        .perform_text_replacement("")
        .perform_text_input("jane@jane.com")
        .assert_value_equals("jane@jane.com");
    rule.get_by(has_placeholder("Red"))
        .perform_text_input("Blue")
        .assert_value_equals("Blue");
    rule.get_by(is_focused()).assert_value_equals("Blue");

    rule.get_by(has_role(SemanticsRole::Button)).perform_click();
    rule.get_by(has_placeholder("Red")).perform_ime_action();
    assert_eq!(rule.navigation_count(), 0);
    rule.get_by(has_display_value("jane@jane.com")).assert_exists();
}

#[composable]
fn RepositoriesSummary(language: &'static str, stars: u32, forks: u32, open_issues: u32) {
    Column(Modifier::empty(), || {
        Text(language, Modifier::empty());
        Text(stars.to_string(), Modifier::empty());
        Text(forks.to_string(), Modifier::empty());
        Text(open_issues.to_string(), Modifier::empty());
    });
}

#[test]
fn displays_the_primary_language_and_counts() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| RepositoriesSummary("Javascript", 5, 30, 1));

    for value in ["Javascript", "5", "30", "1"] {
        rule.get_by(has_text(value)).assert_text_equals(value);
    }
}

#[test]
fn keyboard_types_into_the_focused_field() {
    let mut rule = ComposeTestRule::new();
    rule.set_content(|| DataForm());

    rule.get_by(has_placeholder("Red")).perform_click();
    rule.keyboard("Teal");
    rule.get_by(has_display_value("Teal")).assert_exists();
    assert!(rule.dump_tree().contains("value=\"Teal\""));
}

#[test]
fn a_frame_of_one_rule_leaves_the_other_rule_pending() {
    let title = mutableStateOf(String::from("one"));
    let mut first = ComposeTestRule::new();
    first.set_content(move || {
        Text(title.value(), Modifier::empty());
    });
    let mut second = ComposeTestRule::new();
    second.set_content(|| ColorList());

    title.set(String::from("two"));
    second.await_idle();
    second.shell().update();

    assert!(first.shell().should_render());
    first.get_by(has_text("two")).assert_exists();
    assert!(first.query_by(has_text("one")).is_none());
    title.dispose();
}
