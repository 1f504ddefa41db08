use crate::User;
use rolecall_core::useState;
use rolecall_ui::{
    composable, Column, Form, Label, Modifier, SubmitButton, SubmitEvent, Text, TextField,
    TextFieldSpec,
};

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";

/// Form with a name and an email field.
///
/// Submitting, by the button or by Enter in either field, reports the current
/// text of both fields to `on_user_add`. Nothing is validated and the fields
/// keep their text afterwards.
#[composable]
pub fn UserForm<F>(mut on_user_add: F)
where
    F: FnMut(User) + 'static,
{
    let name = useState(String::new);
    let email = useState(String::new);

    Form(
        Modifier::empty(),
        move |event: &mut SubmitEvent| {
            event.prevent_default();
            let user = User::new(name.value(), email.value());
            log::debug!("adding user name={:?} email={:?}", user.name, user.email);
            on_user_add(user);
        },
        || {
            Column(Modifier::empty(), || {
                Label(Some(NAME_FIELD), Modifier::empty(), || {
                    Text("Name", Modifier::empty());
                });
                TextField(
                    Modifier::empty().field_id(NAME_FIELD),
                    TextFieldSpec::new(),
                    name.value(),
                    move |text| name.set(text),
                );
            });

            Column(Modifier::empty(), || {
                Label(Some(EMAIL_FIELD), Modifier::empty(), || {
                    Text("Email", Modifier::empty());
                });
                TextField(
                    Modifier::empty().field_id(EMAIL_FIELD),
                    TextFieldSpec::new(),
                    email.value(),
                    move |text| email.set(text),
                );
            });

            SubmitButton(Modifier::empty(), || {
                Text("Add user", Modifier::empty());
            });
        },
    );
}
