use crate::{User, UserForm, UserList};
use rolecall_core::useState;
use rolecall_ui::{composable, Column, Divider, Modifier};

/// Form on top, directory below. Every submission is appended to the list.
#[composable]
pub fn App() {
    let users = useState(Vec::<User>::new);

    Column(Modifier::empty(), || {
        UserForm(move |user| {
            let mut next = users.value();
            next.push(user);
            log::info!("directory now holds {} users", next.len());
            users.set(next);
        });
        Divider(Modifier::empty());
        UserList(users.value());
    });
}
