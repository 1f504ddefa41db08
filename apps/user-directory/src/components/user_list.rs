use crate::User;
use rolecall_ui::{composable, Modifier, Table, TableBody, TableCell, TableRow, Text};

/// Test tag of the table body holding one row per user.
pub const USERS_TAG: &str = "users";

/// Table with a name cell and an email cell per user, in the given order.
#[composable]
pub fn UserList(users: Vec<User>) {
    Table(Modifier::empty(), || {
        TableBody(Modifier::empty().test_tag(USERS_TAG), || {
            for user in &users {
                TableRow(Modifier::empty(), || {
                    TableCell(Modifier::empty(), || {
                        Text(user.name.as_str(), Modifier::empty());
                    });
                    TableCell(Modifier::empty(), || {
                        Text(user.email.as_str(), Modifier::empty());
                    });
                });
            }
        });
    });
}
