mod user_form;
mod user_list;

pub use user_form::{UserForm, EMAIL_FIELD, NAME_FIELD};
pub use user_list::{UserList, USERS_TAG};
