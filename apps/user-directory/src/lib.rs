//! A registration form that feeds a directory table.
//!
//! [`App`] owns the list of users. [`UserForm`] collects a name and an email
//! and hands each submission to its callback; [`UserList`] renders whatever it
//! is given as one table row per user.

#![allow(non_snake_case)]

mod app;
mod components;
mod user;

pub use app::App;
pub use components::{UserForm, UserList, EMAIL_FIELD, NAME_FIELD, USERS_TAG};
pub use user::User;
