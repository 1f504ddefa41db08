//! Widgets.
//!
//! Every widget is a `#[composable]` function that emits one node and returns
//! its id. Container widgets take their children as a closure.

mod button;
mod form;
mod layout;
mod list;
mod media;
mod table;
mod text;
mod text_field;

pub use button::{Button, SubmitButton};
pub use form::{Form, Label};
pub use layout::{Column, Heading, Layout, Row};
pub use list::{List, ListItem};
pub use media::{Divider, Image};
pub use table::{Table, TableBody, TableCell, TableRow};
pub use text::Text;
pub use text_field::{TextField, TextFieldSpec};
