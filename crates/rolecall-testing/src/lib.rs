//! Testing utilities for Rolecall.
//!
//! Queries resolve nodes of the semantics tree by what a user perceives:
//! role, accessible name, label, placeholder, displayed value, alt text,
//! title, test tag. They come in the usual three flavours. `get` fails unless
//! exactly one node matches, `query` tolerates no match, and `find` keeps
//! settling frames until a match shows up or the timeout passes.

#![allow(non_snake_case)]

mod error;
pub mod matchers;
mod screen;
mod test_rule;
mod text_match;

pub use error::QueryError;
pub use matchers::*;
pub use screen::Screen;
pub use test_rule::*;
pub use text_match::TextMatch;

pub mod prelude {
    pub use crate::matchers::*;
    pub use crate::{ComposeTestRule, QueryError, Screen, TestConfig, TestNode, TextMatch};
    pub use rolecall_ui::SemanticsRole;
}
