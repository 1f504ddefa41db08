//! Widgets, modifiers and the semantics tree of Rolecall.
//!
//! There is no layout or drawing. Widgets emit nodes that describe what a
//! screen reader would see, and [`SemanticsTree`] turns those nodes into roles
//! and accessible names for queries.

#![allow(non_snake_case)]

pub mod event;
pub mod modifier;
pub mod nodes;
pub mod semantics;
pub mod widgets;

pub use event::{ClickHandler, SubmitEvent, SubmitHandler, ValueChangeHandler};
pub use modifier::{Modifier, ModifierElement, ResolvedSemantics};
pub use nodes::{
    node_modifier, ButtonKind, ButtonNode, FormNode, ImageNode, LabelNode, LayoutNode,
    TextFieldNode, TextNode,
};
pub use rolecall_macros::composable;
pub use semantics::{normalize_text, SemanticsNode, SemanticsRole, SemanticsTree, UnknownRole};
pub use widgets::*;
