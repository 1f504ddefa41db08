//! Text widget.

#![allow(non_snake_case)]

use crate::composable;
use crate::modifier::Modifier;
use crate::nodes::TextNode;
use rolecall_core::{emit_node, NodeId};
use std::rc::Rc;

/// Read-only text.
///
/// Pass the current value on every pass; reading a state handle while
/// composing is what makes the text follow it.
///
/// ```rust,ignore
/// Text("Hello World", Modifier::empty());
/// Text(format!("Clicked {} times", count.value()), Modifier::empty());
/// ```
#[composable]
pub fn Text(value: impl Into<Rc<str>>, modifier: Modifier) -> NodeId {
    let text = value.into();
    emit_node(
        TextNode::default,
        move |node: &mut TextNode| {
            node.text = text;
            node.modifier = modifier;
        },
        || {},
    )
}
