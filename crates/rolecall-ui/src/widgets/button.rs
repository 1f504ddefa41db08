//! Button widgets.

#![allow(non_snake_case)]

use crate::composable;
use crate::event::ClickHandler;
use crate::modifier::Modifier;
use crate::nodes::{ButtonKind, ButtonNode};
use rolecall_core::{emit_node, NodeId};

/// A clickable button.
///
/// # Arguments
///
/// * `modifier` - Semantics for the button container.
/// * `on_click` - Runs when the button, or anything inside it, is clicked.
/// * `content` - Content of the button, typically a `Text`. It also provides
///   the accessible name unless the modifier sets a content description.
///
/// # Example
///
/// ```rust,ignore
/// Button(
///     Modifier::empty(),
///     || println!("Clicked!"),
///     || { Text("Click Me", Modifier::empty()); },
/// );
/// ```
#[composable]
pub fn Button<F, C>(modifier: Modifier, on_click: F, content: C) -> NodeId
where
    F: FnMut() + 'static,
    C: FnOnce(),
{
    let on_click = ClickHandler::new(on_click);
    emit_node(
        ButtonNode::default,
        move |node: &mut ButtonNode| {
            node.kind = ButtonKind::Button;
            node.on_click = Some(on_click);
            node.modifier = modifier;
        },
        content,
    )
}

/// Button that submits the [`Form`](crate::Form) it is placed in.
#[composable]
pub fn SubmitButton<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    emit_node(
        ButtonNode::default,
        move |node: &mut ButtonNode| {
            node.kind = ButtonKind::Submit;
            node.on_click = None;
            node.modifier = modifier;
        },
        content,
    )
}
