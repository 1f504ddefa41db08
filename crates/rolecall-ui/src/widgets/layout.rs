#![allow(non_snake_case)]

use crate::composable;
use crate::modifier::Modifier;
use crate::nodes::LayoutNode;
use crate::semantics::SemanticsRole;
use rolecall_core::{emit_node, NodeId};

/// Generic container exposed with `role`.
///
/// The other structural widgets are thin wrappers over this one.
#[composable]
pub fn Layout<C>(role: SemanticsRole, modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    emit_node(
        move || LayoutNode::new(role),
        move |node: &mut LayoutNode| {
            node.role = role;
            node.level = None;
            node.modifier = modifier;
        },
        content,
    )
}

/// Vertical group. Without a layout engine this only groups its children.
#[composable]
pub fn Column<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::Generic, modifier, content)
}

/// Horizontal group; see [`Column`].
#[composable]
pub fn Row<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::Generic, modifier, content)
}

/// Section heading. `level` is clamped to `1..=6`.
///
/// ```rust,ignore
/// Heading(2, Modifier::empty(), || {
///     Text("Users", Modifier::empty());
/// });
/// ```
#[composable]
pub fn Heading<C>(level: u8, modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    let level = level.clamp(1, 6);
    emit_node(
        || LayoutNode::new(SemanticsRole::Heading),
        move |node: &mut LayoutNode| {
            node.role = SemanticsRole::Heading;
            node.level = Some(level);
            node.modifier = modifier;
        },
        content,
    )
}
