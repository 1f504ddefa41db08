#![allow(non_snake_case)]

use crate::composable;
use crate::modifier::Modifier;
use crate::nodes::{ImageNode, LayoutNode};
use crate::semantics::SemanticsRole;
use rolecall_core::{emit_node, NodeId};
use std::rc::Rc;

/// Image placeholder. Nothing is decoded; only `alt` is kept, which names the
/// image and the controls that contain it.
#[composable]
pub fn Image(alt: impl Into<Rc<str>>, modifier: Modifier) -> NodeId {
    let alt = alt.into();
    emit_node(
        ImageNode::default,
        move |node: &mut ImageNode| {
            node.alt = alt;
            node.modifier = modifier;
        },
        || {},
    )
}

#[composable]
pub fn Divider(modifier: Modifier) -> NodeId {
    emit_node(
        || LayoutNode::new(SemanticsRole::Separator),
        move |node: &mut LayoutNode| node.modifier = modifier,
        || {},
    )
}
