#![allow(non_snake_case)]

use crate::composable;
use crate::event::{SubmitEvent, SubmitHandler};
use crate::modifier::Modifier;
use crate::nodes::{FormNode, LabelNode};
use rolecall_core::{emit_node, NodeId};
use std::rc::Rc;

/// Groups fields and a submit control.
///
/// Clicking a [`SubmitButton`](crate::SubmitButton) inside the form, or
/// pressing Enter in one of its text fields, calls `on_submit`. Unless the
/// handler calls [`SubmitEvent::prevent_default`] the submission navigates,
/// which throws away all remembered state.
#[composable]
pub fn Form<F, C>(modifier: Modifier, on_submit: F, content: C) -> NodeId
where
    F: FnMut(&mut SubmitEvent) + 'static,
    C: FnOnce(),
{
    let on_submit = SubmitHandler::new(on_submit);
    emit_node(
        FormNode::default,
        move |node: &mut FormNode| {
            node.on_submit = on_submit;
            node.modifier = modifier;
        },
        content,
    )
}

/// Caption for a text field.
///
/// With a `target`, the label names the field whose modifier carries the same
/// [`field_id`](crate::Modifier::field_id). Without one it names the first text
/// field placed inside it.
#[composable]
pub fn Label<C>(target: Option<&str>, modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    let target: Option<Rc<str>> = target.map(Rc::from);
    emit_node(
        LabelNode::default,
        move |node: &mut LabelNode| {
            node.target = target;
            node.modifier = modifier;
        },
        content,
    )
}
