#![allow(non_snake_case)]

use crate::composable;
use crate::modifier::Modifier;
use crate::semantics::SemanticsRole;
use crate::widgets::Layout;
use rolecall_core::NodeId;

#[composable]
pub fn List<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::List, modifier, content)
}

#[composable]
pub fn ListItem<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::ListItem, modifier, content)
}
