#![allow(non_snake_case)]

use crate::composable;
use crate::modifier::Modifier;
use crate::semantics::SemanticsRole;
use crate::widgets::Layout;
use rolecall_core::NodeId;

#[composable]
pub fn Table<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::Table, modifier, content)
}

/// Row group of a [`Table`]; tag it to scope queries to the rows.
#[composable]
pub fn TableBody<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::RowGroup, modifier, content)
}

#[composable]
pub fn TableRow<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::Row, modifier, content)
}

/// Data cell. Its accessible name is the text of its content.
#[composable]
pub fn TableCell<C>(modifier: Modifier, content: C) -> NodeId
where
    C: FnOnce(),
{
    Layout(SemanticsRole::Cell, modifier, content)
}
