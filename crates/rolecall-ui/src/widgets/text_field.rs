#![allow(non_snake_case)]

use crate::composable;
use crate::event::ValueChangeHandler;
use crate::modifier::Modifier;
use crate::nodes::TextFieldNode;
use rolecall_core::{emit_node, NodeId};
use std::rc::Rc;

/// Static configuration of a [`TextField`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFieldSpec {
    /// Built-in label, used when no [`Label`](crate::Label) points at the field.
    pub label: Option<Rc<str>>,
    pub placeholder: Option<Rc<str>>,
}

impl TextFieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<Rc<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<Rc<str>>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }
}

/// Controlled single-line text input.
///
/// The field shows `value` and reports every edit through `on_value_change`
/// with the full new text; it never changes its value on its own.
///
/// ```rust,ignore
/// let name = useState(String::new);
/// TextField(
///     Modifier::empty(),
///     TextFieldSpec::new().label("Name"),
///     name.value(),
///     move |text| name.set(text),
/// );
/// ```
#[composable]
pub fn TextField<V, F>(
    modifier: Modifier,
    spec: TextFieldSpec,
    value: V,
    on_value_change: F,
) -> NodeId
where
    V: Into<Rc<str>>,
    F: FnMut(String) + 'static,
{
    let value = value.into();
    let on_value_change = ValueChangeHandler::new(on_value_change);
    emit_node(
        TextFieldNode::default,
        move |node: &mut TextFieldNode| {
            node.value = value;
            node.label = spec.label;
            node.placeholder = spec.placeholder;
            node.on_value_change = on_value_change;
            node.modifier = modifier;
        },
        || {},
    )
}
