//! Node types emitted by the widgets.

use crate::event::{ClickHandler, SubmitHandler, ValueChangeHandler};
use crate::modifier::Modifier;
use crate::semantics::SemanticsRole;
use indexmap::IndexSet;
use rolecall_core::{Node, NodeId};
use std::any::Any;
use std::rc::Rc;

macro_rules! container_node {
    ($node:ty) => {
        impl Node for $node {
            fn children(&self) -> Vec<NodeId> {
                self.children.iter().copied().collect()
            }

            fn update_children(&mut self, children: &[NodeId]) {
                self.children.clear();
                self.children.extend(children.iter().copied());
            }

            fn describe(&self) -> String {
                self.describe_node()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

macro_rules! leaf_node {
    ($node:ty) => {
        impl Node for $node {
            fn describe(&self) -> String {
                self.describe_node()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

/// Structural container. Its role decides how it is exposed in semantics.
#[derive(Debug)]
pub struct LayoutNode {
    pub modifier: Modifier,
    pub role: SemanticsRole,
    pub level: Option<u8>,
    pub children: IndexSet<NodeId>,
}

impl LayoutNode {
    pub fn new(role: SemanticsRole) -> Self {
        Self {
            modifier: Modifier::empty(),
            role,
            level: None,
            children: IndexSet::new(),
        }
    }

    fn describe_node(&self) -> String {
        match self.level {
            Some(level) => format!("Layout({}, level {level})", self.role),
            None => format!("Layout({})", self.role),
        }
    }
}

container_node!(LayoutNode);

#[derive(Debug)]
pub struct TextNode {
    pub modifier: Modifier,
    pub text: Rc<str>,
}

impl Default for TextNode {
    fn default() -> Self {
        Self {
            modifier: Modifier::empty(),
            text: Rc::from(""),
        }
    }
}

impl TextNode {
    fn describe_node(&self) -> String {
        format!("Text({:?})", self.text)
    }
}

leaf_node!(TextNode);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonKind {
    /// Runs its click handler only.
    #[default]
    Button,
    /// Submits the enclosing form after its click handler.
    Submit,
}

#[derive(Debug, Default)]
pub struct ButtonNode {
    pub modifier: Modifier,
    pub kind: ButtonKind,
    pub on_click: Option<ClickHandler>,
    pub children: IndexSet<NodeId>,
}

impl ButtonNode {
    fn describe_node(&self) -> String {
        format!("Button({:?})", self.kind)
    }
}

container_node!(ButtonNode);

/// Single-line editable text. The value is owned by the caller; the node only
/// reports changes through `on_value_change`.
#[derive(Debug)]
pub struct TextFieldNode {
    pub modifier: Modifier,
    pub value: Rc<str>,
    pub label: Option<Rc<str>>,
    pub placeholder: Option<Rc<str>>,
    pub on_value_change: ValueChangeHandler,
}

impl Default for TextFieldNode {
    fn default() -> Self {
        Self {
            modifier: Modifier::empty(),
            value: Rc::from(""),
            label: None,
            placeholder: None,
            on_value_change: ValueChangeHandler::default(),
        }
    }
}

impl TextFieldNode {
    fn describe_node(&self) -> String {
        format!("TextField(value={:?})", self.value)
    }
}

leaf_node!(TextFieldNode);

/// Caption whose text names the field with a matching `field_id`.
#[derive(Debug, Default)]
pub struct LabelNode {
    pub modifier: Modifier,
    pub target: Option<Rc<str>>,
    pub children: IndexSet<NodeId>,
}

impl LabelNode {
    fn describe_node(&self) -> String {
        format!("Label(for={:?})", self.target)
    }
}

container_node!(LabelNode);

#[derive(Debug, Default)]
pub struct FormNode {
    pub modifier: Modifier,
    pub on_submit: SubmitHandler,
    pub children: IndexSet<NodeId>,
}

impl FormNode {
    fn describe_node(&self) -> String {
        "Form".into()
    }
}

container_node!(FormNode);

#[derive(Debug)]
pub struct ImageNode {
    pub modifier: Modifier,
    pub alt: Rc<str>,
}

impl Default for ImageNode {
    fn default() -> Self {
        Self {
            modifier: Modifier::empty(),
            alt: Rc::from(""),
        }
    }
}

impl ImageNode {
    fn describe_node(&self) -> String {
        format!("Image(alt={:?})", self.alt)
    }
}

leaf_node!(ImageNode);

/// Modifier of any node emitted by the widgets.
pub fn node_modifier(node: &dyn Node) -> Option<&Modifier> {
    let any = node.as_any();
    if let Some(node) = any.downcast_ref::<LayoutNode>() {
        Some(&node.modifier)
    } else if let Some(node) = any.downcast_ref::<TextNode>() {
        Some(&node.modifier)
    } else if let Some(node) = any.downcast_ref::<ButtonNode>() {
        Some(&node.modifier)
    } else if let Some(node) = any.downcast_ref::<TextFieldNode>() {
        Some(&node.modifier)
    } else if let Some(node) = any.downcast_ref::<LabelNode>() {
        Some(&node.modifier)
    } else if let Some(node) = any.downcast_ref::<FormNode>() {
        Some(&node.modifier)
    } else {
        any.downcast_ref::<ImageNode>().map(|node| &node.modifier)
    }
}
