//! Semantics tree built from the emitted nodes.
//!
//! The tree is what tests query: every node gets a role, an accessible name and
//! the handful of properties the testing-library style queries match on.

use crate::modifier::{Modifier, ResolvedSemantics};
use crate::nodes::{
    node_modifier, ButtonKind, ButtonNode, FormNode, ImageNode, LabelNode, LayoutNode,
    TextFieldNode, TextNode,
};
use indexmap::IndexMap;
use rolecall_core::collections::map::HashMap;
use rolecall_core::{Applier, Node, NodeError, NodeId, RootNode};
use std::fmt::{self, Write as _};
use std::rc::Rc;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SemanticsRole {
    #[default]
    Generic,
    Text,
    Button,
    TextBox,
    Form,
    Table,
    RowGroup,
    Row,
    Cell,
    List,
    ListItem,
    Heading,
    Img,
    Separator,
    Label,
}

impl SemanticsRole {
    pub const ALL: [SemanticsRole; 15] = [
        Self::Generic,
        Self::Text,
        Self::Button,
        Self::TextBox,
        Self::Form,
        Self::Table,
        Self::RowGroup,
        Self::Row,
        Self::Cell,
        Self::List,
        Self::ListItem,
        Self::Heading,
        Self::Img,
        Self::Separator,
        Self::Label,
    ];

    /// ARIA role name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Text => "text",
            Self::Button => "button",
            Self::TextBox => "textbox",
            Self::Form => "form",
            Self::Table => "table",
            Self::RowGroup => "rowgroup",
            Self::Row => "row",
            Self::Cell => "cell",
            Self::List => "list",
            Self::ListItem => "listitem",
            Self::Heading => "heading",
            Self::Img => "img",
            Self::Separator => "separator",
            Self::Label => "label",
        }
    }

    /// Whether the accessible name falls back to the text of the subtree.
    pub fn names_from_content(self) -> bool {
        matches!(
            self,
            Self::Button
                | Self::Cell
                | Self::Row
                | Self::Heading
                | Self::ListItem
                | Self::Label
                | Self::Text
        )
    }
}

impl fmt::Display for SemanticsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for SemanticsRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Collapses runs of whitespace and trims both ends.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SemanticsNode {
    pub node_id: NodeId,
    pub role: SemanticsRole,
    /// Accessible name, whitespace-normalised. Empty when the node has none.
    pub name: String,
    /// Text carried by the node itself.
    pub text: Option<String>,
    /// Concatenated text of the node and its descendants.
    pub text_content: String,
    pub value: Option<String>,
    pub label: Option<String>,
    pub content_description: Option<String>,
    pub placeholder: Option<String>,
    pub title: Option<String>,
    pub test_tag: Option<String>,
    pub alt: Option<String>,
    pub level: Option<u8>,
    pub focused: bool,
    pub clickable: bool,
    pub children: Vec<NodeId>,
}

/// Typed view of a stored node.
enum View<'a> {
    Root,
    Layout(&'a LayoutNode),
    Text(&'a TextNode),
    Button(&'a ButtonNode),
    TextField(&'a TextFieldNode),
    Label(&'a LabelNode),
    Form,
    Image(&'a ImageNode),
    Other,
}

impl<'a> View<'a> {
    fn of(node: &'a dyn Node) -> Self {
        let any = node.as_any();
        if let Some(node) = any.downcast_ref::<LayoutNode>() {
            View::Layout(node)
        } else if let Some(node) = any.downcast_ref::<TextNode>() {
            View::Text(node)
        } else if let Some(node) = any.downcast_ref::<ButtonNode>() {
            View::Button(node)
        } else if let Some(node) = any.downcast_ref::<TextFieldNode>() {
            View::TextField(node)
        } else if let Some(node) = any.downcast_ref::<LabelNode>() {
            View::Label(node)
        } else if any.is::<FormNode>() {
            View::Form
        } else if let Some(node) = any.downcast_ref::<ImageNode>() {
            View::Image(node)
        } else if any.is::<RootNode>() {
            View::Root
        } else {
            View::Other
        }
    }

    fn role(&self) -> SemanticsRole {
        match self {
            View::Layout(node) => node.role,
            View::Text(_) => SemanticsRole::Text,
            View::Button(_) => SemanticsRole::Button,
            View::TextField(_) => SemanticsRole::TextBox,
            View::Label(_) => SemanticsRole::Label,
            View::Form => SemanticsRole::Form,
            View::Image(_) => SemanticsRole::Img,
            View::Root | View::Other => SemanticsRole::Generic,
        }
    }
}

fn resolve(node: &dyn Node) -> ResolvedSemantics {
    node_modifier(node).map(Modifier::resolve).unwrap_or_default()
}

fn owned(text: &Option<Rc<str>>) -> Option<String> {
    text.as_deref().map(str::to_string)
}

struct Builder<'a> {
    applier: &'a dyn Applier,
    focused: Option<NodeId>,
    labels_by_field: HashMap<Rc<str>, String>,
    labels_by_node: HashMap<NodeId, String>,
    text_cache: HashMap<NodeId, Rc<str>>,
    name_cache: HashMap<NodeId, Rc<str>>,
    nodes: IndexMap<NodeId, SemanticsNode>,
}

impl<'a> Builder<'a> {
    fn collect_labels(&mut self, id: NodeId) -> Result<(), NodeError> {
        let applier = self.applier;
        let node = applier.get(id)?;
        if let View::Label(label) = View::of(node) {
            let text = normalize_text(&self.text_content(id)?);
            match &label.target {
                Some(target) => {
                    self.labels_by_field.insert(Rc::clone(target), text);
                }
                None => {
                    if let Some(field) = self.first_field(id)? {
                        self.labels_by_node.insert(field, text);
                    }
                }
            }
        }
        for child in node.children() {
            self.collect_labels(child)?;
        }
        Ok(())
    }

    /// First text field below `id`, for labels that wrap their control.
    fn first_field(&self, id: NodeId) -> Result<Option<NodeId>, NodeError> {
        for child in self.applier.get(id)?.children() {
            if self.applier.get(child)?.as_any().is::<TextFieldNode>() {
                return Ok(Some(child));
            }
            if let Some(found) = self.first_field(child)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Concatenated text below `id`. Each node is computed once per build.
    fn text_content(&mut self, id: NodeId) -> Result<Rc<str>, NodeError> {
        if let Some(text) = self.text_cache.get(&id) {
            return Ok(Rc::clone(text));
        }
        let applier = self.applier;
        let node = applier.get(id)?;
        let text: Rc<str> = match View::of(node) {
            View::Text(text) => Rc::clone(&text.text),
            _ => {
                let mut out = String::new();
                for child in node.children() {
                    out.push_str(&self.text_content(child)?);
                }
                Rc::from(out)
            }
        };
        self.text_cache.insert(id, Rc::clone(&text));
        Ok(text)
    }

    /// Name computed from the subtree. Images contribute their alt text and
    /// embedded fields their value.
    fn content_name(&mut self, id: NodeId) -> Result<Rc<str>, NodeError> {
        if let Some(name) = self.name_cache.get(&id) {
            return Ok(Rc::clone(name));
        }
        let applier = self.applier;
        let node = applier.get(id)?;
        let view = View::of(node);
        let own = resolve(node)
            .content_description
            .or_else(|| match view {
                View::Text(text) => Some(Rc::clone(&text.text)),
                View::Image(image) => Some(Rc::clone(&image.alt)),
                View::TextField(field) => Some(Rc::clone(&field.value)),
                _ => None,
            });
        let name = match own {
            Some(own) => own,
            None => {
                let mut parts = Vec::new();
                for child in node.children() {
                    let part = self.content_name(child)?;
                    if !part.trim().is_empty() {
                        parts.push(part);
                    }
                }
                Rc::from(parts.join(" "))
            }
        };
        self.name_cache.insert(id, Rc::clone(&name));
        Ok(name)
    }

    fn field_label(
        &self,
        id: NodeId,
        field: &TextFieldNode,
        resolved: &ResolvedSemantics,
    ) -> Option<String> {
        let by_target = resolved
            .field_id
            .as_ref()
            .and_then(|field_id| self.labels_by_field.get(field_id));
        by_target
            .or_else(|| self.labels_by_node.get(&id))
            .cloned()
            .or_else(|| field.label.as_deref().map(normalize_text))
    }

    fn build(&mut self, id: NodeId) -> Result<(), NodeError> {
        let applier = self.applier;
        let node = applier.get(id)?;
        let view = View::of(node);
        let resolved = resolve(node);
        let role = view.role();
        let children = node.children();

        let mut semantics = SemanticsNode {
            node_id: id,
            role,
            text_content: self.text_content(id)?.to_string(),
            content_description: owned(&resolved.content_description),
            title: owned(&resolved.title),
            test_tag: owned(&resolved.test_tag),
            focused: self.focused == Some(id),
            clickable: resolved.is_clickable(),
            children: children.clone(),
            ..SemanticsNode::default()
        };

        match &view {
            View::Layout(layout) => semantics.level = layout.level,
            View::Text(text) => semantics.text = Some(text.text.to_string()),
            View::Button(button) => {
                semantics.clickable = semantics.clickable
                    || button.on_click.is_some()
                    || button.kind == ButtonKind::Submit;
            }
            View::TextField(field) => {
                semantics.value = Some(field.value.to_string());
                semantics.placeholder = owned(&field.placeholder);
                semantics.label = self.field_label(id, field, &resolved);
            }
            View::Image(image) => semantics.alt = Some(image.alt.to_string()),
            View::Label(_) | View::Form | View::Root | View::Other => {}
        }

        semantics.name = self.accessible_name(id, &semantics)?;
        self.nodes.insert(id, semantics);

        for child in children {
            self.build(child)?;
        }
        Ok(())
    }

    fn accessible_name(&mut self, id: NodeId, node: &SemanticsNode) -> Result<String, NodeError> {
        if let Some(description) = &node.content_description {
            return Ok(normalize_text(description));
        }
        if node.role == SemanticsRole::TextBox {
            if let Some(label) = &node.label {
                return Ok(label.clone());
            }
        }
        if node.role == SemanticsRole::Img {
            if let Some(alt) = node.alt.as_deref().filter(|alt| !alt.trim().is_empty()) {
                return Ok(normalize_text(alt));
            }
        }
        if node.role.names_from_content() {
            let name = normalize_text(&self.content_name(id)?);
            if !name.is_empty() {
                return Ok(name);
            }
        }
        let title = node.title.as_deref().map(normalize_text);
        Ok(title.unwrap_or_default())
    }
}

/// Snapshot of the semantics of a node tree, in document order.
#[derive(Clone, Debug, Default)]
pub struct SemanticsTree {
    root: Option<NodeId>,
    nodes: IndexMap<NodeId, SemanticsNode>,
}

impl SemanticsTree {
    pub fn build(
        applier: &dyn Applier,
        root: NodeId,
        focused: Option<NodeId>,
    ) -> Result<Self, NodeError> {
        let mut builder = Builder {
            applier,
            focused,
            labels_by_field: HashMap::default(),
            labels_by_node: HashMap::default(),
            text_cache: HashMap::default(),
            name_cache: HashMap::default(),
            nodes: IndexMap::new(),
        };
        builder.collect_labels(root)?;
        builder.build(root)?;
        log::trace!("built semantics tree with {} nodes", builder.nodes.len());
        Ok(Self {
            root: Some(root),
            nodes: builder.nodes,
        })
    }

    pub fn root(&self) -> Option<&SemanticsNode> {
        self.root.and_then(|id| self.nodes.get(&id))
    }

    pub fn node(&self, id: NodeId) -> Option<&SemanticsNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SemanticsNode> {
        self.nodes.values()
    }

    /// `id` and everything below it, in document order.
    pub fn subtree(&self, id: NodeId) -> Vec<&SemanticsNode> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            out.push(node);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    pub fn find(&self, predicate: impl Fn(&SemanticsNode) -> bool) -> Option<&SemanticsNode> {
        self.iter().find(|node| predicate(node))
    }

    pub fn find_all(&self, predicate: impl Fn(&SemanticsNode) -> bool) -> Vec<&SemanticsNode> {
        self.iter().filter(|node| predicate(node)).collect()
    }

    pub fn focused(&self) -> Option<&SemanticsNode> {
        self.find(|node| node.focused)
    }

    /// Indented outline of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if let Some(root) = self.root {
            self.dump_node(root, 0, &mut out);
        }
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let _ = write!(out, "{}{} #{}", "  ".repeat(depth), node.role, node.node_id);
        if !node.name.is_empty() {
            let _ = write!(out, " {:?}", node.name);
        }
        if let Some(value) = &node.value {
            let _ = write!(out, " value={value:?}");
        }
        if let Some(tag) = &node.test_tag {
            let _ = write!(out, " tag={tag:?}");
        }
        if node.focused {
            out.push_str(" [focused]");
        }
        out.push('\n');
        for child in &node.children {
            self.dump_node(*child, depth + 1, out);
        }
    }
}
