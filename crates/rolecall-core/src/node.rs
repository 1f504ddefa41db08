use crate::collections::map::HashMap;
use crate::{NodeError, NodeId};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt::Write as _;

/// A node in the emitted view tree.
pub trait Node: Any {
    fn children(&self) -> Vec<NodeId> {
        Vec::new()
    }

    fn update_children(&mut self, _children: &[NodeId]) {}

    /// One-line description used by tree dumps.
    fn describe(&self) -> String {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("Node")
            .to_string()
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Container the composition attaches top-level emissions to.
#[derive(Debug, Default)]
pub struct RootNode {
    pub children: SmallVec<[NodeId; 4]>,
}

impl Node for RootNode {
    fn children(&self) -> Vec<NodeId> {
        self.children.to_vec()
    }

    fn update_children(&mut self, children: &[NodeId]) {
        self.children = SmallVec::from_slice(children);
    }

    fn describe(&self) -> String {
        "Root".into()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Storage that receives the nodes a composition emits.
pub trait Applier: Any {
    fn insert(&mut self, id: NodeId, node: Box<dyn Node>);

    fn get(&self, id: NodeId) -> Result<&dyn Node, NodeError>;

    fn get_mut(&mut self, id: NodeId) -> Result<&mut dyn Node, NodeError>;

    fn remove(&mut self, id: NodeId) -> Option<Box<dyn Node>>;

    fn node_ids(&self) -> Vec<NodeId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_ok()
    }
}

impl dyn Applier {
    pub fn with_node<N: Node, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.get_mut(id)?;
        let typed = node
            .as_any_mut()
            .downcast_mut::<N>()
            .ok_or(NodeError::TypeMismatch {
                id,
                expected: std::any::type_name::<N>(),
            })?;
        Ok(f(typed))
    }

    pub fn read_node<N: Node, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&N) -> R,
    ) -> Result<R, NodeError> {
        let node = self.get(id)?;
        let typed = node
            .as_any()
            .downcast_ref::<N>()
            .ok_or(NodeError::TypeMismatch {
                id,
                expected: std::any::type_name::<N>(),
            })?;
        Ok(f(typed))
    }

    /// Maps every reachable node below `root` to its parent.
    pub fn parent_links(&self, root: NodeId) -> HashMap<NodeId, NodeId> {
        let mut parents = HashMap::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Ok(node) = self.get(id) else {
                continue;
            };
            for child in node.children() {
                parents.insert(child, id);
                stack.push(child);
            }
        }
        parents
    }

    /// Renders the subtree below `root` as an indented outline.
    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        let mut out = String::new();
        let root = match root {
            Some(id) => id,
            None => match self.node_ids().into_iter().min() {
                Some(id) => id,
                None => return out,
            },
        };
        self.dump_node(root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.get(id) {
            Ok(node) => {
                let _ = writeln!(out, "{indent}#{id} {}", node.describe());
                for child in node.children() {
                    self.dump_node(child, depth + 1, out);
                }
            }
            Err(_) => {
                let _ = writeln!(out, "{indent}#{id} <missing>");
            }
        }
    }
}

/// In-memory applier backed by a hash map.
#[derive(Default)]
pub struct MemoryApplier {
    nodes: HashMap<NodeId, Box<dyn Node>>,
}

impl MemoryApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node<N: Node, R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut N) -> R,
    ) -> Result<R, NodeError> {
        (self as &mut dyn Applier).with_node(id, f)
    }

    pub fn read_node<N: Node, R>(
        &self,
        id: NodeId,
        f: impl FnOnce(&N) -> R,
    ) -> Result<R, NodeError> {
        (self as &dyn Applier).read_node(id, f)
    }

    pub fn dump_tree(&self, root: Option<NodeId>) -> String {
        (self as &dyn Applier).dump_tree(root)
    }
}

impl Applier for MemoryApplier {
    fn insert(&mut self, id: NodeId, node: Box<dyn Node>) {
        self.nodes.insert(id, node);
    }

    fn get(&self, id: NodeId) -> Result<&dyn Node, NodeError> {
        self.nodes
            .get(&id)
            .map(|node| &**node)
            .ok_or(NodeError::Missing { id })
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut dyn Node, NodeError> {
        match self.nodes.get_mut(&id) {
            Some(node) => Ok(&mut **node),
            None => Err(NodeError::Missing { id }),
        }
    }

    fn remove(&mut self, id: NodeId) -> Option<Box<dyn Node>> {
        self.nodes.remove(&id)
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}
