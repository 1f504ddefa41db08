use crate::matchers::SemanticsMatcher;
use crate::QueryError;
use rolecall_core::NodeId;
use rolecall_ui::{SemanticsNode, SemanticsTree};

/// Read-only queries over a semantics tree, optionally scoped to a subtree.
#[derive(Clone, Copy, Debug)]
pub struct Screen<'a> {
    tree: &'a SemanticsTree,
    scope: Option<NodeId>,
}

impl<'a> Screen<'a> {
    pub fn new(tree: &'a SemanticsTree) -> Self {
        Self { tree, scope: None }
    }

    pub fn tree(&self) -> &'a SemanticsTree {
        self.tree
    }

    /// Node the queries are scoped to, if any.
    pub fn scope(&self) -> Option<NodeId> {
        self.scope
    }

    /// Nodes a query may return. A scope node is a container and never
    /// matches itself.
    fn candidates(&self) -> Vec<&'a SemanticsNode> {
        match self.scope {
            Some(scope) => self
                .tree
                .subtree(scope)
                .into_iter()
                .filter(|node| node.node_id != scope)
                .collect(),
            None => self.tree.iter().collect(),
        }
    }

    pub fn query_all(&self, matcher: &SemanticsMatcher) -> Vec<&'a SemanticsNode> {
        self.candidates()
            .into_iter()
            .filter(|node| matcher.matches(node))
            .collect()
    }

    pub fn query(
        &self,
        matcher: &SemanticsMatcher,
    ) -> Result<Option<&'a SemanticsNode>, QueryError> {
        let mut found = self.query_all(matcher);
        match found.len() {
            0 => Ok(None),
            1 => Ok(found.pop()),
            count => Err(QueryError::Multiple {
                description: matcher.description().to_string(),
                count,
            }),
        }
    }

    pub fn get(&self, matcher: &SemanticsMatcher) -> Result<&'a SemanticsNode, QueryError> {
        self.query(matcher)?.ok_or_else(|| QueryError::NotFound {
            description: matcher.description().to_string(),
        })
    }

    pub fn get_all(
        &self,
        matcher: &SemanticsMatcher,
    ) -> Result<Vec<&'a SemanticsNode>, QueryError> {
        let found = self.query_all(matcher);
        if found.is_empty() {
            return Err(QueryError::NotFound {
                description: matcher.description().to_string(),
            });
        }
        Ok(found)
    }

    /// Scopes further queries to the single node matching `matcher`.
    pub fn within(&self, matcher: &SemanticsMatcher) -> Result<Screen<'a>, QueryError> {
        let node = self.get(matcher)?;
        Ok(self.within_node(node.node_id))
    }

    pub fn within_node(&self, id: NodeId) -> Screen<'a> {
        Screen {
            tree: self.tree,
            scope: Some(id),
        }
    }

    pub fn dump(&self) -> String {
        self.tree.dump()
    }
}
