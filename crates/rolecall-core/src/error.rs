use crate::NodeId;

/// Errors raised while applying composition output to the node store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeError {
    #[error("node #{id} is not present in the applier")]
    Missing { id: NodeId },
    #[error("node #{id} is not a {expected}")]
    TypeMismatch { id: NodeId, expected: &'static str },
    #[error("a composition is already running on this thread")]
    AlreadyComposing,
}
