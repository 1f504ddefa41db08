use rolecall_core::{NodeError, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShellError {
    #[error("the shell has no composed content")]
    NoContent,
    #[error("node #{id} is not an editable text field")]
    NotEditable { id: NodeId },
    #[error("no text field has focus")]
    NoFocusedField,
    #[error("composition did not settle after {frames} frames")]
    Unsettled { frames: usize },
    #[error(transparent)]
    Node(#[from] NodeError),
}
