use rolecall_app_shell::ShellError;
use web_time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("unable to find a node that {description}")]
    NotFound { description: String },
    #[error("found {count} nodes that {description}, expected exactly one")]
    Multiple { description: String, count: usize },
    #[error("no node that {description} appeared within {waited:?}")]
    Timeout {
        description: String,
        waited: Duration,
    },
    #[error(transparent)]
    Shell(#[from] ShellError),
}
