//! Error types for registry construction and dispatch.

use crate::retry::RetryError;
use crate::tools::ToolName;

/// Startup consistency failures between declarations and handlers.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("declared tool '{0}' is not a known tool")]
    UnknownTool(String),

    #[error("tool '{0}' is declared but has no handler")]
    MissingHandler(ToolName),

    #[error("handler registered for '{0}' but the tool is not declared")]
    UndeclaredHandler(ToolName),

    #[error("more than one handler registered for '{0}'")]
    DuplicateHandler(ToolName),
}

/// Failures that escape [`crate::tools::ToolDispatcher`].
///
/// Unresolvable names never appear here; they become error envelopes.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("handler for '{name}' failed: {source}")]
    Handler {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("handler for '{name}' {source}")]
    RetryExhausted {
        name: String,
        #[source]
        source: RetryError<anyhow::Error>,
    },
}
