//! Error types for the toolkit
//!
//! Tools themselves never fail: every failure inside a tool becomes a
//! prefixed message for the agent. [`ToolkitError`] covers only what goes
//! wrong around the tools, such as looking up a name that was never
//! registered.

/// Result type alias for toolkit operations
pub type Result<T> = std::result::Result<T, ToolkitError>;

/// Toolkit error type
#[derive(Debug, thiserror::Error)]
pub enum ToolkitError {
    /// No tool is registered under the requested name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A tool with the same name is already registered
    #[error("Duplicate tool: {0}")]
    DuplicateTool(String),

    /// Building the underlying actions failed
    #[error(transparent)]
    Core(#[from] auction_agent_core::Error),
}

impl ToolkitError {
    /// Check if the error is an unknown tool lookup
    pub fn is_unknown_tool(&self) -> bool {
        matches!(self, Self::UnknownTool(_))
    }
}
