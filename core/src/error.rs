//! Error types for the auction agent core library
//!
//! Every failure an auction action can hit, from rejected input to a reverted
//! transaction, is a variant of [`Error`]. Callers that only need a
//! human-readable message can rely on `Display`; callers that log or alert can
//! use [`Error::is_recoverable`] to separate transient failures from terminal
//! ones.

/// Result type alias for auction agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for auction agent operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before anything was submitted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// ABI lookup or call encoding failed
    #[error("ABI error: {0}")]
    Abi(String),

    /// Malformed JSON-RPC exchange
    #[error("RPC error: {0}")]
    Rpc(String),

    /// The node answered the request with a JSON-RPC error object
    #[error("Transaction rejected (code {code}): {message}")]
    Rejected {
        /// JSON-RPC error code
        code: i64,
        /// Error message reported by the node
        message: String,
    },

    /// The transaction was mined but its execution reverted
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Network-level failure talking to the node
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Timed out waiting for an operation
    #[error("Timeout: {0}")]
    Timeout(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Operation not supported by the wallet capability
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// Metrics registration failed
    #[cfg(feature = "metrics")]
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl Error {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new ABI error
    pub fn abi(msg: impl Into<String>) -> Self {
        Self::Abi(msg.into())
    }

    /// Create a new RPC error
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Check if the error was raised before anything reached the chain
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidAddress(_) | Self::InvalidAmount(_)
        )
    }

    /// Check if error is recoverable (a retry may succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::Rpc(_) => true,
            Self::Http(err) => err.is_timeout() || err.is_connect() || err.is_request(),
            _ => false,
        }
    }
}
