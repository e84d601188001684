use thiserror::Error;

/// Error type for sqltask operations.
///
/// Each variant corresponds to one failure class: connectivity, binding,
/// execution, materialization, and caller-triggered cancellation are kept
/// distinct so callers can react to them individually even when the message
/// text comes straight from the driver.
#[derive(Debug, Error)]
pub enum SqlTaskError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Unsupported parameter type: {0}")]
    UnsupportedParameterType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Materialization failed: {0}")]
    MaterializationFailed(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("Cancelled")]
    Cancelled,
}

/// Result type alias for sqltask operations
pub type Result<T> = std::result::Result<T, SqlTaskError>;
