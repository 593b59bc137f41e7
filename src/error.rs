/// Error taxonomy for TabMan
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabManError {
    /// The key-value store rejected a read.
    #[error("storage read failed: {0}")]
    StorageRead(String),

    /// The key-value store rejected a write.
    #[error("storage write failed: {0}")]
    StorageWrite(String),

    /// A stored value could not be converted to or from its record shape.
    #[error("malformed stored data: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No active tab in the current window.
    #[error("no active tab found")]
    NoActiveTab,

    /// Any other host platform call (tabs, menus, badge) failed.
    #[error("host call failed: {0}")]
    Host(String),

    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
}
