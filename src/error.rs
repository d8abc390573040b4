//! Error handling for the vitals hub crate.

/// A specialized `Result` type for vitals hub operations.
pub type Result<T> = std::result::Result<T, HubError>;

/// The main error type for vitals hub operations.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Wire format encoding or decoding failed
    #[error("Codec error: {0}")]
    Codec(String),

    /// Peer link operation failed
    #[error("Link error: {0}")]
    Link(String),

    /// A board sample carried an id outside the three known slots
    #[error("Invalid board id: {0} (expected 1-3)")]
    InvalidBoardId(u32),

    /// A bounded wait on the peer expired
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HubError {
    /// Create a new codec error
    pub fn codec_error(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Create a new link error
    pub fn link_error(msg: impl Into<String>) -> Self {
        Self::Link(msg.into())
    }

    /// Create a new timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a new configuration error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
