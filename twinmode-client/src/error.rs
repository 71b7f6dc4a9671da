use thiserror::Error;

/// Why a transform call failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Error outcome configured on a null client; displays the configured text.
    #[error("{0}")]
    Stubbed(String),

    #[error("Transform service responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transform service unreachable: {0}")]
    Transport(String),

    #[error("Transform service sent an unreadable response: {0}")]
    Decode(String),

    #[error("Transform call was cancelled")]
    Cancelled,
}
