use console_types::DriverError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything that can go wrong crossing the envelope bridge.
///
/// Serializable so that a host-side failure can travel back through the
/// reply channel and surface unchanged on the embedded side.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum BridgeError {
    #[error("driver rejected: {0}")]
    Driver(DriverError),

    #[error("view delegate unavailable: {0}")]
    DelegateUnavailable(String),

    #[error("envelope not associated with a host yet")]
    NotAssociated,

    #[error("channel closed")]
    ChannelClosed,

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid arguments for {method}: {message}")]
    InvalidArguments { method: String, message: String },

    #[error("feature prefix already registered: {0}")]
    DuplicatePrefix(String),

    #[error("serialization: {0}")]
    Serialization(String),
}

impl BridgeError {
    /// Shorthand for a driver rejection.
    pub fn driver(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Driver(DriverError::new(kind, message))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Driver(_) => "driver",
            Self::DelegateUnavailable(_) => "delegate_unavailable",
            Self::NotAssociated => "not_associated",
            Self::ChannelClosed => "channel_closed",
            Self::UnknownMethod(_) => "not_found",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::DuplicatePrefix(_) => "conflict",
            Self::Serialization(_) => "serialization",
        }
    }
}

impl From<DriverError> for BridgeError {
    fn from(e: DriverError) -> Self {
        Self::Driver(e)
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
