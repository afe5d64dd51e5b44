//! Error type returned by [`crate::server::ActionServer`] operations.

use std::fmt;

/// Everything that can go wrong inside an [`crate::server::ActionServer`].
///
/// Mirrors the error kinds an `rcl_action`-style server reports: most are
/// specific enough for a caller to branch on, with [`ActionServerError::Error`]
/// as the catch-all that always carries a descriptive message.
#[derive(Debug)]
pub enum ActionServerError {
    /// A caller-supplied argument was invalid (null goal id, zero UUID where one
    /// is required, etc).
    InvalidArgument(String),
    /// The operation was attempted on a server that is not initialized.
    ActionServerInvalid,
    /// The companion node backing this server is no longer usable.
    NodeInvalid,
    /// `init` was called on an already-initialized server.
    AlreadyInit,
    /// Allocation failed while growing server-owned storage.
    BadAlloc,
    /// A derived service/topic name was rejected.
    ActionNameInvalid(String),
    /// No request was waiting on a take operation. Callers typically treat this
    /// as "try again later" rather than a hard failure.
    ActionServerTakeFailed,
    /// Catch-all, always carries a human-readable message.
    Error(String),
}

impl fmt::Display for ActionServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionServerError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ActionServerError::ActionServerInvalid => {
                write!(f, "action server is not initialized")
            }
            ActionServerError::NodeInvalid => write!(f, "node is invalid"),
            ActionServerError::AlreadyInit => write!(f, "action server is already initialized"),
            ActionServerError::BadAlloc => write!(f, "allocation failed"),
            ActionServerError::ActionNameInvalid(name) => {
                write!(f, "invalid action name: {name}")
            }
            ActionServerError::ActionServerTakeFailed => {
                write!(f, "no request was available to take")
            }
            ActionServerError::Error(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ActionServerError {}

impl ActionServerError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        ActionServerError::InvalidArgument(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        ActionServerError::Error(msg.into())
    }
}

/// Result alias used throughout this crate.
pub type ActionServerResult<T> = Result<T, ActionServerError>;
