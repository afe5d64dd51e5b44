//! Transport collaborators: the request/response services and publishers an
//! [`crate::server::ActionServer`] is built from, plus the five derived
//! endpoint names.
//!
//! The wire format and the actual network/IPC machinery are entirely outside
//! this crate's scope; these traits are the seam the server core calls
//! through.

use crate::error::{ActionServerError, ActionServerResult};
use crate::message::Message;

/// Identifies which pending request a response corresponds to. Transports
/// that don't need this (e.g. the in-memory testkit) can use the unit type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId {
    pub writer_guid: [u8; 16],
    pub sequence_number: i64,
}

/// A bound request/response endpoint (what ROS 2 calls a Service server).
pub trait ServiceEndpoint {
    type Request: Message;
    type Response: Message;

    /// Pulls one pending request, if any is available.
    fn take_request(&mut self) -> ActionServerResult<Option<(RequestId, Self::Request)>>;

    /// Sends a response correlated to a prior `take_request`.
    fn send_response(&mut self, id: RequestId, response: Self::Response) -> ActionServerResult<()>;

    fn is_valid(&self) -> bool {
        true
    }
}

/// A bound publisher (what ROS 2 calls a Topic writer).
pub trait PublisherEndpoint {
    type Msg: Message;

    fn publish(&mut self, msg: Self::Msg) -> ActionServerResult<()>;

    fn is_valid(&self) -> bool {
        true
    }
}

/// The five service/topic names derived from an action's base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEndpointNames {
    pub send_goal: String,
    pub cancel_goal: String,
    pub get_result: String,
    pub feedback: String,
    pub status: String,
}

impl ActionEndpointNames {
    pub fn derive(action_name: &str) -> ActionServerResult<Self> {
        validate_action_name(action_name)?;
        Ok(ActionEndpointNames {
            send_goal: format!("{action_name}/_action/send_goal"),
            cancel_goal: format!("{action_name}/_action/cancel_goal"),
            get_result: format!("{action_name}/_action/get_result"),
            feedback: format!("{action_name}/_action/feedback"),
            status: format!("{action_name}/_action/status"),
        })
    }
}

/// Validates an action base name against the ROS 2 token alphabet: non-empty,
/// starts with `/`, no consecutive `/`, no embedded NUL, and otherwise only
/// alphanumerics, `_`, and `/` between path segments.
pub fn validate_action_name(name: &str) -> ActionServerResult<()> {
    if name.is_empty() {
        return Err(ActionServerError::ActionNameInvalid(
            "action name must not be empty".to_string(),
        ));
    }
    if !name.starts_with('/') {
        return Err(ActionServerError::ActionNameInvalid(format!(
            "action name {name:?} must be fully qualified (start with '/')"
        )));
    }
    if name.contains("//") {
        return Err(ActionServerError::ActionNameInvalid(format!(
            "action name {name:?} must not contain consecutive '/'"
        )));
    }
    if name.contains('\0') {
        return Err(ActionServerError::ActionNameInvalid(format!(
            "action name {name:?} must not contain a NUL byte"
        )));
    }
    let mut segments = name.split('/').filter(|s| !s.is_empty());
    let valid_segment = |s: &str| {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
            && s.chars().next().map(|c| !c.is_ascii_digit()).unwrap_or(false)
    };
    if !segments.all(valid_segment) {
        return Err(ActionServerError::ActionNameInvalid(format!(
            "action name {name:?} contains an invalid token"
        )));
    }
    Ok(())
}
