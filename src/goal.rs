//! Wire types describing a goal, its status, and cancellation.
//!
//! These mirror the `action_msgs` ROS 2 message definitions; the 4-way cancel
//! policy documented on [`CancelGoalRequest`] is resolved by
//! [`crate::server::ActionServer::process_cancel_request`].

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use uuid::Uuid;

use crate::message::Message;
use crate::time::Stamp;

/// A unique identifier for a goal. The all-zero UUID is a sentinel meaning
/// "no particular goal" in cancel requests.
pub type GoalId = Uuid;

/// From [GoalInfo](https://docs.ros2.org/foxy/api/action_msgs/msg/GoalInfo.html)
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GoalInfo {
    /// Identifies the goal. Set by the client at submission time.
    pub goal_id: GoalId,
    /// Time the goal was accepted. Always overwritten by the server at
    /// acceptance; a client-supplied value here is not trusted.
    pub stamp: Stamp,
}
impl Message for GoalInfo {}

impl GoalInfo {
    pub fn new(goal_id: GoalId, stamp: Stamp) -> Self {
        GoalInfo { goal_id, stamp }
    }
}

/// The status of a goal's progress toward completion.
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Eq, Debug)]
#[repr(i8)]
pub enum GoalStatusEnum {
    /// Status unknown, or the server has not yet responded. Also used for
    /// brand-new goals before acceptance.
    Unknown = 0,
    /// Accepted and awaiting execution.
    Accepted = 1,
    /// Currently executing.
    Executing = 2,
    /// A cancel request was accepted; the goal is unwinding.
    Canceling = 3,
    /// Completed successfully.
    Succeeded = 4,
    /// Canceled at a client's request.
    Canceled = 5,
    /// Aborted by the server without an external cancel request.
    Aborted = 6,
}

impl GoalStatusEnum {
    /// Terminal states are no longer cancelable and are subject to the
    /// retention-window expiration sweep.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            GoalStatusEnum::Succeeded | GoalStatusEnum::Canceled | GoalStatusEnum::Aborted
        )
    }
}

/// From [GoalStatus](https://docs.ros2.org/foxy/api/action_msgs/msg/GoalStatus.html)
#[derive(Clone, Copy, Serialize, Deserialize, Debug)]
pub struct GoalStatus {
    pub goal_info: GoalInfo,
    pub status: GoalStatusEnum,
}
impl Message for GoalStatus {}

/// From [GoalStatusArray](https://docs.ros2.org/foxy/api/action_msgs/msg/GoalStatusArray.html)
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct GoalStatusArray {
    pub status_list: Vec<GoalStatus>,
}
impl Message for GoalStatusArray {}

/// From [CancelGoal](https://docs.ros2.org/foxy/api/action_msgs/srv/CancelGoal.html)
///
/// Cancels one or more goals under the following policy:
///
/// - goal ID zero, stamp zero: cancel every cancelable goal.
/// - goal ID zero, stamp set: cancel every cancelable goal accepted at or
///   before the stamp.
/// - goal ID set, stamp zero: cancel the goal with that ID, regardless of
///   when it was accepted.
/// - goal ID set, stamp set: cancel the goal with that ID, plus every
///   cancelable goal accepted at or before the stamp.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CancelGoalRequest {
    pub goal_info: GoalInfo,
}
impl Message for CancelGoalRequest {}

impl CancelGoalRequest {
    pub fn new(goal_id: GoalId, stamp: Stamp) -> Self {
        CancelGoalRequest {
            goal_info: GoalInfo { goal_id, stamp },
        }
    }
}

/// From [CancelGoal](https://docs.ros2.org/foxy/api/action_msgs/srv/CancelGoal.html)
#[derive(Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Debug)]
#[repr(i8)]
pub enum CancelGoalResponseEnum {
    /// Request accepted; one or more goals transitioned to `Canceling`.
    None = 0,
    /// Request rejected; no goals transitioned.
    Rejected = 1,
    /// The requested goal ID does not exist.
    UnknownGoal = 2,
    /// The requested goal exists but is already in a terminal state.
    GoalTerminated = 3,
}

/// A response to a [`CancelGoalRequest`].
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct CancelGoalResponse {
    pub return_code: CancelGoalResponseEnum,
    pub goals_canceling: Vec<GoalInfo>,
}
impl Message for CancelGoalResponse {}

impl CancelGoalResponse {
    pub fn rejected() -> Self {
        CancelGoalResponse {
            return_code: CancelGoalResponseEnum::Rejected,
            goals_canceling: Vec::new(),
        }
    }

    pub fn unknown_goal() -> Self {
        CancelGoalResponse {
            return_code: CancelGoalResponseEnum::UnknownGoal,
            goals_canceling: Vec::new(),
        }
    }

    pub fn goal_terminated() -> Self {
        CancelGoalResponse {
            return_code: CancelGoalResponseEnum::GoalTerminated,
            goals_canceling: Vec::new(),
        }
    }

    pub fn accepted(goals_canceling: Vec<GoalInfo>) -> Self {
        CancelGoalResponse {
            return_code: CancelGoalResponseEnum::None,
            goals_canceling,
        }
    }
}

/// Request sent by a client to submit a new goal, wrapping the
/// action-specific goal payload alongside its [`GoalId`].
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SendGoalRequest<Goal> {
    pub goal_id: GoalId,
    pub goal: Goal,
}
impl<Goal: Message> Message for SendGoalRequest<Goal> {}

/// Server's reply to a [`SendGoalRequest`].
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct SendGoalResponse {
    pub accepted: bool,
    pub stamp: Stamp,
}
impl Message for SendGoalResponse {}

/// Request to fetch the final result of a (presumably terminated) goal.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GetResultRequest {
    pub goal_id: GoalId,
}
impl Message for GetResultRequest {}

/// Server's reply to a [`GetResultRequest`].
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct GetResultResponse<Res> {
    pub status: GoalStatusEnum,
    pub result: Res,
}
impl<Res: Message> Message for GetResultResponse<Res> {}

/// One feedback update, published while a goal executes.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct FeedbackMessage<Feedback> {
    pub goal_id: GoalId,
    pub feedback: Feedback,
}
impl<Feedback: Message> Message for FeedbackMessage<Feedback> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(!GoalStatusEnum::Executing.is_terminal());
        assert!(!GoalStatusEnum::Canceling.is_terminal());
        assert!(GoalStatusEnum::Succeeded.is_terminal());
        assert!(GoalStatusEnum::Canceled.is_terminal());
        assert!(GoalStatusEnum::Aborted.is_terminal());
    }

    #[test]
    fn cancel_request_carries_zero_sentinels_by_default() {
        let req = CancelGoalRequest::new(GoalId::nil(), Stamp::ZERO);
        assert!(req.goal_info.goal_id.is_nil());
        assert!(req.goal_info.stamp.is_zero());
    }
}
