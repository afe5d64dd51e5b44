//! The per-goal state-machine collaborator.
//!
//! The server core treats a goal's internal lifecycle as a black box: it only
//! asks whether a handle is active, whether it can be canceled, and tells it
//! to transition on an event. Everything about *how* a goal executes lives
//! outside this crate.

use crate::goal::{GoalInfo, GoalStatusEnum};
use crate::error::ActionServerResult;

/// Events that can be fed into a goal handle's `transition`.
///
/// Matches the event set `rcl_action`'s own goal-handle state machine uses
/// internally (`execute` / `cancel_goal` / `succeed` / `abort` / `canceled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalEvent {
    Execute,
    CancelGoal,
    Succeed,
    Abort,
    Canceled,
}

/// The external per-goal state machine. Implementations own whatever
/// execution state a goal needs; the server only calls the methods below.
pub trait GoalHandle {
    /// The goal's immutable identity and acceptance stamp.
    fn info(&self) -> GoalInfo;

    /// Current status, derived from whatever internal state this handle has
    /// reached.
    fn status(&self) -> GoalStatusEnum;

    /// True while the goal has not yet reached a terminal status.
    fn is_active(&self) -> bool {
        !self.status().is_terminal()
    }

    /// True if a cancel request may currently be applied to this goal
    /// (typically: accepted or executing, not already canceling or
    /// terminal).
    fn is_cancelable(&self) -> bool;

    /// Applies an event, mutating internal status. Returns an error if the
    /// event is not valid from the current state.
    fn transition(&mut self, event: GoalEvent) -> ActionServerResult<()>;
}
