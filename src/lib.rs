//! # `action-server-core`
//!
//! A reactive, transport-agnostic implementation of the server side of a
//! ROS 2-style Action: goal submission, feedback, cancellation, and
//! result retention, built around a small set of collaborator traits so the
//! protocol logic can be tested without any real middleware.
//!
//! ## Quick Start
//!
//! Most of this crate's types are available from the `prelude`:
//!
//! ```
//! use action_server_core::prelude::*;
//! ```
//!
//! ### Example
//!
//! An [`ActionServer`] is generic over an [`ActionServerBackend`], which
//! bundles the goal/result/feedback payload types together with the
//! transport, clock, and per-goal state-machine collaborators. The
//! [`testkit`](server::testkit) module supplies an in-memory backend so the
//! protocol can be exercised with nothing more than this crate:
//!
//! ```
//! use action_server_core::prelude::*;
//! use action_server_core::server::testkit::{reference_endpoints, ReferenceBackend};
//!
//! let mut server = ActionServer::<ReferenceBackend>::zero_initialized();
//! server
//!     .init(
//!         ReferenceBackend,
//!         ManualClock::new(0),
//!         "/fibonacci",
//!         ServerOptions::default(),
//!         reference_endpoints(),
//!     )
//!     .expect("init should succeed");
//!
//! let goal_id = uuid::Uuid::new_v4();
//! let handle = server
//!     .accept_new_goal(GoalInfo::new(goal_id, Stamp::ZERO), 5)
//!     .expect("goal should be accepted");
//! assert!(handle.is_cancelable());
//! assert!(server.goal_exists(goal_id).unwrap());
//! ```
//!
//! ## Collaborators
//!
//! This crate deliberately does not depend on any particular pub/sub or
//! request/response transport, any particular clock, or any particular
//! goal-execution state machine. Those are expressed as the traits in
//! [`transport`], [`time`], and [`goal_handle`], and bundled together per
//! Action type by [`server::ActionServerBackend`].

pub mod allocator;
pub mod error;
pub mod goal;
pub mod goal_handle;
pub mod message;
pub mod options;
pub mod server;
pub mod time;
pub mod transport;

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::allocator::{DefaultAllocator, GoalAllocator};
    pub use crate::error::{ActionServerError, ActionServerResult};
    pub use crate::goal::{
        CancelGoalRequest, CancelGoalResponse, CancelGoalResponseEnum, FeedbackMessage,
        GetResultRequest, GetResultResponse, GoalId, GoalInfo, GoalStatus, GoalStatusArray,
        GoalStatusEnum, SendGoalRequest, SendGoalResponse,
    };
    pub use crate::goal_handle::{GoalEvent, GoalHandle};
    pub use crate::message::Message;
    pub use crate::options::{QosProfile, ServerOptions};
    pub use crate::server::{ActionEndpoints, ActionServer, ActionServerBackend, CancelOutcome};
    pub use crate::time::{Clock, ManualClock, Stamp, SystemClock};
    pub use crate::transport::{ActionEndpointNames, PublisherEndpoint, RequestId, ServiceEndpoint};
}
