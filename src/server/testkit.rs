//! An in-memory reference backend for exercising [`super::ActionServer`]
//! without any real transport or DDS dependency.
//!
//! Stands in for the collaborators spec'd out of this crate's scope: a
//! [`ChannelService`]/[`ChannelPublisher`] pair in place of a DDS-backed
//! request/response service and topic writer, and [`ReferenceGoalHandle`] in
//! place of an externally-owned per-goal state machine.

use std::collections::VecDeque;

use crate::allocator::DefaultAllocator;
use crate::error::{ActionServerError, ActionServerResult};
use crate::goal::{
    CancelGoalRequest, CancelGoalResponse, FeedbackMessage, GetResultRequest, GetResultResponse,
    GoalInfo, GoalStatusArray, GoalStatusEnum, SendGoalRequest, SendGoalResponse,
};
use crate::goal_handle::{GoalEvent, GoalHandle};
use crate::message::Message;
use crate::time::ManualClock;
use crate::transport::{PublisherEndpoint, RequestId, ServiceEndpoint};

use super::{ActionEndpoints, ActionServerBackend};

/// A request/response service backed by two in-memory queues. Tests push
/// requests in with [`ChannelService::push_request`] and read sent responses
/// back out with [`ChannelService::pop_response`].
pub struct ChannelService<Q, S> {
    pending: VecDeque<(RequestId, Q)>,
    sent: VecDeque<(RequestId, S)>,
    next_seq: i64,
    valid: bool,
}

impl<Q, S> Default for ChannelService<Q, S> {
    fn default() -> Self {
        ChannelService {
            pending: VecDeque::new(),
            sent: VecDeque::new(),
            next_seq: 0,
            valid: true,
        }
    }
}

impl<Q, S> ChannelService<Q, S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_request(&mut self, req: Q) -> RequestId {
        let id = RequestId {
            writer_guid: [0; 16],
            sequence_number: self.next_seq,
        };
        self.next_seq += 1;
        self.pending.push_back((id, req));
        id
    }

    pub fn pop_response(&mut self) -> Option<(RequestId, S)> {
        self.sent.pop_front()
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}

impl<Q: Message, S: Message> ServiceEndpoint for ChannelService<Q, S> {
    type Request = Q;
    type Response = S;

    fn take_request(&mut self) -> ActionServerResult<Option<(RequestId, Q)>> {
        Ok(self.pending.pop_front())
    }

    fn send_response(&mut self, id: RequestId, response: S) -> ActionServerResult<()> {
        self.sent.push_back((id, response));
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A publisher backed by an in-memory queue; tests drain it with
/// [`ChannelPublisher::take_published`].
pub struct ChannelPublisher<M> {
    published: VecDeque<M>,
    valid: bool,
}

impl<M> Default for ChannelPublisher<M> {
    fn default() -> Self {
        ChannelPublisher {
            published: VecDeque::new(),
            valid: true,
        }
    }
}

impl<M> ChannelPublisher<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_published(&mut self) -> Option<M> {
        self.published.pop_front()
    }
}

impl<M: Message> PublisherEndpoint for ChannelPublisher<M> {
    type Msg = M;

    fn publish(&mut self, msg: M) -> ActionServerResult<()> {
        self.published.push_back(msg);
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

/// A minimal goal-handle state machine covering the seven ROS 2 goal
/// statuses, used as the reference `GoalHandle` collaborator in tests.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceGoalHandle {
    info: GoalInfo,
    status: GoalStatusEnum,
}

impl ReferenceGoalHandle {
    pub fn new(info: GoalInfo) -> Self {
        ReferenceGoalHandle {
            info,
            status: GoalStatusEnum::Accepted,
        }
    }
}

impl GoalHandle for ReferenceGoalHandle {
    fn info(&self) -> GoalInfo {
        self.info
    }

    fn status(&self) -> GoalStatusEnum {
        self.status
    }

    fn is_cancelable(&self) -> bool {
        matches!(self.status, GoalStatusEnum::Accepted | GoalStatusEnum::Executing)
    }

    fn transition(&mut self, event: GoalEvent) -> ActionServerResult<()> {
        use GoalStatusEnum::*;
        let next = match (self.status, event) {
            (Accepted, GoalEvent::Execute) => Executing,
            (Accepted, GoalEvent::CancelGoal) | (Executing, GoalEvent::CancelGoal) => Canceling,
            (Executing, GoalEvent::Succeed) => Succeeded,
            (Accepted, GoalEvent::Abort) | (Executing, GoalEvent::Abort) => Aborted,
            (Canceling, GoalEvent::Canceled) => Canceled,
            (current, event) => {
                return Err(ActionServerError::other(format!(
                    "invalid transition {event:?} from {current:?}"
                )))
            }
        };
        self.status = next;
        Ok(())
    }
}

/// A backend wiring `i32` goal/result/feedback payloads onto the in-memory
/// channel endpoints above, with a [`ManualClock`] so tests control time
/// exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceBackend;

impl ActionServerBackend for ReferenceBackend {
    type Goal = i32;
    type ResultPayload = i32;
    type Feedback = i32;

    type GoalService = ChannelService<SendGoalRequest<i32>, SendGoalResponse>;
    type CancelService = ChannelService<CancelGoalRequest, CancelGoalResponse>;
    type ResultService = ChannelService<GetResultRequest, GetResultResponse<i32>>;
    type FeedbackPublisher = ChannelPublisher<FeedbackMessage<i32>>;
    type StatusPublisher = ChannelPublisher<GoalStatusArray>;

    type Handle = ReferenceGoalHandle;
    type Clock = ManualClock;
    type Allocator = DefaultAllocator;

    fn new_goal_handle(&self, info: GoalInfo, _goal: i32) -> ReferenceGoalHandle {
        ReferenceGoalHandle::new(info)
    }
}

/// Convenience constructor for a full set of in-memory endpoints matching
/// [`ReferenceBackend`].
pub fn reference_endpoints() -> ActionEndpoints<ReferenceBackend> {
    ActionEndpoints {
        goal_service: ChannelService::new(),
        cancel_service: ChannelService::new(),
        result_service: ChannelService::new(),
        feedback_publisher: ChannelPublisher::new(),
        status_publisher: ChannelPublisher::new(),
    }
}
