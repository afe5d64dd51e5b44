//! Server construction options.

use std::time::Duration;

use crate::allocator::{DefaultAllocator, GoalAllocator};

/// A deliberately small QoS vocabulary covering the handful of knobs
/// `rcl_action`'s default options actually vary, rather than the full DDS QoS
/// surface (which belongs to the transport collaborator, not this core).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QosProfile {
    pub reliability: Reliability,
    pub history_depth: usize,
    pub durability: Durability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    BestEffort,
    Reliable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Durability {
    Volatile,
    TransientLocal,
}

impl Default for QosProfile {
    fn default() -> Self {
        QosProfile::builder().build()
    }
}

impl QosProfile {
    pub fn builder() -> QosProfileBuilder {
        QosProfileBuilder::default()
    }
}

/// Builder for [`QosProfile`], in the same incremental style the teacher's
/// DDS layer exposes via `QosPolicyBuilder`.
#[derive(Debug, Clone, Copy)]
pub struct QosProfileBuilder {
    reliability: Reliability,
    history_depth: usize,
    durability: Durability,
}

impl Default for QosProfileBuilder {
    fn default() -> Self {
        QosProfileBuilder {
            reliability: Reliability::Reliable,
            history_depth: 10,
            durability: Durability::Volatile,
        }
    }
}

impl QosProfileBuilder {
    pub fn reliability(mut self, reliability: Reliability) -> Self {
        self.reliability = reliability;
        self
    }

    pub fn history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    pub fn durability(mut self, durability: Durability) -> Self {
        self.durability = durability;
        self
    }

    pub fn build(self) -> QosProfile {
        QosProfile {
            reliability: self.reliability,
            history_depth: self.history_depth,
            durability: self.durability,
        }
    }
}

/// Result-retention default: 15 minutes, matching
/// `rcl_action_server_get_default_options()`.
pub const DEFAULT_RESULT_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Construction options for an [`crate::server::ActionServer`].
#[derive(Debug, Clone)]
pub struct ServerOptions<A: GoalAllocator = DefaultAllocator> {
    pub goal_service_qos: QosProfile,
    pub cancel_service_qos: QosProfile,
    pub result_service_qos: QosProfile,
    pub feedback_topic_qos: QosProfile,
    pub status_topic_qos: QosProfile,
    /// How long a terminated goal's handle is retained after its acceptance
    /// stamp before the expiration sweep disposes of it.
    pub result_timeout: Duration,
    pub allocator: A,
}

impl<A: GoalAllocator> Default for ServerOptions<A> {
    fn default() -> Self {
        ServerOptions {
            goal_service_qos: QosProfile::default(),
            cancel_service_qos: QosProfile::default(),
            result_service_qos: QosProfile::default(),
            feedback_topic_qos: QosProfile::builder()
                .reliability(Reliability::BestEffort)
                .build(),
            status_topic_qos: QosProfile::builder()
                .durability(Durability::TransientLocal)
                .build(),
            result_timeout: DEFAULT_RESULT_TIMEOUT,
            allocator: A::default(),
        }
    }
}
