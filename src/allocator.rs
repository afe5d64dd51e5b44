//! The allocator collaborator.
//!
//! `rcl_action` threads an explicit `rcl_allocator_t` through every call so
//! callers can control where goal-table storage lives. In a language where
//! every value already has a single owner and a deterministic drop, that
//! vtable collapses to a marker: a `GoalAllocator` identifies which
//! allocation *strategy* the server was built with, without the server
//! needing to call through it for every `Vec` push.

/// Capability marker identifying the allocation strategy a server was
/// constructed with. Carried on [`crate::options::ServerOptions`] for parity
/// with the original per-call allocator argument; implementations are
/// expected to be zero-sized.
pub trait GoalAllocator: Clone + Default {
    /// A short, stable name for diagnostics/logging.
    fn name(&self) -> &'static str;
}

/// The ordinary global allocator, used unless a server is explicitly built
/// with something else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultAllocator;

impl GoalAllocator for DefaultAllocator {
    fn name(&self) -> &'static str {
        "default"
    }
}
