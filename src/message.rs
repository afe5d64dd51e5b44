//! Defines [`Message`], the serialization capability required of anything
//! that flows through a goal, feedback, status, or result payload.

use serde::{de::DeserializeOwned, Serialize};

/// Marker trait for types that can cross the goal/feedback/result/status
/// boundary. The core never inspects payload contents; it only needs them
/// serializable so a transport collaborator can move them over the wire.
pub trait Message: Serialize + DeserializeOwned {}

impl Message for () {}
impl Message for String {}

impl Message for i8 {}
impl Message for i16 {}
impl Message for i32 {}
impl Message for i64 {}

impl Message for u8 {}
impl Message for u16 {}
impl Message for u32 {}
impl Message for u64 {}

impl Message for f32 {}
impl Message for f64 {}

impl Message for bool {}

impl<T: Message> Message for Vec<T> {}
impl<T: Message> Message for Option<T> {}
