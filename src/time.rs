//! Server-side timestamps and the clock collaborator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A timestamp split into seconds and nanoseconds, matching the wire form of
/// `builtin_interfaces/msg/Time`.
///
/// Conversion to and from a flat nanosecond count truncates toward zero, so
/// `sec * 1_000_000_000 + nanosec == t` for every non-negative `t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: i32,
    pub nanosec: u32,
}

const NANOS_PER_SEC: i64 = 1_000_000_000;

impl Stamp {
    pub const ZERO: Stamp = Stamp { sec: 0, nanosec: 0 };

    /// Splits a nanosecond instant into the `(sec, nanosec)` wire form.
    pub fn from_nanos(t: i64) -> Stamp {
        let sec = t / NANOS_PER_SEC;
        let nanosec = t - sec * NANOS_PER_SEC;
        Stamp {
            sec: sec as i32,
            nanosec: nanosec as u32,
        }
    }

    /// Recombines the split form into a flat nanosecond instant.
    pub fn to_nanos(self) -> i64 {
        (self.sec as i64) * NANOS_PER_SEC + self.nanosec as i64
    }

    pub fn is_zero(self) -> bool {
        self.sec == 0 && self.nanosec == 0
    }
}

/// The clock collaborator: a monotonic source of nanosecond instants.
///
/// Implementations are copied by value at server `init`, so later changes to
/// an original clock elsewhere do not affect a server that already holds one.
pub trait Clock: Clone {
    /// Reads the current time, in nanoseconds on whatever epoch the
    /// implementation uses (the core only ever takes differences).
    fn now(&self) -> i64;

    fn is_valid(&self) -> bool {
        true
    }
}

/// A `Clock` backed by the operating system's steady clock.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos() as i64
    }
}

/// A `Clock` whose reading is set explicitly, for deterministic tests.
///
/// Cloning shares the underlying instant (via `Rc`) rather than forking it,
/// so a test can hold one handle, hand a clone to a server at `init`, and
/// keep advancing time through the original.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ns: std::rc::Rc<std::cell::Cell<i64>>,
}

impl ManualClock {
    pub fn new(start_ns: i64) -> Self {
        ManualClock {
            now_ns: std::rc::Rc::new(std::cell::Cell::new(start_ns)),
        }
    }

    pub fn advance(&self, delta: Duration) {
        self.now_ns.set(self.now_ns.get() + delta.as_nanos() as i64);
    }

    pub fn set(&self, now_ns: i64) {
        self.now_ns.set(now_ns);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now_ns.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 0, 0)]
    #[test_case(1_500_000_000, 1, 500_000_000)]
    #[test_case(999_999_999, 0, 999_999_999)]
    #[test_case(1_000_000_000, 1, 0)]
    fn stamp_round_trips(nanos: i64, sec: i32, nanosec: u32) {
        let stamp = Stamp::from_nanos(nanos);
        assert_eq!(stamp.sec, sec);
        assert_eq!(stamp.nanosec, nanosec);
        assert_eq!(stamp.to_nanos(), nanos);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(Duration::from_nanos(50));
        assert_eq!(clock.now(), 150);
    }
}
