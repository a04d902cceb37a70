//! Session Clock
//!
//! Frame timestamps are plain milliseconds relative to an arbitrary session
//! origin. The external detector stamps each frame; the live loop stamps
//! control-signal handling with [`SessionClock`]. Nothing here needs wall
//! time: cooldown arithmetic only ever compares two timestamps from the
//! same session.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A monotonic timestamp in milliseconds since the session origin.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create a timestamp from raw milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// Raw millisecond value.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`. Saturates at zero if `earlier`
    /// is in the future (out-of-order detector frames must not underflow).
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl From<u64> for Timestamp {
    fn from(ms: u64) -> Self {
        Self(ms)
    }
}

/// Wall-clock-free session clock for the live frame loop.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    /// Start a new session clock at the current instant.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Current timestamp relative to the session origin.
    pub fn now(&self) -> Timestamp {
        Timestamp(self.origin.elapsed().as_millis() as u64)
    }
}
