//! Game clock driven by the map tick.
use std::sync::atomic::{AtomicU64, Ordering};

use world_core::{GameClock, Timestamp};

/// Monotonic game time advanced only by [`MapClock::advance`].
///
/// Within a tick every reader sees the same instant, so cooldowns and
/// respawn timers compare against a stable `now`.
#[derive(Debug, Default)]
pub struct MapClock {
    now_ms: AtomicU64,
}

impl MapClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Starts at the current wall-clock time.
    pub fn from_wall_clock() -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self::new(u64::try_from(now).unwrap_or_default())
    }

    pub fn advance(&self, diff_ms: u32) {
        self.now_ms.fetch_add(u64::from(diff_ms), Ordering::AcqRel);
    }

    pub fn advance_secs(&self, secs: u32) {
        self.now_ms
            .fetch_add(u64::from(secs) * 1000, Ordering::AcqRel);
    }
}

impl GameClock for MapClock {
    fn now(&self) -> Timestamp {
        Timestamp((self.now_ms() / 1000) as i64)
    }

    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Acquire)
    }
}
