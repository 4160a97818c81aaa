use crate::state::Timestamp;

/// Read-only game time source.
///
/// Elapsed time inside a tick always comes from the driver's delta; the
/// clock is only consulted for absolute respawn and cooldown comparisons.
pub trait GameClock: Send + Sync {
    /// Current game time in whole seconds.
    fn now(&self) -> Timestamp;

    /// Current game time in milliseconds.
    fn now_ms(&self) -> u64;
}
