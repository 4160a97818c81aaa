use crate::env::Difficulty;

/// How respawn delays react to the number of players in the zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RespawnScalingMode {
    /// Template delay is used as-is.
    #[default]
    Off,
    /// Delays shrink as the zone population grows.
    Population,
}

/// World configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Dynamic respawn scaling mode for game objects.
    pub respawn_scaling: RespawnScalingMode,
    /// Population rate: delays scale by `rate / players_in_zone`.
    pub respawn_scaling_rate: f32,
    /// Delays at or below this many seconds are never scaled.
    pub respawn_scaling_minimum_secs: u32,
    /// Write respawn records through to durable storage on every despawn.
    pub save_respawn_time_immediately: bool,
    /// Map difficulty used for spell lookups.
    pub difficulty: Difficulty,
    /// Base seed mixed into every jitter roll.
    pub map_seed: u64,
    /// Distance an owned creature keeps while following its owner.
    pub follow_distance: f32,
}

impl WorldConfig {
    // ===== fixed rule constants =====
    /// Seconds before respawn time at which a fishing bobber becomes ready.
    pub const FISHING_BOBBER_READY_SECS: i64 = 5;
    /// Arming delay of bomb-type traps (two charges).
    pub const BOMB_ARM_DELAY_MS: u64 = 10_000;
    /// Re-cast cooldown of traps that do not define one.
    pub const DEFAULT_TRAP_COOLDOWN_SECS: u32 = 4;
    /// Inclusive jitter added when copying a master spawn's respawn time.
    pub const LINKED_RESPAWN_JITTER_SECS: (u32, u32) = (5, 60);
    /// Reschedule delay of a spawn linked to itself; re-applied forever.
    pub const SELF_LINKED_RESPAWN_DELAY_SECS: u32 = 7 * 24 * 60 * 60;
    /// Interval of the transport stop-frame visual toggle.
    pub const TRANSPORT_STATE_UPDATE_MS: u32 = 20_000;
    /// Duration of the distract triggered by a stealth alert.
    pub const ALERT_DURATION_MS: u32 = 5_000;
    /// Health of destructible buildings without an explicit value.
    pub const DEFAULT_BUILDING_HEALTH: u32 = 20_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SCALING_RATE: f32 = 10.0;
    pub const DEFAULT_SCALING_MINIMUM_SECS: u32 = 10;
    pub const DEFAULT_FOLLOW_DISTANCE: f32 = 1.0;

    pub fn new() -> Self {
        Self {
            respawn_scaling: RespawnScalingMode::Off,
            respawn_scaling_rate: Self::DEFAULT_SCALING_RATE,
            respawn_scaling_minimum_secs: Self::DEFAULT_SCALING_MINIMUM_SECS,
            save_respawn_time_immediately: false,
            difficulty: Difficulty::Normal,
            map_seed: 0,
            follow_distance: Self::DEFAULT_FOLLOW_DISTANCE,
        }
    }

    pub fn with_population_scaling(mut self, rate: f32, minimum_secs: u32) -> Self {
        self.respawn_scaling = RespawnScalingMode::Population;
        self.respawn_scaling_rate = rate;
        self.respawn_scaling_minimum_secs = minimum_secs;
        self
    }

    pub fn with_immediate_saves(mut self, enabled: bool) -> Self {
        self.save_respawn_time_immediately = enabled;
        self
    }

    pub fn with_map_seed(mut self, seed: u64) -> Self {
        self.map_seed = seed;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new()
    }
}
