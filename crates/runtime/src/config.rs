//! Runtime configuration.
use std::env;
use std::path::PathBuf;

use world_core::MapId;

/// Runtime configuration shared across the map driver and workers.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Milliseconds of game time advanced by one tick.
    pub tick_ms: u32,
    /// Ticks between two flushes of deferred respawn records.
    pub flush_interval_ticks: u32,
    /// Retries of a failed durable write before it is dropped.
    pub persist_retries: u32,
    /// Directory of durable respawn records; `None` keeps them in memory.
    pub data_dir: Option<PathBuf>,
    /// Content directory read by `world-content`.
    pub content_dir: PathBuf,
    pub map: MapId,
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_MS: u32 = 100;
    pub const DEFAULT_FLUSH_INTERVAL_TICKS: u32 = 50;
    pub const DEFAULT_PERSIST_RETRIES: u32 = 3;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `WORLD_TICK_MS` - Tick length in milliseconds (default: 100, min 1)
    /// - `WORLD_FLUSH_TICKS` - Ticks between deferred flushes (default: 50)
    /// - `WORLD_DATA_DIR` - Respawn record directory (default: in memory)
    /// - `WORLD_CONTENT_DIR` - Content directory (default: `data`)
    /// - `WORLD_MAP_ID` - Map to simulate (default: 1)
    /// - `WORLD_LOG_DIR` - Enables the log file layer in this directory
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(tick) = read_env::<u32>("WORLD_TICK_MS") {
            config.tick_ms = tick.max(1);
        }
        if let Some(ticks) = read_env::<u32>("WORLD_FLUSH_TICKS") {
            config.flush_interval_ticks = ticks.max(1);
        }
        if let Some(dir) = read_env::<PathBuf>("WORLD_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Some(dir) = read_env::<PathBuf>("WORLD_CONTENT_DIR") {
            config.content_dir = dir;
        }
        if let Some(map) = read_env::<u32>("WORLD_MAP_ID") {
            config.map = MapId(map);
        }
        if let Some(dir) = read_env::<PathBuf>("WORLD_LOG_DIR") {
            config.logging.log_dir = Some(dir);
        }

        config
    }

    pub fn with_tick_ms(mut self, tick_ms: u32) -> Self {
        self.tick_ms = tick_ms.max(1);
        self
    }

    pub fn with_flush_interval(mut self, ticks: u32) -> Self {
        self.flush_interval_ticks = ticks.max(1);
        self
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = dir.into();
        self
    }

    pub fn with_map(mut self, map: MapId) -> Self {
        self.map = map;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            flush_interval_ticks: Self::DEFAULT_FLUSH_INTERVAL_TICKS,
            persist_retries: Self::DEFAULT_PERSIST_RETRIES,
            data_dir: None,
            content_dir: PathBuf::from("data"),
            map: MapId(1),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging sinks.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Write a log file here in addition to stderr.
    pub log_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_owned(),
            log_dir: None,
            file_name: "world.log".to_owned(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
