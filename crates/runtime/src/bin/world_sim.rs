//! Headless world simulator.
//!
//! Loads a content directory, populates the configured map and ticks it for
//! a bounded number of ticks. A scripted visitor walks through the map so
//! creatures have someone to notice.
//!
//! # Examples
//!
//! ```bash
//! WORLD_CONTENT_DIR=data WORLD_SIM_TICKS=300 RUST_LOG=debug cargo run -p world-runtime --bin world-sim
//! ```

use anyhow::{Context, Result};
use world_content::ContentFactory;
use world_core::{Interactor, ObjectGuid, Position};
use world_runtime::{Runtime, RuntimeConfig, RuntimeError, init_logging};

const DEFAULT_SIM_TICKS: u64 = 600;
const VISITOR: ObjectGuid = ObjectGuid(1);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // 1. Configuration and logging
    let config = RuntimeConfig::from_env();
    let _log_guard = init_logging(&config.logging)?;
    let ticks = std::env::var("WORLD_SIM_TICKS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_SIM_TICKS);

    tracing::info!(content = %config.content_dir.display(), map = config.map.0, ticks, "starting world simulator");

    // 2. Content
    let content = ContentFactory::new(&config.content_dir)
        .load_all()
        .map_err(RuntimeError::Content)?;

    // 3. Runtime
    let mut runtime = Runtime::builder()
        .config(config)
        .content(content)
        .build()
        .await
        .context("failed to build runtime")?;

    // 4. A visitor walks in, pulls whatever notices it, and uses every
    //    object on the way.
    let entrance = Position::new(0.0, -30.0, 0.0);
    runtime.map_mut().add_player(VISITOR, entrance);

    let objects: Vec<ObjectGuid> = runtime.map().objects().map(|object| object.guid()).collect();
    let step = ticks / (objects.len() as u64 + 1).max(1);
    let mut next_object = objects.into_iter();

    for tick in 0..ticks {
        if step > 0 && tick % step == step - 1 {
            if let Some(guid) = next_object.next() {
                let result = runtime.with_map(|map, services| {
                    map.use_object(guid, Interactor::player(VISITOR), services)
                });
                match result {
                    Ok(outcome) => tracing::info!(%guid, %outcome, "visitor used object"),
                    Err(err) => tracing::warn!(%guid, error = %err, "visitor could not use object"),
                }
            }
        }
        let walk = Position::new(0.0, -30.0 + (tick as f32 * 0.1).min(60.0), 0.0);
        if let Err(err) = runtime.map_mut().move_player(VISITOR, walk) {
            tracing::warn!(error = %err, "visitor lost");
        }
        let report = runtime.tick()?;
        for notice in &report.notices {
            tracing::debug!(guid = %notice.guid, event = ?notice.event, "notice");
        }
    }

    // 5. Shutdown
    let stats = runtime.shutdown().await?;
    tracing::info!(saved = stats.saved, deleted = stats.deleted, failed = stats.failed, "simulation finished");
    Ok(())
}
