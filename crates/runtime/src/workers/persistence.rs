//! Persistence worker applying respawn records to a durable repository.
//!
//! The [`crate::RespawnStore`] enqueues writes without blocking; this task
//! drains the queue in order. Failed writes are logged and retried with
//! backoff, then dropped: the in-memory schedule stays authoritative for
//! the running map.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{debug, error, info, warn};
use world_core::{RespawnRecord, SpawnId};

use crate::error::{Result, RuntimeError};
use crate::repository::{RepositoryError, SpawnRepository};

/// Work items accepted by the persistence worker.
#[derive(Debug)]
pub enum PersistCommand {
    Save(RespawnRecord),
    Delete(SpawnId),
    /// Replies once every command queued before it has been applied.
    Sync { reply: oneshot::Sender<()> },
    Shutdown,
}

/// Counters reported when the worker stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub saved: u64,
    pub deleted: u64,
    pub failed: u64,
}

/// Background task that owns the durable repository.
pub struct PersistenceWorker {
    repo: Arc<dyn SpawnRepository>,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    stats: PersistStats,
    max_retries: u32,
}

impl PersistenceWorker {
    const BASE_RETRY_DELAY_MS: u64 = 50;

    pub fn new(
        repo: Arc<dyn SpawnRepository>,
        rx: mpsc::UnboundedReceiver<PersistCommand>,
        max_retries: u32,
    ) -> Self {
        Self {
            repo,
            rx,
            stats: PersistStats::default(),
            max_retries,
        }
    }

    /// Spawns the worker on the current tokio runtime.
    pub fn spawn(repo: Arc<dyn SpawnRepository>, max_retries: u32) -> PersistenceHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Self::new(repo, rx, max_retries);
        let join = tokio::spawn(worker.run());
        PersistenceHandle { tx, join }
    }

    /// Main worker loop.
    pub async fn run(mut self) -> PersistStats {
        info!("persistence worker started");

        while let Some(command) = self.rx.recv().await {
            match command {
                PersistCommand::Save(record) => {
                    let repo = Arc::clone(&self.repo);
                    if self
                        .apply_with_retry(record.spawn_id, || repo.save(&record))
                        .await
                    {
                        self.stats.saved += 1;
                    }
                }
                PersistCommand::Delete(spawn) => {
                    let repo = Arc::clone(&self.repo);
                    if self.apply_with_retry(spawn, || repo.delete(spawn)).await {
                        self.stats.deleted += 1;
                    }
                }
                PersistCommand::Sync { reply } => {
                    let _ = reply.send(());
                }
                PersistCommand::Shutdown => {
                    debug!("shutdown command received");
                    break;
                }
            }
        }

        info!(
            saved = self.stats.saved,
            deleted = self.stats.deleted,
            failed = self.stats.failed,
            "persistence worker stopped"
        );
        self.stats
    }

    /// Runs `op` until it succeeds or the retry budget is spent.
    async fn apply_with_retry<F>(&mut self, spawn: SpawnId, op: F) -> bool
    where
        F: Fn() -> std::result::Result<(), RepositoryError>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(()) => {
                    if attempt > 0 {
                        info!(%spawn, attempt, "respawn record persisted after retry");
                    }
                    return true;
                }
                Err(err) if attempt < self.max_retries => {
                    let delay = Duration::from_millis(Self::BASE_RETRY_DELAY_MS << attempt);
                    warn!(%spawn, %err, ?delay, "failed to persist respawn record; retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    error!(%spawn, %err, "giving up on respawn record");
                    self.stats.failed += 1;
                    return false;
                }
            }
        }
    }
}

/// Owner side of a running persistence worker.
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
    join: JoinHandle<PersistStats>,
}

impl PersistenceHandle {
    /// Queue producer handed to the respawn store.
    pub fn sender(&self) -> mpsc::UnboundedSender<PersistCommand> {
        self.tx.clone()
    }

    /// Waits until every command queued so far has been applied.
    pub async fn sync(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.tx
            .send(PersistCommand::Sync { reply })
            .map_err(|_| RuntimeError::PersistenceClosed)?;
        done.await.map_err(|_| RuntimeError::PersistenceClosed)
    }

    /// Stops the worker after the queued commands and joins it.
    pub async fn shutdown(self) -> Result<PersistStats> {
        // A closed queue means the worker already stopped; the join still
        // reports its counters.
        let _ = self.tx.send(PersistCommand::Shutdown);
        self.join.await.map_err(RuntimeError::WorkerJoin)
    }
}
