//! Worker tasks that back the runtime.
//!
//! The map tick stays synchronous; anything that touches disk runs here so a
//! slow repository never stalls a tick.

mod persistence;

pub use persistence::{PersistCommand, PersistStats, PersistenceHandle, PersistenceWorker};
