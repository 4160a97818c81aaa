//! Repository layer for respawn records.
//!
//! Repositories hold data that CHANGES during play: the respawn schedule of
//! persisted placements. Static content (templates, spawns, boundaries) is
//! served by the oracles instead.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSpawnRepo;
pub use memory::InMemorySpawnRepo;
pub use traits::SpawnRepository;
