//! Identifiers, positions and time values shared by every subsystem.
mod common;

pub use common::{MapId, ObjectGuid, PoolId, Position, SpawnId, Timestamp};
