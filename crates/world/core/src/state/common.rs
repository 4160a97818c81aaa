use std::fmt;
use std::ops::{Add, Sub};

/// Unique identifier for any live world object (game object, creature, player).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectGuid(pub u64);

impl ObjectGuid {
    pub const EMPTY: Self = Self(0);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "guid#{}", self.0)
    }
}

/// Stable key of a persisted placement, independent of any live instance.
///
/// `SpawnId::NONE` marks instances that are not database-backed (summons,
/// temporary objects).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnId(pub u64);

impl SpawnId {
    pub const NONE: Self = Self(0);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SpawnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spawn#{}", self.0)
    }
}

/// Spawn pool membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapId(pub u32);

/// Continuous world position with facing.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub orientation: f32,
}

impl Position {
    /// Half extent of a map grid; coordinates beyond it are never valid.
    pub const MAP_HALF_SIZE: f32 = 17_066.666;

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            orientation: 0.0,
        }
    }

    pub const fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }

    /// Finite and inside the map grid.
    pub fn is_valid(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.z.is_finite()
            && self.orientation.is_finite();
        finite && self.x.abs() <= Self::MAP_HALF_SIZE && self.y.abs() <= Self::MAP_HALF_SIZE
    }

    pub fn distance_2d(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle from this position towards `other`, normalized to `[0, 2π)`.
    pub fn angle_to(&self, other: &Position) -> f32 {
        let angle = (other.y - self.y).atan2(other.x - self.x);
        if angle < 0.0 {
            angle + core::f32::consts::TAU
        } else {
            angle
        }
    }
}

/// Absolute game time in seconds. Zero means "unset" for respawn timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub const fn is_set(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn as_secs(self) -> i64 {
        self.0
    }
}

impl Add<u32> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u32) -> Timestamp {
        Timestamp(self.0 + i64::from(rhs))
    }
}

impl Sub<i64> for Timestamp {
    type Output = Timestamp;
    fn sub(self, rhs: i64) -> Timestamp {
        Timestamp(self.0 - rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}
