use bitflags::bitflags;

/// Readiness of an instance to be used or looted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LootState {
    NotReady,
    Ready,
    Activated,
    JustDeactivated,
}

/// Visual and interaction posture, distinct from [`LootState`].
///
/// `Ready` is the closed/idle posture. Transports use the ordinals from
/// `TransportActive` upwards; `TransportStopped(n)` holds at stop frame `n`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoState {
    Active,
    Ready,
    ActiveAlternative,
    TransportActive,
    TransportStopped(u8),
}

impl GoState {
    const TRANSPORT_ACTIVE_ORDINAL: u32 = 24;

    /// Wire ordinal of the state.
    pub const fn ordinal(self) -> u32 {
        match self {
            GoState::Active => 0,
            GoState::Ready => 1,
            GoState::ActiveAlternative => 2,
            GoState::TransportActive => Self::TRANSPORT_ACTIVE_ORDINAL,
            GoState::TransportStopped(frame) => Self::TRANSPORT_ACTIVE_ORDINAL + 1 + frame as u32,
        }
    }

    pub const fn is_transport_state(self) -> bool {
        self.ordinal() >= Self::TRANSPORT_ACTIVE_ORDINAL
    }
}

bitflags! {
    /// Per-instance object flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GoFlags: u32 {
        /// Currently being used; blocks a second use.
        const IN_USE = 0x0001;
        const LOCKED = 0x0002;
        const NOT_SELECTABLE = 0x0010;
        /// Deactivation never despawns the instance.
        const NODESPAWN = 0x0020;
        const DAMAGED = 0x0200;
        const DESTROYED = 0x0400;
    }
}

/// Damage posture of a destructible building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DestructibleState {
    Intact,
    Damaged,
    Destroyed,
    Rebuilding,
}
