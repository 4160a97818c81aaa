use super::state::{GoFlags, GoState};

/// Static definition of a game object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObjectTemplate {
    pub entry: u32,
    pub name: String,
    pub kind: TemplateKind,
    /// Whether the display model carries a collision shape.
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub has_model: bool,
    /// Cooldown between two uses, in seconds.
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_cooldown_secs: u32,
    /// Trap template spawned alongside this object.
    #[cfg_attr(feature = "serde", serde(default))]
    pub linked_trap: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flags: GoFlags,
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

/// Per-type static data.
#[derive(Clone, Debug, PartialEq, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateKind {
    Door(DoorData),
    Button(DoorData),
    Chest(ChestData),
    Trap(TrapData),
    Goober(GooberData),
    SpellCaster(SpellCasterData),
    Transport(TransportData),
    FishingNode,
    FishingHole(FishingHoleData),
    DestructibleBuilding(BuildingData),
    /// Map-embedded transports; never created by hand.
    MapObjTransport,
    Generic,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DoorData {
    /// Milliseconds before an opened door/button resets; 0 keeps it open.
    pub auto_close_ms: u32,
    pub start_open: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChestData {
    /// Looting consumes the chest and despawns it.
    pub consumable: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrapData {
    /// 0 re-arms forever, 1 fires once, 2 marks a bomb.
    pub charges: u32,
    pub start_delay_secs: u32,
    /// Trigger diameter; 0 disables proximity triggering.
    pub radius: u32,
    pub cooldown_secs: u32,
    pub spell: Option<u32>,
}

impl TrapData {
    pub const fn is_bomb(&self) -> bool {
        self.charges == 2
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GooberData {
    /// Reward spell cast on every unique user once the use is consumed.
    pub spell: Option<u32>,
    pub auto_close_ms: u32,
    pub event_id: Option<u32>,
    pub custom_anim: bool,
    pub consumable: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpellCasterData {
    pub spell: Option<u32>,
    /// Uses before the caster deactivates; 0 is unlimited.
    pub charges: u32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransportData {
    /// Full animation period; 0 means the transport has no path.
    pub period_ms: u32,
    /// Path progress of each stop frame.
    pub stop_frames: Vec<u32>,
    /// Frame the transport starts stopped at.
    pub start_frame: Option<u8>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FishingHoleData {
    pub min_restock: u32,
    pub max_restock: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BuildingData {
    pub max_health: u32,
    /// Health at or below which the building counts as damaged.
    pub damaged_health: u32,
    pub damaged_event: Option<u32>,
    pub destroyed_event: Option<u32>,
    pub rebuilding_event: Option<u32>,
}

impl Default for BuildingData {
    fn default() -> Self {
        Self {
            max_health: crate::config::WorldConfig::DEFAULT_BUILDING_HEALTH,
            damaged_health: 10_000,
            damaged_event: None,
            destroyed_event: None,
            rebuilding_event: None,
        }
    }
}

impl GameObjectTemplate {
    pub fn new(entry: u32, name: impl Into<String>, kind: TemplateKind) -> Self {
        Self {
            entry,
            name: name.into(),
            kind,
            has_model: true,
            use_cooldown_secs: 0,
            linked_trap: None,
            flags: GoFlags::empty(),
        }
    }

    pub fn with_linked_trap(mut self, trap_entry: u32) -> Self {
        self.linked_trap = Some(trap_entry);
        self
    }

    pub fn with_use_cooldown(mut self, secs: u32) -> Self {
        self.use_cooldown_secs = secs;
        self
    }

    pub fn with_flags(mut self, flags: GoFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn without_model(mut self) -> Self {
        self.has_model = false;
        self
    }

    /// Uses before the instance deactivates on its own; 0 is unlimited.
    pub fn charges(&self) -> u32 {
        match &self.kind {
            TemplateKind::Trap(trap) => trap.charges,
            TemplateKind::SpellCaster(caster) => caster.charges,
            _ => 0,
        }
    }

    /// Whether using the object always despawns it visually.
    pub fn despawn_at_action(&self) -> bool {
        match &self.kind {
            TemplateKind::Chest(chest) => chest.consumable,
            TemplateKind::Goober(goober) => goober.consumable,
            _ => false,
        }
    }

    pub fn auto_close_ms(&self) -> u32 {
        match &self.kind {
            TemplateKind::Door(door) | TemplateKind::Button(door) => door.auto_close_ms,
            TemplateKind::Goober(goober) => goober.auto_close_ms,
            _ => 0,
        }
    }

    pub fn is_door_or_button(&self) -> bool {
        matches!(self.kind, TemplateKind::Door(_) | TemplateKind::Button(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            TemplateKind::Transport(_) | TemplateKind::MapObjTransport
        )
    }

    /// Go-state a freshly created instance starts in.
    pub fn initial_go_state(&self) -> GoState {
        match &self.kind {
            TemplateKind::Door(door) if door.start_open => GoState::Active,
            TemplateKind::Transport(transport) => match transport.start_frame {
                Some(frame) => GoState::TransportStopped(frame),
                None => GoState::TransportActive,
            },
            _ => GoState::Ready,
        }
    }
}
