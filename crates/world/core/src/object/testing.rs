//! Shared fixture for lifecycle tests.
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::WorldConfig;
use crate::env::{
    Difficulty, GameClock, PcgRng, SpawnStore, SpellInfo, SpellOracle, StoreError, TemplateOracle,
    WorldEnv, WorldOracle,
};
use crate::respawn::RespawnRecord;
use crate::state::{ObjectGuid, Position, SpawnId, Timestamp};

use super::ai::ObjectAi;
use super::context::ObjectContext;
use super::state::{GoFlags, GoState, LootState};
use super::template::*;
use super::{CreateParams, GameObjectInstance};

pub const DOOR: u32 = 100;
pub const BUTTON: u32 = 101;
pub const CHEST: u32 = 102;
pub const TRAP: u32 = 103;
pub const BOMB: u32 = 104;
pub const GOOBER: u32 = 105;
pub const TRANSPORT: u32 = 106;
pub const FISHING_NODE: u32 = 107;
pub const FISHING_HOLE: u32 = 108;
pub const BUILDING: u32 = 109;
pub const MAP_OBJ_TRANSPORT: u32 = 110;
pub const SPELL_CASTER: u32 = 111;
pub const GENERIC: u32 = 112;
pub const GOOBER_NODESPAWN: u32 = 113;

pub const TRAP_SPELL: u32 = 9001;
pub const GOOBER_SPELL: u32 = 9002;

pub const PLAYER: ObjectGuid = ObjectGuid(1);
pub const OTHER_PLAYER: ObjectGuid = ObjectGuid(2);
pub const OBJECT: ObjectGuid = ObjectGuid(500);

pub const START_SECS: i64 = 1_000_000;

pub struct TestClock {
    ms: AtomicU64,
}

impl TestClock {
    pub fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }

    pub fn advance_ms(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }
}

impl GameClock for TestClock {
    fn now(&self) -> Timestamp {
        Timestamp((self.ms.load(Ordering::SeqCst) / 1000) as i64)
    }

    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

pub struct TestTemplates(HashMap<u32, Arc<GameObjectTemplate>>);

impl TemplateOracle for TestTemplates {
    fn template(&self, entry: u32) -> Option<Arc<GameObjectTemplate>> {
        self.0.get(&entry).cloned()
    }
}

pub struct TestSpells(Vec<SpellInfo>);

impl SpellOracle for TestSpells {
    fn spell(&self, id: u32, _difficulty: Difficulty) -> Option<&SpellInfo> {
        self.0.iter().find(|spell| spell.id == id)
    }
}

#[derive(Default)]
pub struct TestWorld {
    pub in_combat: Mutex<HashSet<ObjectGuid>>,
    pub trap_target: Mutex<Option<ObjectGuid>>,
    pub population: AtomicU64,
}

impl WorldOracle for TestWorld {
    fn is_in_combat(&self, unit: ObjectGuid) -> bool {
        self.in_combat.lock().unwrap().contains(&unit)
    }

    fn is_player(&self, unit: ObjectGuid) -> bool {
        unit == PLAYER || unit == OTHER_PLAYER
    }

    fn find_trap_target(&self, _: &Position, _: f32, _: Option<ObjectGuid>) -> Option<ObjectGuid> {
        *self.trap_target.lock().unwrap()
    }

    fn zone_population(&self, _: &Position) -> u32 {
        self.population.load(Ordering::SeqCst) as u32
    }
}

#[derive(Default)]
pub struct TestStore {
    pub records: Mutex<BTreeMap<SpawnId, RespawnRecord>>,
    pub links: Mutex<HashMap<SpawnId, SpawnId>>,
    pub immediate_saves: AtomicU64,
}

impl TestStore {
    pub fn record(&self, spawn_id: SpawnId) -> Option<RespawnRecord> {
        self.records.lock().unwrap().get(&spawn_id).cloned()
    }
}

impl SpawnStore for TestStore {
    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>, StoreError> {
        Ok(self.record(spawn_id))
    }

    fn save(&self, record: &RespawnRecord, immediate: bool) -> Result<(), StoreError> {
        if immediate {
            self.immediate_saves.fetch_add(1, Ordering::SeqCst);
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.spawn_id, record.clone());
        Ok(())
    }

    fn delete(&self, spawn_id: SpawnId) -> Result<(), StoreError> {
        self.records.lock().unwrap().remove(&spawn_id);
        Ok(())
    }

    fn master_of(&self, spawn_id: SpawnId) -> Result<Option<SpawnId>, StoreError> {
        Ok(self.links.lock().unwrap().get(&spawn_id).copied())
    }

    fn due(&self, now: Timestamp) -> Result<Vec<RespawnRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.is_due(now))
            .cloned()
            .collect())
    }
}

/// Script recording every hook call.
#[derive(Clone, Default)]
pub struct RecordingAi {
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ObjectAi for RecordingAi {
    fn reset(&mut self) {
        self.calls.lock().unwrap().push("reset".into());
    }

    fn on_loot_state_changed(&mut self, state: LootState, _unit: Option<ObjectGuid>) {
        self.calls.lock().unwrap().push(format!("loot:{state}"));
    }

    fn on_state_changed(&mut self, state: GoState) {
        self.calls.lock().unwrap().push(format!("go:{state:?}"));
    }

    fn event_inform(&mut self, event_id: u32, _invoker: Option<ObjectGuid>) {
        self.calls.lock().unwrap().push(format!("event:{event_id}"));
    }

    fn damaged(&mut self, _attacker: Option<ObjectGuid>, _event_id: Option<u32>) {
        self.calls.lock().unwrap().push("damaged".into());
    }

    fn destroyed(&mut self, _attacker: Option<ObjectGuid>, _event_id: Option<u32>) {
        self.calls.lock().unwrap().push("destroyed".into());
    }
}

fn templates() -> HashMap<u32, Arc<GameObjectTemplate>> {
    let door = DoorData {
        auto_close_ms: 3_000,
        start_open: false,
    };
    [
        GameObjectTemplate::new(DOOR, "Door", TemplateKind::Door(door.clone())),
        GameObjectTemplate::new(BUTTON, "Button", TemplateKind::Button(door)),
        GameObjectTemplate::new(
            CHEST,
            "Chest",
            TemplateKind::Chest(ChestData { consumable: false }),
        ),
        GameObjectTemplate::new(
            TRAP,
            "Trap",
            TemplateKind::Trap(TrapData {
                charges: 0,
                start_delay_secs: 2,
                radius: 10,
                cooldown_secs: 0,
                spell: Some(TRAP_SPELL),
            }),
        ),
        GameObjectTemplate::new(
            BOMB,
            "Bomb",
            TemplateKind::Trap(TrapData {
                charges: 2,
                start_delay_secs: 0,
                radius: 0,
                cooldown_secs: 0,
                spell: Some(TRAP_SPELL),
            }),
        ),
        GameObjectTemplate::new(
            GOOBER,
            "Goober",
            TemplateKind::Goober(GooberData {
                spell: Some(GOOBER_SPELL),
                auto_close_ms: 1_000,
                event_id: Some(77),
                custom_anim: false,
                consumable: false,
            }),
        ),
        GameObjectTemplate::new(
            TRANSPORT,
            "Transport",
            TemplateKind::Transport(TransportData {
                period_ms: 60_000,
                stop_frames: vec![0, 4_000, 30_000],
                start_frame: None,
            }),
        ),
        GameObjectTemplate::new(FISHING_NODE, "Bobber", TemplateKind::FishingNode),
        GameObjectTemplate::new(
            FISHING_HOLE,
            "School",
            TemplateKind::FishingHole(FishingHoleData {
                min_restock: 2,
                max_restock: 4,
            }),
        ),
        GameObjectTemplate::new(
            BUILDING,
            "Tower",
            TemplateKind::DestructibleBuilding(BuildingData {
                max_health: 100,
                damaged_health: 50,
                damaged_event: Some(1),
                destroyed_event: Some(2),
                rebuilding_event: Some(3),
            }),
        ),
        GameObjectTemplate::new(MAP_OBJ_TRANSPORT, "Zeppelin", TemplateKind::MapObjTransport),
        GameObjectTemplate::new(
            SPELL_CASTER,
            "Portal",
            TemplateKind::SpellCaster(SpellCasterData {
                spell: Some(TRAP_SPELL),
                charges: 2,
            }),
        ),
        GameObjectTemplate::new(GENERIC, "Banner", TemplateKind::Generic),
        GameObjectTemplate::new(
            GOOBER_NODESPAWN,
            "Lever",
            TemplateKind::Goober(GooberData {
                spell: None,
                auto_close_ms: 0,
                event_id: None,
                custom_anim: true,
                consumable: false,
            }),
        )
        .with_flags(GoFlags::NODESPAWN),
    ]
    .into_iter()
    .map(|template| (template.entry, Arc::new(template)))
    .collect()
}

pub struct Fixture {
    pub clock: TestClock,
    pub templates: TestTemplates,
    pub spells: TestSpells,
    pub rng: PcgRng,
    pub world: TestWorld,
    pub store: TestStore,
    pub config: WorldConfig,
    next_guid: AtomicU64,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::new())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        let spell = |id| SpellInfo {
            id,
            name: format!("spell {id}"),
            difficulty: Difficulty::Normal,
        };
        Self {
            clock: TestClock {
                ms: AtomicU64::new(START_SECS as u64 * 1000),
            },
            templates: TestTemplates(templates()),
            spells: TestSpells(vec![spell(TRAP_SPELL), spell(GOOBER_SPELL)]),
            rng: PcgRng,
            world: TestWorld::default(),
            store: TestStore::default(),
            config,
            next_guid: AtomicU64::new(OBJECT.0),
        }
    }

    pub fn env(&self) -> WorldEnv<'_> {
        WorldEnv::with_all(
            &self.templates,
            &self.spells,
            &self.clock,
            &self.rng,
            &self.world,
            &self.store,
            &self.config,
        )
    }

    pub fn context(&self) -> ObjectContext<'_> {
        ObjectContext::new(self.env())
    }

    pub fn params(&self, entry: u32) -> CreateParams {
        let guid = ObjectGuid(self.next_guid.fetch_add(1, Ordering::SeqCst));
        CreateParams::new(guid, entry, Position::new(10.0, 20.0, 5.0))
    }

    /// Creates a transient instance of `entry` and adds it to the world.
    pub fn spawn(&self, entry: u32, cx: &mut ObjectContext<'_>) -> GameObjectInstance {
        self.spawn_with(self.params(entry), cx)
    }

    pub fn spawn_with(&self, params: CreateParams, cx: &mut ObjectContext<'_>) -> GameObjectInstance {
        self.spawn_scripted(params, Box::new(super::NullObjectAi), cx)
    }

    pub fn spawn_scripted(
        &self,
        params: CreateParams,
        ai: Box<dyn ObjectAi>,
        cx: &mut ObjectContext<'_>,
    ) -> GameObjectInstance {
        let mut object =
            GameObjectInstance::create(params, &self.env(), ai).expect("fixture template");
        object.add_to_world(cx);
        object
    }

    pub fn now(&self) -> Timestamp {
        GameClock::now(&self.clock)
    }
}
