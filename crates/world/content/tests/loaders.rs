use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use world_content::{ContentFactory, SpawnLoader, TemplateLoader};
use world_core::{
    BoundaryId, Difficulty, MapId, Position, ReactState, RespawnScalingMode, SpawnId,
    TemplateKind,
};

fn shipped_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data")
}

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

const MINIMAL_TEMPLATES: &str = r#"(
    templates: [
        (entry: 1, name: "Door", kind: Door((auto_close_ms: 1000))),
        (entry: 2, name: "Stool", kind: Generic),
    ],
)"#;

const MINIMAL_SPELLS: &str = "(spells: [(id: 7, name: \"Spark\")])";

// ===== shipped data set =====

#[test]
fn shipped_data_loads() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();

    assert_eq!(content.config.respawn_scaling, RespawnScalingMode::Population);
    assert_eq!(content.config.difficulty, Difficulty::Normal);
    assert!(!content.templates.is_empty());
    assert!(!content.spawns.objects.is_empty());
    assert!(content.boundaries.handle(BoundaryId(1), false).is_some());
    assert!(content.boundaries.handle(BoundaryId(2), false).is_some());
}

#[test]
fn shipped_boundary_contains_home_of_its_creature() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();
    for creature in content.spawns.creatures_on(MapId(1)) {
        let Some(id) = creature.boundary else { continue };
        let handle = content.boundaries.handle(id, creature.negate_boundary).unwrap();
        assert!(
            handle.contains(&creature.position),
            "creature spawn {} starts outside boundary {:?}",
            creature.spawn_id,
            id
        );
    }
}

#[test]
fn shipped_linked_spawn_keeps_master() {
    let content = ContentFactory::new(shipped_data()).load_all().unwrap();
    let dependant = content.spawns.object(SpawnId(4)).unwrap();
    assert_eq!(dependant.spawn.master, Some(SpawnId(3)));
    assert!(dependant.spawn.compatibility_mode);
}

// ===== templates =====

#[test]
fn templates_parse_kind_data() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "templates.ron", MINIMAL_TEMPLATES);

    let templates = TemplateLoader::load(&path).unwrap();
    assert_eq!(templates.len(), 2);
    match &templates[0].kind {
        TemplateKind::Door(door) => assert_eq!(door.auto_close_ms, 1000),
        other => panic!("unexpected kind {other:?}"),
    }
    assert!(templates[1].has_model);
}

#[test]
fn duplicate_template_entry_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "templates.ron",
        r#"(templates: [
            (entry: 1, name: "A", kind: Generic),
            (entry: 1, name: "B", kind: Generic),
        ])"#,
    );

    let err = TemplateLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("duplicate template entry 1"));
}

// ===== spawns =====

#[test]
fn duplicate_persisted_spawn_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "spawns.ron",
        r#"(objects: [
            (spawn: (spawn_id: SpawnId(3), compatibility_mode: false), entry: 1, map: MapId(1),
             position: (x: 0.0, y: 0.0, z: 0.0)),
            (spawn: (spawn_id: SpawnId(3), compatibility_mode: false), entry: 2, map: MapId(1),
             position: (x: 1.0, y: 0.0, z: 0.0)),
        ])"#,
    );

    let err = SpawnLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("duplicate object spawn"));
}

#[test]
fn transient_spawns_may_repeat() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "spawns.ron",
        r#"(objects: [
            (spawn: (spawn_id: SpawnId(0), compatibility_mode: true), entry: 1, map: MapId(1),
             position: (x: 0.0, y: 0.0, z: 0.0)),
            (spawn: (spawn_id: SpawnId(0), compatibility_mode: true), entry: 2, map: MapId(1),
             position: (x: 1.0, y: 0.0, z: 0.0)),
        ])"#,
    );

    let table = SpawnLoader::load(&path).unwrap();
    assert_eq!(table.objects.len(), 2);
    assert!(table.objects.iter().all(|spawn| spawn.spawned_by_default));
}

#[test]
fn creature_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "spawns.ron",
        r#"(creatures: [
            (spawn_id: SpawnId(9), entry: 40, map: MapId(2), position: (x: 1.0, y: 2.0, z: 3.0)),
        ])"#,
    );

    let table = SpawnLoader::load(&path).unwrap();
    let creature = &table.creatures[0];
    assert_eq!(creature.react_state, ReactState::Aggressive);
    assert_eq!(creature.boundary, None);
    assert!(!creature.civilian);
    assert_eq!(creature.position, Position::new(1.0, 2.0, 3.0));
    assert_eq!(table.creatures_on(MapId(1)).count(), 0);
}

// ===== factory =====

#[test]
fn optional_files_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    write(&dir, "templates.ron", MINIMAL_TEMPLATES);
    write(&dir, "spells.ron", MINIMAL_SPELLS);
    write(&dir, "spawns.ron", "()");

    let content = ContentFactory::new(dir.path()).load_all().unwrap();
    assert_eq!(content.config, world_core::WorldConfig::default());
    assert!(content.boundaries.is_empty());
    assert_eq!(content.spells[0].id, 7);
}

#[test]
fn partial_config_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    write(&dir, "config.toml", "map_seed = 77\n");

    let config = ContentFactory::new(dir.path()).load_config().unwrap();
    assert_eq!(config.map_seed, 77);
    assert_eq!(config.respawn_scaling, RespawnScalingMode::Off);
}

#[test]
fn spawn_of_unknown_template_is_rejected() {
    let dir = TempDir::new().unwrap();
    write(&dir, "templates.ron", MINIMAL_TEMPLATES);
    write(&dir, "spells.ron", MINIMAL_SPELLS);
    write(
        &dir,
        "spawns.ron",
        r#"(objects: [
            (spawn: (spawn_id: SpawnId(1), compatibility_mode: false), entry: 99, map: MapId(1),
             position: (x: 0.0, y: 0.0, z: 0.0)),
        ])"#,
    );

    let err = ContentFactory::new(dir.path()).load_all().unwrap_err();
    assert!(err.to_string().contains("unknown template 99"));
}

#[test]
fn missing_templates_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let err = ContentFactory::new(dir.path()).load_templates().unwrap_err();
    assert!(format!("{err:#}").contains("templates.ron"));
}
