use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use lawn_defence_core::{CellCoord, Command, Event, PlantKind, ZombieSnapshot};
use lawn_defence_world::{self as world, query, Level, LevelConfig};

#[test]
fn deterministic_replay_produces_identical_runs() {
    let first = replay(0x00c0_ffee, scripted_commands());
    let second = replay(0x00c0_ffee, scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(
        first.fingerprint(),
        second.fingerprint(),
        "fingerprint mismatch: {:#x}",
        first.fingerprint()
    );
}

#[test]
fn different_seeds_produce_different_runs() {
    let first = replay(1, scripted_commands());
    let second = replay(2, scripted_commands());

    assert_ne!(first.fingerprint(), second.fingerprint());
}

fn replay(seed: u64, commands: Vec<Command>) -> ReplayOutcome {
    let mut level = Level::new(LevelConfig::new(2, 120, 5, 9, 0).with_seed(seed));
    level.initialize_plants(&PlantKind::ALL);
    level.set_unclaimed_suns(500);
    let mut log = Vec::new();

    for command in commands {
        let mut events = Vec::new();
        world::apply(&mut level, command, &mut events);
        collect_fallen_suns(&mut level, &events, &mut log);
        record_events(&events, &mut log);
    }

    let zombies = query::zombie_view(&level)
        .into_iter()
        .map(ZombieState::from)
        .collect();

    ReplayOutcome {
        zombies,
        unclaimed_suns: level.unclaimed_suns(),
        events: log,
    }
}

fn collect_fallen_suns(level: &mut Level, events: &[Event], log: &mut Vec<EventRecord>) {
    for event in events {
        if let Event::SunSpawned { sun, .. } = event {
            let mut generated = Vec::new();
            world::apply(level, Command::CollectSun { sun: *sun }, &mut generated);
            record_events(&generated, log);
        }
    }
}

fn record_events(events: &[Event], log: &mut Vec<EventRecord>) {
    log.extend(events.iter().map(EventRecord::from));
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::PlaceTombstone {
            cell: CellCoord::new(1, 8),
        },
        Command::PlaceTombstone {
            cell: CellCoord::new(4, 7),
        },
        Command::PlacePlant {
            kind: PlantKind::Sunflower,
            cell: CellCoord::new(0, 0),
        },
        Command::PlacePlant {
            kind: PlantKind::Peashooter,
            cell: CellCoord::new(2, 1),
        },
        Command::PlacePlant {
            kind: PlantKind::SnowPea,
            cell: CellCoord::new(3, 1),
        },
        Command::PlacePlant {
            kind: PlantKind::PotatoMine,
            cell: CellCoord::new(4, 4),
        },
    ];
    for time in 1..=120 {
        if time == 60 {
            commands.push(Command::PlacePlant {
                kind: PlantKind::WallNut,
                cell: CellCoord::new(1, 2),
            });
        }
        commands.push(Command::Tick { time });
    }
    commands
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    zombies: Vec<ZombieState>,
    unclaimed_suns: u32,
    events: Vec<EventRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ZombieState {
    id: u32,
    kind: &'static str,
    row: u32,
    col_bits: u32,
    health: u32,
    armor: u32,
    slowed: bool,
    at_house: bool,
}

impl From<ZombieSnapshot> for ZombieState {
    fn from(snapshot: ZombieSnapshot) -> Self {
        Self {
            id: snapshot.id.get(),
            kind: snapshot.kind.name(),
            row: snapshot.row,
            col_bits: snapshot.col.to_bits(),
            health: snapshot.health,
            armor: snapshot.armor,
            slowed: snapshot.slowed,
            at_house: snapshot.at_house,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct EventRecord(String);

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        Self(format!("{event:?}"))
    }
}
