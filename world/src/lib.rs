#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state management for Lawn Defence.
//!
//! A [`Level`] owns the lawn grid, every entity collection and the spawn
//! timers. An external driver advances it one discrete time unit at a time
//! through [`Level::game_cycle`] (or [`apply`] with [`Command::Tick`]) and
//! stops once [`Level::outcome`] is no longer [`Outcome::Running`].

mod cooldowns;
mod entity;
mod plants;
mod projectiles;
mod suns;
mod tombstone;
mod zombies;

use lawn_defence_core::{
    CellCoord, Command, Event, Outcome, PlacementError, PlantKind, RemovalError, SunId,
    SunSource, ZombieId, ZombieKind,
};
use lawn_defence_system_spawning::{SpawnSchedule, Spawning};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use cooldowns::Cooldown;
pub use entity::Entity;
pub use plants::Plant;
pub use projectiles::Pea;
pub use suns::Sun;
pub use tombstone::Tombstone;
pub use zombies::Zombie;

use plants::PlantContext;
use suns::SunField;

const DEFAULT_SEED: u64 = 0x1a3e_5eed_0f5c_a1ab;

/// Parameters fixed for the lifetime of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    level_num: u32,
    time_length: u32,
    rows: u32,
    columns: u32,
    start_time: u32,
    seed: u64,
}

impl LevelConfig {
    /// Creates a configuration using the default random seed.
    #[must_use]
    pub const fn new(
        level_num: u32,
        time_length: u32,
        rows: u32,
        columns: u32,
        start_time: u32,
    ) -> Self {
        Self {
            level_num,
            time_length,
            rows,
            columns,
            start_time,
            seed: DEFAULT_SEED,
        }
    }

    /// Overrides the seed of the level's random source.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Errors surfaced by level lookups.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// No available plant matches the requested name.
    #[error("no plant named `{0}` is available in this level")]
    UnknownPlant(String),
}

/// Content of an occupied lawn cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Occupant {
    /// A plant placed by the player.
    Plant(Plant),
    /// A tombstone placed while preparing the level.
    Tombstone(Tombstone),
}

impl Entity for Occupant {
    fn health(&self) -> u32 {
        match self {
            Self::Plant(plant) => plant.health(),
            Self::Tombstone(tombstone) => tombstone.health(),
        }
    }

    fn damage(&self) -> u32 {
        match self {
            Self::Plant(plant) => plant.damage(),
            Self::Tombstone(tombstone) => tombstone.damage(),
        }
    }

    fn row(&self) -> u32 {
        match self {
            Self::Plant(plant) => plant.row(),
            Self::Tombstone(tombstone) => tombstone.row(),
        }
    }

    fn col(&self) -> f32 {
        match self {
            Self::Plant(plant) => plant.col(),
            Self::Tombstone(tombstone) => tombstone.col(),
        }
    }
}

/// Represents the authoritative state of a single level.
#[derive(Debug)]
pub struct Level {
    level_num: u32,
    time_length: u32,
    rows: u32,
    columns: u32,
    start_time: u32,
    tiles: Vec<Vec<Option<Occupant>>>,
    enemies: Vec<Zombie>,
    sun_field: SunField,
    peas: Vec<Pea>,
    available_plants: Vec<PlantKind>,
    cooldowns: Vec<Cooldown>,
    spawning: Spawning,
    rng: ChaCha8Rng,
    next_zombie_id: u32,
    last_cycle: Option<u32>,
}

impl Level {
    /// Creates an empty level ready for simulation.
    #[must_use]
    pub fn new(config: LevelConfig) -> Self {
        let row_count = usize::try_from(config.rows).unwrap_or(0);
        let column_count = usize::try_from(config.columns).unwrap_or(0);
        Self {
            level_num: config.level_num,
            time_length: config.time_length,
            rows: config.rows,
            columns: config.columns,
            start_time: config.start_time,
            tiles: vec![vec![None; column_count]; row_count],
            enemies: Vec::new(),
            sun_field: SunField::default(),
            peas: Vec::new(),
            available_plants: Vec::new(),
            cooldowns: Vec::new(),
            spawning: Spawning::new(
                SpawnSchedule::new(config.level_num, config.time_length),
                config.start_time,
            ),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_zombie_id: 0,
            last_cycle: None,
        }
    }

    /// Sets the plants offered in the seed tray, resetting their cooldowns.
    pub fn initialize_plants(&mut self, plants: &[PlantKind]) {
        self.available_plants = plants.to_vec();
        self.cooldowns = plants.iter().copied().map(Cooldown::new).collect();
    }

    /// Number of the level.
    #[must_use]
    pub const fn level_num(&self) -> u32 {
        self.level_num
    }

    /// Time at which the level is won regardless of remaining zombies.
    #[must_use]
    pub const fn time_length(&self) -> u32 {
        self.time_length
    }

    /// Number of lanes on the lawn.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns on the lawn.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Time of the most recent cycle, or the start time before the first one.
    #[must_use]
    pub fn current_time(&self) -> u32 {
        self.last_cycle.unwrap_or(self.start_time)
    }

    /// Sun the player can spend.
    #[must_use]
    pub fn unclaimed_suns(&self) -> u32 {
        self.sun_field.unclaimed()
    }

    /// Overrides the sun the player can spend.
    pub fn set_unclaimed_suns(&mut self, amount: u32) {
        self.sun_field.set_unclaimed(amount);
    }

    /// Lawn cells indexed as `tiles()[row][column]`.
    #[must_use]
    pub fn tiles(&self) -> &[Vec<Option<Occupant>>] {
        &self.tiles
    }

    /// Occupant of the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<&Occupant> {
        let (row, column) = self.index(cell)?;
        self.tiles[row][column].as_ref()
    }

    /// Zombies currently in the level.
    #[must_use]
    pub fn enemies(&self) -> &[Zombie] {
        &self.enemies
    }

    /// Suns lying on the lawn.
    #[must_use]
    pub fn suns(&self) -> &[Sun] {
        self.sun_field.suns()
    }

    /// Peas in flight.
    #[must_use]
    pub fn peas(&self) -> &[Pea] {
        &self.peas
    }

    /// Plants offered in the seed tray.
    #[must_use]
    pub fn available_plants(&self) -> &[PlantKind] {
        &self.available_plants
    }

    /// Looks up the cooldown of an available plant by name, ignoring case.
    pub fn cooldown(&self, name: &str) -> Result<&Cooldown, LevelError> {
        self.cooldowns
            .iter()
            .find(|cooldown| cooldown.plant_type().eq_ignore_ascii_case(name))
            .ok_or_else(|| LevelError::UnknownPlant(name.to_owned()))
    }

    /// Reports whether the signed coordinate lies on the lawn.
    #[must_use]
    pub fn is_valid_coordinate(&self, row: i32, col: i32) -> bool {
        u32::try_from(row).is_ok_and(|row| row < self.rows)
            && u32::try_from(col).is_ok_and(|col| col < self.columns)
    }

    /// Reports whether a plant may be placed at the signed coordinate.
    ///
    /// Only the coordinate and the cell's vacancy are checked; cost and
    /// cooldown are the caller's responsibility.
    #[must_use]
    pub fn can_be_placed(&self, row: i32, col: i32) -> bool {
        match (u32::try_from(row), u32::try_from(col)) {
            (Ok(row), Ok(col)) => self.placement_error(CellCoord::new(row, col)).is_none(),
            _ => false,
        }
    }

    /// Whether the player has won at `time`.
    #[must_use]
    pub fn is_game_won(&self, time: u32) -> bool {
        let schedule = self.spawning.schedule();
        (time >= schedule.victory_threshold() && self.enemies.is_empty())
            || time >= self.time_length
    }

    /// Whether a zombie reached the house.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.enemies.iter().any(Zombie::is_at_house)
    }

    /// Derived state of the level at `time`. A loss outranks a win.
    #[must_use]
    pub fn outcome(&self, time: u32) -> Outcome {
        if self.is_game_over() {
            Outcome::Lost
        } else if self.is_game_won(time) {
            Outcome::Won
        } else {
            Outcome::Running
        }
    }

    /// Whether the final hoard already fired.
    #[must_use]
    pub fn hoard_triggered(&self) -> bool {
        self.spawning.hoard_triggered()
    }

    /// Places a plant into an empty cell, starting its cooldown and paying its cost.
    pub fn place_plant(&mut self, kind: PlantKind, cell: CellCoord) -> Result<(), PlacementError> {
        if let Some(error) = self.placement_error(cell) {
            return Err(error);
        }
        if !self.available_plants.contains(&kind) {
            return Err(PlacementError::Unavailable);
        }

        let time = self.current_time();
        self.set_occupant(cell, Occupant::Plant(Plant::new(kind, cell, time)));
        if let Some(cooldown) = self
            .cooldowns
            .iter_mut()
            .find(|cooldown| cooldown.kind() == kind)
        {
            cooldown.trigger(time);
        }
        self.sun_field.spend(kind.cost());
        debug!(
            plant = kind.name(),
            row = cell.row(),
            column = cell.column(),
            "plant placed"
        );
        Ok(())
    }

    /// Places a tombstone into an empty cell.
    pub fn place_tombstone(&mut self, cell: CellCoord) -> Result<(), PlacementError> {
        if let Some(error) = self.placement_error(cell) {
            return Err(error);
        }
        self.set_occupant(cell, Occupant::Tombstone(Tombstone::new(cell)));
        Ok(())
    }

    /// Clears a cell, returning whatever occupied it.
    pub fn remove_plant(&mut self, cell: CellCoord) -> Result<Occupant, RemovalError> {
        let (row, column) = self.index(cell).ok_or(RemovalError::OutOfBounds)?;
        self.tiles[row][column].take().ok_or(RemovalError::EmptyCell)
    }

    /// Claims a sun lying on the lawn, returning its amount.
    pub fn collect_sun(&mut self, sun: SunId) -> Option<u32> {
        self.sun_field.collect(sun)
    }

    /// Runs one game cycle at `current_time`.
    ///
    /// Cycles must be driven with strictly increasing times. A cycle that does
    /// not advance time is refused with [`Event::TickRejected`] and mutates
    /// nothing.
    pub fn game_cycle(&mut self, current_time: u32, out_events: &mut Vec<Event>) {
        if let Some(last) = self.last_cycle {
            if current_time <= last {
                warn!(
                    time = current_time,
                    last, "ignoring game cycle that does not advance time"
                );
                out_events.push(Event::TickRejected {
                    time: current_time,
                    last,
                });
                return;
            }
        }

        self.last_cycle = Some(current_time);
        out_events.push(Event::TimeAdvanced { time: current_time });
        debug!(level = self.level_num, time = current_time, "running game cycle");

        self.behaviors(current_time, out_events);

        let plan = self.spawning.plan(current_time);
        if plan.zombie {
            self.spawn_zombies(current_time, out_events);
        }
        if let Some(regulars) = plan.hoard {
            self.release_hoard(regulars, current_time, out_events);
        }
        if plan.sun {
            self.add_sun(current_time, out_events);
        }

        self.despawn(out_events);
    }

    /// Runs every entity's behavior for `current_time`.
    ///
    /// Zombies act first, then plants, suns and peas. Defeated zombies, faded
    /// suns and spent peas leave their collections before returning.
    pub fn behaviors(&mut self, current_time: u32, out_events: &mut Vec<Event>) {
        for zombie in &mut self.enemies {
            let lane = usize::try_from(zombie.row())
                .ok()
                .and_then(|row| self.tiles.get_mut(row));
            if let Some(row_tiles) = lane {
                zombie.behave(row_tiles, current_time, out_events);
            }
        }

        for row_tiles in &mut self.tiles {
            for cell in row_tiles.iter_mut() {
                if let Some(Occupant::Plant(plant)) = cell {
                    let mut context = PlantContext {
                        time: current_time,
                        columns: self.columns,
                        enemies: &mut self.enemies,
                        peas: &mut self.peas,
                        suns: &mut self.sun_field,
                        events: &mut *out_events,
                    };
                    plant.behave(&mut context);
                }
            }
        }

        self.sun_field.update(current_time, out_events);

        for pea in &mut self.peas {
            pea.update(&mut self.enemies, current_time, self.columns, out_events);
        }
        self.peas.retain(|pea| !pea.is_spent());

        self.enemies.retain(|zombie| {
            if zombie.is_alive() {
                true
            } else {
                out_events.push(Event::ZombieDefeated {
                    zombie: zombie.id(),
                    kind: zombie.kind(),
                });
                false
            }
        });
    }

    /// Spawns one regular zombie in a random lane just off the right edge.
    pub fn spawn_zombies(&mut self, current_time: u32, out_events: &mut Vec<Event>) {
        if let Some(row) = self.random_row() {
            let column = self.spawn_column();
            let zombie = self.new_zombie(ZombieKind::Normal, row, column, current_time);
            self.admit(zombie, column, out_events);
        }
    }

    /// Adds one sky sun at a random cell and credits its amount.
    pub fn add_sun(&mut self, current_time: u32, out_events: &mut Vec<Event>) {
        if self.rows == 0 || self.columns == 0 {
            return;
        }
        let row = self.rng.gen_range(0..self.rows);
        let column = self.rng.gen_range(0..self.columns);
        let _ = self.sun_field.drop_sun(
            CellCoord::new(row, column),
            current_time,
            SunSource::Sky,
            out_events,
        );
    }

    /// Clears every cell whose occupant ran out of health.
    pub fn despawn(&mut self, out_events: &mut Vec<Event>) {
        for row_tiles in &mut self.tiles {
            for cell in row_tiles.iter_mut() {
                let Some(occupant) = cell else {
                    continue;
                };
                if occupant.is_alive() {
                    continue;
                }
                out_events.push(Event::PlantDespawned {
                    cell: occupant_cell(occupant),
                });
                *cell = None;
            }
        }
    }

    fn release_hoard(&mut self, regulars: u32, current_time: u32, out_events: &mut Vec<Event>) {
        let Some(flag_row) = self.random_row() else {
            return;
        };
        let column = self.spawn_column();
        let flag = self.new_zombie(ZombieKind::Flag, flag_row, column, current_time);
        self.admit(flag, column, out_events);

        for _ in 0..regulars {
            self.spawn_zombies(current_time, out_events);
        }

        let mut raised = Vec::new();
        for occupant in self.tiles.iter().flatten().flatten() {
            if let Occupant::Tombstone(tombstone) = occupant {
                let id = ZombieId::new(self.next_zombie_id);
                self.next_zombie_id = self.next_zombie_id.wrapping_add(1);
                let zombie = tombstone.spawn(id, &mut self.rng, current_time);
                raised.push((tombstone.cell().column(), zombie));
            }
        }

        let total = 1 + regulars + u32::try_from(raised.len()).unwrap_or(u32::MAX);
        for (column, zombie) in raised {
            self.admit(zombie, column, out_events);
        }

        info!(
            level = self.level_num,
            time = current_time,
            zombies = total,
            "final hoard released"
        );
        out_events.push(Event::HoardTriggered { zombies: total });
    }

    fn new_zombie(&mut self, kind: ZombieKind, row: u32, column: u32, time: u32) -> Zombie {
        let id = ZombieId::new(self.next_zombie_id);
        self.next_zombie_id = self.next_zombie_id.wrapping_add(1);
        Zombie::new(id, kind, row, column as f32, time)
    }

    fn admit(&mut self, zombie: Zombie, column: u32, out_events: &mut Vec<Event>) {
        debug!(
            zombie = zombie.id().get(),
            kind = zombie.kind().name(),
            row = zombie.row(),
            "zombie spawned"
        );
        out_events.push(Event::ZombieSpawned {
            zombie: zombie.id(),
            kind: zombie.kind(),
            row: zombie.row(),
            column,
        });
        self.enemies.push(zombie);
    }

    fn random_row(&mut self) -> Option<u32> {
        (self.rows > 0).then(|| self.rng.gen_range(0..self.rows))
    }

    fn spawn_column(&self) -> u32 {
        self.columns.saturating_add(1)
    }

    fn index(&self, cell: CellCoord) -> Option<(usize, usize)> {
        if cell.row() < self.rows && cell.column() < self.columns {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            Some((row, column))
        } else {
            None
        }
    }

    fn placement_error(&self, cell: CellCoord) -> Option<PlacementError> {
        match self.index(cell) {
            None => Some(PlacementError::OutOfBounds),
            Some((row, column)) if self.tiles[row][column].is_some() => {
                Some(PlacementError::Occupied)
            }
            Some(_) => None,
        }
    }

    fn set_occupant(&mut self, cell: CellCoord, occupant: Occupant) {
        if let Some((row, column)) = self.index(cell) {
            self.tiles[row][column] = Some(occupant);
        }
    }
}

fn occupant_cell(occupant: &Occupant) -> CellCoord {
    match occupant {
        Occupant::Plant(plant) => plant.cell(),
        Occupant::Tombstone(tombstone) => tombstone.cell(),
    }
}

/// Applies the provided command to the level, mutating state deterministically.
pub fn apply(level: &mut Level, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { time } => level.game_cycle(time, out_events),
        Command::PlacePlant { kind, cell } => match level.place_plant(kind, cell) {
            Ok(()) => out_events.push(Event::PlantPlaced { kind, cell }),
            Err(reason) => out_events.push(Event::PlantPlacementRejected { kind, cell, reason }),
        },
        Command::PlaceTombstone { cell } => match level.place_tombstone(cell) {
            Ok(()) => out_events.push(Event::TombstonePlaced { cell }),
            Err(reason) => out_events.push(Event::TombstonePlacementRejected { cell, reason }),
        },
        Command::RemovePlant { cell } => match level.remove_plant(cell) {
            Ok(_) => out_events.push(Event::PlantRemoved { cell }),
            Err(reason) => out_events.push(Event::PlantRemovalRejected { cell, reason }),
        },
        Command::CollectSun { sun } => match level.collect_sun(sun) {
            Some(amount) => out_events.push(Event::SunCollected { sun, amount }),
            None => out_events.push(Event::SunCollectionRejected { sun }),
        },
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use lawn_defence_core::{
        CooldownSnapshot, LevelSnapshot, OccupantSnapshot, PeaSnapshot, SunSnapshot,
        ZombieSnapshot, WELCOME_BANNER,
    };

    use super::{Entity, Level, Occupant};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(_level: &Level) -> &'static str {
        WELCOME_BANNER
    }

    /// Captures an owned snapshot of the level for collaborators.
    #[must_use]
    pub fn snapshot(level: &Level) -> LevelSnapshot {
        let time = level.current_time();
        LevelSnapshot {
            level_num: level.level_num,
            time_length: level.time_length,
            rows: level.rows,
            columns: level.columns,
            time,
            unclaimed_suns: level.unclaimed_suns(),
            tiles: level
                .tiles
                .iter()
                .flatten()
                .map(|cell| cell.as_ref().map(|occupant| occupant_snapshot(occupant, time)))
                .collect(),
            zombies: zombie_view(level),
            suns: sun_view(level),
            peas: level
                .peas
                .iter()
                .map(|pea| PeaSnapshot {
                    row: pea.row(),
                    col: pea.col(),
                    frozen: pea.is_frozen(),
                })
                .collect(),
            cooldowns: level
                .cooldowns
                .iter()
                .map(|cooldown| CooldownSnapshot {
                    kind: cooldown.kind(),
                    remaining: cooldown.remaining(time),
                })
                .collect(),
        }
    }

    /// Captures the zombies in the level in identifier order.
    #[must_use]
    pub fn zombie_view(level: &Level) -> Vec<ZombieSnapshot> {
        let mut snapshots: Vec<ZombieSnapshot> = level
            .enemies
            .iter()
            .map(|zombie| ZombieSnapshot {
                id: zombie.id(),
                kind: zombie.kind(),
                row: zombie.row(),
                col: zombie.col(),
                health: zombie.health(),
                armor: zombie.armor(),
                slowed: zombie.is_slowed(),
                at_house: zombie.is_at_house(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Captures the suns on the lawn in identifier order.
    #[must_use]
    pub fn sun_view(level: &Level) -> Vec<SunSnapshot> {
        let mut snapshots: Vec<SunSnapshot> = level
            .suns()
            .iter()
            .map(|sun| SunSnapshot {
                id: sun.id(),
                cell: sun.cell(),
                amount: sun.amount(),
                expires_at: sun.expires_at(),
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    fn occupant_snapshot(occupant: &Occupant, time: u32) -> OccupantSnapshot {
        match occupant {
            Occupant::Plant(plant) => OccupantSnapshot::Plant {
                kind: plant.kind(),
                health: plant.health(),
                armed: plant.is_armed(time),
            },
            Occupant::Tombstone(tombstone) => OccupantSnapshot::Tombstone {
                health: tombstone.health(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level() -> Level {
        let mut level = Level::new(LevelConfig::new(1, 100, 5, 9, 0).with_seed(11));
        level.initialize_plants(&PlantKind::ALL);
        level
    }

    #[test]
    fn cooldown_lookup_reports_unknown_names() {
        let level = level();

        assert_eq!(
            level.cooldown("peashooter").map(Cooldown::kind),
            Ok(PlantKind::Peashooter)
        );
        assert_eq!(
            level.cooldown("Cactus").map(Cooldown::kind),
            Err(LevelError::UnknownPlant("Cactus".to_owned()))
        );
    }

    #[test]
    fn placement_pays_cost_and_starts_cooldown() {
        let mut level = level();
        level.set_unclaimed_suns(150);

        level
            .place_plant(PlantKind::Peashooter, CellCoord::new(2, 3))
            .expect("empty cell accepts a plant");

        assert_eq!(level.unclaimed_suns(), 50);
        let cooldown = level.cooldown("Peashooter").expect("cooldown tracked");
        assert_eq!(cooldown.last_used(), Some(0));
        assert!(!level.can_be_placed(2, 3));
    }

    #[test]
    fn placement_of_unavailable_plant_is_rejected() {
        let mut level = Level::new(LevelConfig::new(1, 100, 5, 9, 0));
        level.initialize_plants(&[PlantKind::Sunflower]);

        assert_eq!(
            level.place_plant(PlantKind::CherryBomb, CellCoord::new(0, 0)),
            Err(PlacementError::Unavailable)
        );
    }

    #[test]
    fn shovel_reports_empty_and_invalid_cells() {
        let mut level = level();

        assert_eq!(
            level.remove_plant(CellCoord::new(0, 0)),
            Err(RemovalError::EmptyCell)
        );
        assert_eq!(
            level.remove_plant(CellCoord::new(5, 0)),
            Err(RemovalError::OutOfBounds)
        );
    }

    #[test]
    fn sky_sun_drops_every_ten_units() {
        let mut level = level();
        let mut events = Vec::new();

        for time in 1..=10 {
            level.game_cycle(time, &mut events);
        }

        assert_eq!(level.suns().len(), 1);
        assert_eq!(level.unclaimed_suns(), 25);
    }
}
