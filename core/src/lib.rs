#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lawn Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the level executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Collaborators never borrow the level while it simulates; they read
//! owned [`LevelSnapshot`] values captured between ticks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lawn Defence.";

/// Amount of sun carried by every sun drop.
pub const SUN_AMOUNT: u32 = 25;

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Runs one game cycle at the provided discrete time.
    Tick {
        /// Discrete time unit the cycle simulates.
        time: u32,
    },
    /// Places a plant into an empty lawn cell.
    PlacePlant {
        /// Kind of plant to place.
        kind: PlantKind,
        /// Cell that receives the plant.
        cell: CellCoord,
    },
    /// Places a tombstone into an empty lawn cell while preparing a level.
    PlaceTombstone {
        /// Cell that receives the tombstone.
        cell: CellCoord,
    },
    /// Clears a lawn cell, mirroring the shovel tool.
    RemovePlant {
        /// Cell whose occupant should be removed.
        cell: CellCoord,
    },
    /// Claims a sun currently lying on the lawn.
    CollectSun {
        /// Identifier of the sun to claim.
        sun: SunId,
    },
}

/// Events broadcast by the level after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that a game cycle ran for the provided time.
    TimeAdvanced {
        /// Time simulated by the cycle.
        time: u32,
    },
    /// Reports that a cycle was refused because time did not move forward.
    TickRejected {
        /// Time supplied with the refused tick.
        time: u32,
        /// Time of the most recent cycle that did run.
        last: u32,
    },
    /// Confirms that a zombie entered the level.
    ZombieSpawned {
        /// Identifier assigned to the zombie.
        zombie: ZombieId,
        /// Variant of the spawned zombie.
        kind: ZombieKind,
        /// Lane the zombie walks along.
        row: u32,
        /// Column the zombie starts from.
        column: u32,
    },
    /// Announces the final hoard of the level.
    HoardTriggered {
        /// Number of zombies added by the hoard, tombstone spawns included.
        zombies: u32,
    },
    /// Reports that an armored zombie lost its armor.
    ArmorShed {
        /// Identifier of the zombie.
        zombie: ZombieId,
    },
    /// Reports that a polevaulter jumped over a plant.
    ZombieVaulted {
        /// Identifier of the zombie.
        zombie: ZombieId,
        /// Cell holding the plant that was jumped over.
        over: CellCoord,
    },
    /// Confirms that a zombie was destroyed.
    ZombieDefeated {
        /// Identifier of the zombie.
        zombie: ZombieId,
        /// Variant of the destroyed zombie.
        kind: ZombieKind,
    },
    /// Reports that a zombie walked past the last column into the house.
    ZombieReachedHouse {
        /// Identifier of the zombie.
        zombie: ZombieId,
        /// Lane the zombie walked along.
        row: u32,
    },
    /// Confirms that a shooter fired a pea.
    PeaFired {
        /// Cell of the shooter.
        cell: CellCoord,
        /// Whether the pea slows the zombie it hits.
        frozen: bool,
    },
    /// Confirms that a pea struck a zombie.
    PeaHit {
        /// Identifier of the zombie that was struck.
        zombie: ZombieId,
        /// Damage dealt by the pea.
        damage: u32,
    },
    /// Reports that an exploding plant went off.
    PlantDetonated {
        /// Kind of plant that exploded.
        kind: PlantKind,
        /// Cell the plant occupied.
        cell: CellCoord,
    },
    /// Confirms that a sun appeared on the lawn.
    SunSpawned {
        /// Identifier assigned to the sun.
        sun: SunId,
        /// Cell the sun landed on.
        cell: CellCoord,
        /// Amount of sun the drop is worth.
        amount: u32,
        /// Origin of the sun.
        source: SunSource,
    },
    /// Reports that a sun faded before being collected.
    SunExpired {
        /// Identifier of the sun.
        sun: SunId,
    },
    /// Confirms that a sun was collected.
    SunCollected {
        /// Identifier of the sun.
        sun: SunId,
        /// Amount of sun the drop was worth.
        amount: u32,
    },
    /// Reports that a collection targeted a sun that is not on the lawn.
    SunCollectionRejected {
        /// Identifier supplied with the request.
        sun: SunId,
    },
    /// Confirms that a plant was placed.
    PlantPlaced {
        /// Kind of plant placed.
        kind: PlantKind,
        /// Cell the plant occupies.
        cell: CellCoord,
    },
    /// Reports that a plant placement was rejected.
    PlantPlacementRejected {
        /// Kind of plant requested.
        kind: PlantKind,
        /// Cell supplied with the request.
        cell: CellCoord,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tombstone was placed.
    TombstonePlaced {
        /// Cell the tombstone occupies.
        cell: CellCoord,
    },
    /// Reports that a tombstone placement was rejected.
    TombstonePlacementRejected {
        /// Cell supplied with the request.
        cell: CellCoord,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a cell was cleared with the shovel.
    PlantRemoved {
        /// Cell that was cleared.
        cell: CellCoord,
    },
    /// Reports that a shovel request was rejected.
    PlantRemovalRejected {
        /// Cell supplied with the request.
        cell: CellCoord,
        /// Reason the removal failed.
        reason: RemovalError,
    },
    /// Reports that a grid occupant ran out of health and was cleared.
    PlantDespawned {
        /// Cell that was cleared.
        cell: CellCoord,
    },
}

/// Origin of a sun drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SunSource {
    /// Sun falling from the sky on the level's cadence.
    Sky,
    /// Sun produced by a sunflower.
    Sunflower,
}

/// Unique identifier assigned to a zombie.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZombieId(u32);

impl ZombieId {
    /// Creates a new zombie identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a sun drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SunId(u32);

impl SunId {
    /// Creates a new sun identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single lawn cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new lawn cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row (lane) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell, counted from the house.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Plants that can be placed on the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    /// Periodically produces sun.
    Sunflower,
    /// Fires peas at zombies in its lane.
    Peashooter,
    /// Fires peas that slow the zombie they hit.
    SnowPea,
    /// Sturdy blocker without an attack.
    WallNut,
    /// Explodes shortly after planting, damaging the surrounding area.
    CherryBomb,
    /// Arms after a delay and explodes under the first zombie to step on it.
    PotatoMine,
}

impl PlantKind {
    /// Every plant kind in seed tray order.
    pub const ALL: [PlantKind; 6] = [
        PlantKind::Sunflower,
        PlantKind::Peashooter,
        PlantKind::SnowPea,
        PlantKind::WallNut,
        PlantKind::CherryBomb,
        PlantKind::PotatoMine,
    ];

    /// Display name of the plant, also used as its cooldown key.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sunflower => "Sunflower",
            Self::Peashooter => "Peashooter",
            Self::SnowPea => "SnowPea",
            Self::WallNut => "WallNut",
            Self::CherryBomb => "CherryBomb",
            Self::PotatoMine => "PotatoMine",
        }
    }

    /// Sun required to place the plant.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Sunflower | Self::WallNut => 50,
            Self::Peashooter => 100,
            Self::SnowPea => 175,
            Self::CherryBomb => 150,
            Self::PotatoMine => 25,
        }
    }

    /// Time units that must pass before the plant can be placed again.
    #[must_use]
    pub const fn cooldown(self) -> u32 {
        match self {
            Self::Sunflower | Self::Peashooter | Self::SnowPea => 8,
            Self::WallNut | Self::PotatoMine => 30,
            Self::CherryBomb => 50,
        }
    }

    /// Health of a freshly placed plant.
    #[must_use]
    pub const fn health(self) -> u32 {
        match self {
            Self::Sunflower | Self::Peashooter | Self::SnowPea | Self::PotatoMine => 300,
            Self::WallNut => 4_000,
            Self::CherryBomb => 3_000,
        }
    }

    /// Damage dealt by the plant's attack, zero for passive plants.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::Sunflower | Self::WallNut => 0,
            Self::Peashooter | Self::SnowPea => 20,
            Self::CherryBomb | Self::PotatoMine => 1_800,
        }
    }

    /// Resolves a plant kind from its name, ignoring case, spaces, dashes and underscores.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(&normalized))
    }
}

/// Zombie variants that walk the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZombieKind {
    /// Unarmored zombie.
    Normal,
    /// Zombie protected by a traffic cone.
    Conehead,
    /// Zombie protected by a bucket.
    Buckethead,
    /// Fast zombie that vaults over the first plant it meets.
    Polevaulter,
    /// Zombie leading the final hoard.
    Flag,
}

impl ZombieKind {
    /// Display name of the zombie variant.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Zombie",
            Self::Conehead => "Conehead",
            Self::Buckethead => "Buckethead",
            Self::Polevaulter => "Polevaulter",
            Self::Flag => "FlagZombie",
        }
    }

    /// Health of the zombie's body, excluding armor.
    #[must_use]
    pub const fn body_health(self) -> u32 {
        match self {
            Self::Polevaulter => 340,
            Self::Normal | Self::Conehead | Self::Buckethead | Self::Flag => 200,
        }
    }

    /// Armor points absorbed before the body takes damage.
    #[must_use]
    pub const fn armor(self) -> u32 {
        match self {
            Self::Conehead => 370,
            Self::Buckethead => 1_100,
            Self::Normal | Self::Polevaulter | Self::Flag => 0,
        }
    }

    /// Columns walked per time unit when unhindered.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Polevaulter => 0.5,
            Self::Flag => 0.3,
            Self::Normal | Self::Conehead | Self::Buckethead => 0.25,
        }
    }

    /// Damage dealt to a plant per bite.
    #[must_use]
    pub const fn damage(self) -> u32 {
        100
    }
}

/// Derived state of a level at a given time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The level is still being played.
    Running,
    /// The player survived the level.
    Won,
    /// A zombie reached the house.
    Lost,
}

/// Reasons a plant placement request may be rejected by the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the lawn.
    #[error("cell lies outside the lawn")]
    OutOfBounds,
    /// The requested cell already holds an occupant.
    #[error("cell is already occupied")]
    Occupied,
    /// The plant kind is not part of the level's seed tray.
    #[error("plant is not available in this level")]
    Unavailable,
}

/// Reasons a shovel request may be rejected by the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum RemovalError {
    /// The requested cell lies outside the lawn.
    #[error("cell lies outside the lawn")]
    OutOfBounds,
    /// The requested cell holds nothing to remove.
    #[error("cell is empty")]
    EmptyCell,
}

/// Immutable description of a lawn cell's occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OccupantSnapshot {
    /// A plant occupying the cell.
    Plant {
        /// Kind of plant.
        kind: PlantKind,
        /// Remaining health of the plant.
        health: u32,
        /// Whether an arming plant is ready to detonate.
        armed: bool,
    },
    /// A tombstone occupying the cell.
    Tombstone {
        /// Remaining health of the tombstone.
        health: u32,
    },
}

/// Immutable representation of a single zombie's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZombieSnapshot {
    /// Identifier assigned to the zombie.
    pub id: ZombieId,
    /// Variant of the zombie.
    pub kind: ZombieKind,
    /// Lane the zombie walks along.
    pub row: u32,
    /// Continuous column position of the zombie.
    pub col: f32,
    /// Remaining body health.
    pub health: u32,
    /// Remaining armor points.
    pub armor: u32,
    /// Whether the zombie is currently slowed.
    pub slowed: bool,
    /// Whether the zombie reached the house.
    pub at_house: bool,
}

/// Immutable representation of a sun lying on the lawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SunSnapshot {
    /// Identifier assigned to the sun.
    pub id: SunId,
    /// Cell the sun landed on.
    pub cell: CellCoord,
    /// Amount of sun the drop is worth.
    pub amount: u32,
    /// Time at which the sun fades.
    pub expires_at: u32,
}

/// Immutable representation of a pea in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeaSnapshot {
    /// Lane the pea travels along.
    pub row: u32,
    /// Continuous column position of the pea.
    pub col: f32,
    /// Whether the pea slows the zombie it hits.
    pub frozen: bool,
}

/// Immutable representation of a plant kind's placement cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CooldownSnapshot {
    /// Plant kind gated by the cooldown.
    pub kind: PlantKind,
    /// Time units left before the kind can be placed again.
    pub remaining: u32,
}

/// Owned snapshot of a level captured between ticks for collaborators.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSnapshot {
    /// Number of the level being played.
    pub level_num: u32,
    /// Time at which the level ends in the player's favour.
    pub time_length: u32,
    /// Number of lanes on the lawn.
    pub rows: u32,
    /// Number of columns on the lawn.
    pub columns: u32,
    /// Time of the most recent cycle, or the start time before the first one.
    pub time: u32,
    /// Sun available to spend.
    pub unclaimed_suns: u32,
    /// Cell occupants in row-major order.
    pub tiles: Vec<Option<OccupantSnapshot>>,
    /// Zombies sorted by identifier.
    pub zombies: Vec<ZombieSnapshot>,
    /// Suns sorted by identifier.
    pub suns: Vec<SunSnapshot>,
    /// Peas in flight.
    pub peas: Vec<PeaSnapshot>,
    /// Cooldowns in seed tray order.
    pub cooldowns: Vec<CooldownSnapshot>,
}

impl LevelSnapshot {
    /// Reports whether the coordinate lies on the lawn.
    #[must_use]
    pub fn is_valid_coordinate(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Returns the occupant of the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<OccupantSnapshot> {
        if !self.is_valid_coordinate(cell) {
            return None;
        }
        let index = usize::try_from(cell.row() * self.columns + cell.column()).ok()?;
        self.tiles.get(index).copied().flatten()
    }

    /// Reports why a plant could not be placed into the cell, if it could not.
    #[must_use]
    pub fn placement_error(&self, cell: CellCoord) -> Option<PlacementError> {
        if !self.is_valid_coordinate(cell) {
            Some(PlacementError::OutOfBounds)
        } else if self.occupant(cell).is_some() {
            Some(PlacementError::Occupied)
        } else {
            None
        }
    }

    /// Returns the cooldown tracked for the provided plant kind, if it is available.
    #[must_use]
    pub fn cooldown(&self, kind: PlantKind) -> Option<CooldownSnapshot> {
        self.cooldowns
            .iter()
            .copied()
            .find(|cooldown| cooldown.kind == kind)
    }
}
