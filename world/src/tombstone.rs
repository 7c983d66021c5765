//! Tombstones raising a zombie during the final hoard.

use lawn_defence_core::{CellCoord, ZombieId};
use lawn_defence_system_spawning::tombstone_variant;
use rand::Rng;

use crate::{entity::Entity, zombies::Zombie};

const TOMBSTONE_HEALTH: u32 = 270;

/// Inert grid occupant that blocks planting and raises one zombie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tombstone {
    health: u32,
    cell: CellCoord,
}

impl Tombstone {
    /// Creates a tombstone occupying the provided cell.
    #[must_use]
    pub const fn new(cell: CellCoord) -> Self {
        Self {
            health: TOMBSTONE_HEALTH,
            cell,
        }
    }

    /// Cell the tombstone occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Raises one random zombie standing on the tombstone's cell.
    ///
    /// The tombstone itself is left untouched, so callers decide how often
    /// this happens.
    pub fn spawn<R: Rng>(&self, id: ZombieId, rng: &mut R, time: u32) -> Zombie {
        let roll: f32 = rng.gen();
        Zombie::new(
            id,
            tombstone_variant(roll),
            self.cell.row(),
            self.col(),
            time,
        )
    }
}

impl Entity for Tombstone {
    fn health(&self) -> u32 {
        self.health
    }

    fn damage(&self) -> u32 {
        0
    }

    fn row(&self) -> u32 {
        self.cell.row()
    }

    fn col(&self) -> f32 {
        self.cell.column() as f32
    }
}
