#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Lawn Defence level.

use lawn_defence_core::{CellCoord, Command, Event, PlantKind};
use lawn_defence_world::{self as world, query, Level, LevelConfig};
use tracing::warn;

/// Sun the player holds when a level starts, unless the setup says otherwise.
pub const DEFAULT_STARTING_SUN: u32 = 50;

/// Everything needed to lay out a level before its first tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSetup {
    /// Fixed parameters of the level.
    pub config: LevelConfig,
    /// Plants offered in the seed tray.
    pub plants: Vec<PlantKind>,
    /// Cells that start with a tombstone.
    pub tombstones: Vec<CellCoord>,
    /// Sun the player holds at the start.
    pub starting_sun: u32,
}

impl LevelSetup {
    /// Creates a setup offering every plant, without tombstones.
    #[must_use]
    pub fn new(config: LevelConfig) -> Self {
        Self {
            config,
            plants: PlantKind::ALL.to_vec(),
            tombstones: Vec::new(),
            starting_sun: DEFAULT_STARTING_SUN,
        }
    }
}

/// Produces data required to greet the player and a ready-to-run level.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner(&self, level: &Level) -> &'static str {
        query::welcome_banner(level)
    }

    /// Builds a level from the setup.
    ///
    /// Tombstones are placed through the same command path the driver uses, so
    /// any rejected cell is reported in `out_events` instead of aborting.
    pub fn prepare(&self, setup: &LevelSetup, out_events: &mut Vec<Event>) -> Level {
        let mut level = Level::new(setup.config);
        level.initialize_plants(&setup.plants);
        level.set_unclaimed_suns(setup.starting_sun);

        for &cell in &setup.tombstones {
            let before = out_events.len();
            world::apply(&mut level, Command::PlaceTombstone { cell }, out_events);
            if let Some(Event::TombstonePlacementRejected { reason, .. }) = out_events.get(before) {
                warn!(
                    row = cell.row(),
                    column = cell.column(),
                    %reason,
                    "tombstone could not be placed"
                );
            }
        }

        level
    }
}
