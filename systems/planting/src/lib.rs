#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure planting system that turns player intents into level commands.
//!
//! The level itself only checks that a cell can hold a plant. Sun cost and
//! placement cooldowns are enforced here, against a [`LevelSnapshot`], before
//! any command reaches the level.

use lawn_defence_core::{
    CellCoord, Command, LevelSnapshot, OccupantSnapshot, PlacementError, PlantKind, SunId,
};
use thiserror::Error;

/// Action requested by the player between two ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerIntent {
    /// Place a plant of the provided kind into a cell.
    Plant {
        /// Kind of plant to place.
        kind: PlantKind,
        /// Target cell.
        cell: CellCoord,
    },
    /// Dig up the plant occupying a cell.
    Shovel {
        /// Cell to clear.
        cell: CellCoord,
    },
    /// Pick up a single sun from the lawn.
    CollectSun {
        /// Sun to pick up.
        sun: SunId,
    },
    /// Pick up every sun lying on the lawn.
    CollectAllSuns,
}

/// Reasons an intent produced no command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IntentRejection {
    /// The plant kind is not offered in this level.
    #[error("plant is not available in this level")]
    Unavailable,
    /// The plant kind was placed too recently.
    #[error("plant is cooling down for {remaining} more ticks")]
    CoolingDown {
        /// Ticks left before the kind can be placed again.
        remaining: u32,
    },
    /// The player cannot afford the plant.
    #[error("plant costs {needed} sun but only {available} is available")]
    InsufficientSun {
        /// Cost of the plant.
        needed: u32,
        /// Sun the player holds.
        available: u32,
    },
    /// The target cell cannot hold a plant.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// The target cell holds no plant that can be dug up.
    #[error("no plant to remove")]
    NothingToRemove,
    /// The requested sun is not on the lawn.
    #[error("sun is not on the lawn")]
    UnknownSun,
}

/// Planting system validating intents against the latest level snapshot.
#[derive(Debug, Default, Clone)]
pub struct Planting;

impl Planting {
    /// Creates a new planting system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Translates a player intent into commands appended to `out`.
    ///
    /// Plant intents are checked for availability, cooldown, cost and
    /// placement, in that order, and the first failing check is reported.
    pub fn handle(
        &self,
        intent: PlayerIntent,
        snapshot: &LevelSnapshot,
        out: &mut Vec<Command>,
    ) -> Result<(), IntentRejection> {
        match intent {
            PlayerIntent::Plant { kind, cell } => {
                Self::check_plant(kind, cell, snapshot)?;
                out.push(Command::PlacePlant { kind, cell });
            }
            PlayerIntent::Shovel { cell } => match snapshot.occupant(cell) {
                Some(OccupantSnapshot::Plant { .. }) => out.push(Command::RemovePlant { cell }),
                Some(OccupantSnapshot::Tombstone { .. }) | None => {
                    return Err(IntentRejection::NothingToRemove);
                }
            },
            PlayerIntent::CollectSun { sun } => {
                if !snapshot.suns.iter().any(|candidate| candidate.id == sun) {
                    return Err(IntentRejection::UnknownSun);
                }
                out.push(Command::CollectSun { sun });
            }
            PlayerIntent::CollectAllSuns => {
                out.extend(
                    snapshot
                        .suns
                        .iter()
                        .map(|sun| Command::CollectSun { sun: sun.id }),
                );
            }
        }

        Ok(())
    }

    fn check_plant(
        kind: PlantKind,
        cell: CellCoord,
        snapshot: &LevelSnapshot,
    ) -> Result<(), IntentRejection> {
        let cooldown = snapshot
            .cooldown(kind)
            .ok_or(IntentRejection::Unavailable)?;
        if cooldown.remaining > 0 {
            return Err(IntentRejection::CoolingDown {
                remaining: cooldown.remaining,
            });
        }

        let needed = kind.cost();
        if snapshot.unclaimed_suns < needed {
            return Err(IntentRejection::InsufficientSun {
                needed,
                available: snapshot.unclaimed_suns,
            });
        }

        match snapshot.placement_error(cell) {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawn_defence_core::CooldownSnapshot;

    fn snapshot(unclaimed_suns: u32) -> LevelSnapshot {
        LevelSnapshot {
            level_num: 1,
            time_length: 100,
            rows: 2,
            columns: 3,
            time: 0,
            unclaimed_suns,
            tiles: vec![None; 6],
            zombies: Vec::new(),
            suns: Vec::new(),
            peas: Vec::new(),
            cooldowns: vec![CooldownSnapshot {
                kind: PlantKind::Sunflower,
                remaining: 0,
            }],
        }
    }

    #[test]
    fn affordable_plant_emits_command() {
        let mut commands = Vec::new();
        let result = Planting::new().handle(
            PlayerIntent::Plant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(1, 2),
            },
            &snapshot(50),
            &mut commands,
        );

        assert_eq!(result, Ok(()));
        assert_eq!(
            commands,
            vec![Command::PlacePlant {
                kind: PlantKind::Sunflower,
                cell: CellCoord::new(1, 2),
            }]
        );
    }

    #[test]
    fn rejection_messages_are_readable() {
        let rejection = IntentRejection::InsufficientSun {
            needed: 100,
            available: 25,
        };
        assert_eq!(
            rejection.to_string(),
            "plant costs 100 sun but only 25 is available"
        );
    }
}
