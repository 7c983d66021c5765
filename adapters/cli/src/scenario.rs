//! TOML scenario files describing a level layout and a scripted player.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use lawn_defence_core::{CellCoord, PlantKind};
use lawn_defence_system_bootstrap::DEFAULT_STARTING_SUN;
use lawn_defence_system_planting::PlayerIntent;
use serde::Deserialize;
use thiserror::Error;

/// Level parameters read from the `[level]` table. Missing keys fall back to
/// the command-line defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelTable {
    pub(crate) number: Option<u32>,
    pub(crate) time_length: Option<u32>,
    pub(crate) rows: Option<u32>,
    pub(crate) columns: Option<u32>,
    pub(crate) start_time: Option<u32>,
    pub(crate) seed: Option<u64>,
    pub(crate) sun: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TombstoneEntry {
    pub(crate) row: u32,
    pub(crate) col: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Action {
    Plant,
    Shovel,
    Collect,
}

/// One scripted player action, applied right before the tick at `time`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IntentEntry {
    pub(crate) time: u32,
    pub(crate) action: Action,
    pub(crate) kind: Option<String>,
    pub(crate) row: Option<u32>,
    pub(crate) col: Option<u32>,
}

/// Errors raised while turning scenario entries into player intents.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScenarioError {
    #[error("unknown plant `{0}`")]
    UnknownPlant(String),
    #[error("intent at time {time} is missing `{field}`")]
    MissingField { time: u32, field: &'static str },
}

/// Parsed scenario file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) level: LevelTable,
    #[serde(default)]
    pub(crate) plants: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) tombstones: Vec<TombstoneEntry>,
    #[serde(default)]
    pub(crate) auto_collect: bool,
    #[serde(default)]
    pub(crate) intents: Vec<IntentEntry>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self = toml::from_str(contents).context("malformed scenario TOML")?;
        let _ = scenario.seed_tray()?;
        for entry in &scenario.intents {
            let _ = entry.to_intent()?;
        }
        Ok(scenario)
    }

    /// Plants offered in the seed tray; every plant when the file names none.
    pub(crate) fn seed_tray(&self) -> Result<Vec<PlantKind>, ScenarioError> {
        match &self.plants {
            Some(names) => names.iter().map(|name| resolve_plant(name)).collect(),
            None => Ok(PlantKind::ALL.to_vec()),
        }
    }

    pub(crate) fn tombstone_cells(&self) -> Vec<CellCoord> {
        self.tombstones
            .iter()
            .map(|entry| CellCoord::new(entry.row, entry.col))
            .collect()
    }

    pub(crate) fn starting_sun(&self) -> u32 {
        self.level.sun.unwrap_or(DEFAULT_STARTING_SUN)
    }

    /// Intents scheduled for `time`, in file order.
    pub(crate) fn intents_at(
        &self,
        time: u32,
    ) -> impl Iterator<Item = Result<PlayerIntent, ScenarioError>> + '_ {
        self.intents
            .iter()
            .filter(move |entry| entry.time == time)
            .map(IntentEntry::to_intent)
    }
}

impl IntentEntry {
    fn to_intent(&self) -> Result<PlayerIntent, ScenarioError> {
        match self.action {
            Action::Plant => {
                let name = self.kind.as_deref().ok_or(ScenarioError::MissingField {
                    time: self.time,
                    field: "kind",
                })?;
                Ok(PlayerIntent::Plant {
                    kind: resolve_plant(name)?,
                    cell: self.cell()?,
                })
            }
            Action::Shovel => Ok(PlayerIntent::Shovel { cell: self.cell()? }),
            Action::Collect => Ok(PlayerIntent::CollectAllSuns),
        }
    }

    fn cell(&self) -> Result<CellCoord, ScenarioError> {
        let missing = |field| ScenarioError::MissingField {
            time: self.time,
            field,
        };
        let row = self.row.ok_or_else(|| missing("row"))?;
        let col = self.col.ok_or_else(|| missing("col"))?;
        Ok(CellCoord::new(row, col))
    }
}

fn resolve_plant(name: &str) -> Result<PlantKind, ScenarioError> {
    PlantKind::from_name(name).ok_or_else(|| ScenarioError::UnknownPlant(name.to_owned()))
}
