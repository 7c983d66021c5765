#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Lawn Defence adapters.
//!
//! Scenes are derived from a [`LevelSnapshot`] and drawn as plain text, one
//! character per lawn cell, with the house on the left edge.

use anyhow::Result as AnyResult;
use lawn_defence_core::{
    CellCoord, LevelSnapshot, OccupantSnapshot, PlantKind, ZombieKind, ZombieSnapshot,
};
use std::{error::Error, fmt, io::Write};

/// Character drawn into a single lawn cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Glyph(pub char);

impl Glyph {
    /// Glyph of a cell with nothing in it.
    pub const EMPTY: Self = Self('.');
    /// Glyph of a cell shared by several zombies.
    pub const CROWD: Self = Self('#');
    /// Glyph of a tombstone.
    pub const TOMBSTONE: Self = Self('+');

    /// Glyph used for a plant. Armed mines are capitalised.
    #[must_use]
    pub const fn plant(kind: PlantKind, armed: bool) -> Self {
        match kind {
            PlantKind::Sunflower => Self('S'),
            PlantKind::Peashooter => Self('P'),
            PlantKind::SnowPea => Self('I'),
            PlantKind::WallNut => Self('W'),
            PlantKind::CherryBomb => Self('C'),
            PlantKind::PotatoMine if armed => Self('M'),
            PlantKind::PotatoMine => Self('m'),
        }
    }

    /// Glyph used for a zombie.
    #[must_use]
    pub const fn zombie(kind: ZombieKind) -> Self {
        match kind {
            ZombieKind::Normal => Self('z'),
            ZombieKind::Conehead => Self('c'),
            ZombieKind::Buckethead => Self('b'),
            ZombieKind::Polevaulter => Self('v'),
            ZombieKind::Flag => Self('f'),
        }
    }

    /// Glyph used for a pea in flight.
    #[must_use]
    pub const fn pea(frozen: bool) -> Self {
        if frozen {
            Self('*')
        } else {
            Self('o')
        }
    }
}

/// Text scene of a single moment in a level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Time the scene was captured at.
    pub time: u32,
    /// Sun available to spend.
    pub unclaimed_suns: u32,
    /// Cells in row-major order.
    pub lanes: Vec<Vec<Glyph>>,
    /// Lanes holding a zombie that reached the house.
    pub breached: Vec<bool>,
    /// Zombies that have not stepped onto the lawn yet.
    pub approaching: usize,
    /// Cells holding a sun waiting to be collected.
    pub suns: Vec<CellCoord>,
}

impl Scene {
    /// Builds a scene from a level snapshot.
    ///
    /// Zombies are drawn over occupants, peas only into otherwise empty cells.
    #[must_use]
    pub fn from_snapshot(snapshot: &LevelSnapshot) -> Self {
        let rows = to_index(snapshot.rows);
        let columns = to_index(snapshot.columns);
        let mut lanes = vec![vec![Glyph::EMPTY; columns]; rows];
        let mut breached = vec![false; rows];

        for (index, occupant) in snapshot.tiles.iter().enumerate() {
            let Some(occupant) = occupant else {
                continue;
            };
            if let Some(cell) = lanes
                .get_mut(index / columns.max(1))
                .and_then(|lane| lane.get_mut(index % columns.max(1)))
            {
                *cell = match *occupant {
                    OccupantSnapshot::Plant { kind, armed, .. } => Glyph::plant(kind, armed),
                    OccupantSnapshot::Tombstone { .. } => Glyph::TOMBSTONE,
                };
            }
        }

        for pea in &snapshot.peas {
            if let Some(cell) = cell_mut(&mut lanes, pea.row, pea.col) {
                if *cell == Glyph::EMPTY {
                    *cell = Glyph::pea(pea.frozen);
                }
            }
        }

        let mut approaching = 0;
        let mut zombie_cells: Vec<(usize, usize, Glyph)> = Vec::new();
        for zombie in &snapshot.zombies {
            if zombie.at_house {
                if let Some(flag) = breached.get_mut(to_index(zombie.row)) {
                    *flag = true;
                }
                continue;
            }
            match zombie_cell(zombie, columns) {
                Some((row, column)) => {
                    let glyph = match zombie_cells
                        .iter()
                        .position(|&(r, c, _)| r == row && c == column)
                    {
                        Some(existing) => {
                            zombie_cells[existing].2 = Glyph::CROWD;
                            continue;
                        }
                        None => Glyph::zombie(zombie.kind),
                    };
                    zombie_cells.push((row, column, glyph));
                }
                None => approaching += 1,
            }
        }
        for (row, column, glyph) in zombie_cells {
            if let Some(cell) = lanes.get_mut(row).and_then(|lane| lane.get_mut(column)) {
                *cell = glyph;
            }
        }

        Self {
            time: snapshot.time,
            unclaimed_suns: snapshot.unclaimed_suns,
            lanes,
            breached,
            approaching,
            suns: snapshot.suns.iter().map(|sun| sun.cell).collect(),
        }
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "t={:<5} sun={:<5} suns on lawn={:<3} approaching={}",
            self.time,
            self.unclaimed_suns,
            self.suns.len(),
            self.approaching
        )?;
        for (row, lane) in self.lanes.iter().enumerate() {
            let house = if self.breached.get(row).copied().unwrap_or(false) {
                '!'
            } else {
                '|'
            };
            write!(f, "{row:>2} {house}")?;
            for glyph in lane {
                write!(f, "{}", glyph.0)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// How often a driver presents a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameCadence {
    every: u32,
}

impl FrameCadence {
    /// Creates a cadence presenting one frame every `every` ticks.
    pub const fn new(every: u32) -> Result<Self, RenderingError> {
        if every == 0 {
            return Err(RenderingError::InvalidFrameInterval { every });
        }
        Ok(Self { every })
    }

    /// Whether a frame is due at `time`.
    #[must_use]
    pub const fn is_due(&self, time: u32) -> bool {
        time % self.every == 0
    }
}

/// Rendering backend capable of presenting Lawn Defence scenes.
pub trait RenderingBackend {
    /// Presents a single scene.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Backend writing text frames into any byte sink.
#[derive(Debug)]
pub struct TextBackend<W> {
    sink: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing into the provided sink.
    pub const fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        write!(self.sink, "{scene}")?;
        self.sink.flush()?;
        Ok(())
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// Frames must be presented at a positive interval.
    InvalidFrameInterval {
        /// Provided interval that failed validation.
        every: u32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFrameInterval { every } => {
                write!(f, "frame interval must be positive (received {every})")
            }
        }
    }
}

impl Error for RenderingError {}

fn to_index(value: u32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

fn cell_mut(lanes: &mut [Vec<Glyph>], row: u32, col: f32) -> Option<&mut Glyph> {
    if col < 0.0 {
        return None;
    }
    lanes
        .get_mut(to_index(row))?
        .get_mut(col.floor() as usize)
}

fn zombie_cell(zombie: &ZombieSnapshot, columns: usize) -> Option<(usize, usize)> {
    if zombie.col < 0.0 {
        return None;
    }
    let column = zombie.col.floor() as usize;
    (column < columns).then_some((to_index(zombie.row), column))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawn_defence_core::{PeaSnapshot, SunId, SunSnapshot, ZombieId};

    fn snapshot() -> LevelSnapshot {
        let mut tiles = vec![None; 6];
        tiles[0] = Some(OccupantSnapshot::Plant {
            kind: PlantKind::Peashooter,
            health: 300,
            armed: false,
        });
        tiles[5] = Some(OccupantSnapshot::Tombstone { health: 270 });
        LevelSnapshot {
            level_num: 1,
            time_length: 100,
            rows: 2,
            columns: 3,
            time: 42,
            unclaimed_suns: 75,
            tiles,
            zombies: vec![
                zombie(0, ZombieKind::Conehead, 0, 2.4),
                zombie(1, ZombieKind::Normal, 1, 1.5),
                zombie(2, ZombieKind::Normal, 1, 1.9),
                zombie(3, ZombieKind::Flag, 0, 4.0),
            ],
            suns: vec![SunSnapshot {
                id: SunId::new(0),
                cell: CellCoord::new(1, 0),
                amount: 25,
                expires_at: 50,
            }],
            peas: vec![PeaSnapshot {
                row: 0,
                col: 1.5,
                frozen: true,
            }],
            cooldowns: Vec::new(),
        }
    }

    fn zombie(id: u32, kind: ZombieKind, row: u32, col: f32) -> ZombieSnapshot {
        ZombieSnapshot {
            id: ZombieId::new(id),
            kind,
            row,
            col,
            health: 200,
            armor: 0,
            slowed: false,
            at_house: false,
        }
    }

    #[test]
    fn scene_places_occupants_zombies_and_peas() {
        let scene = Scene::from_snapshot(&snapshot());

        assert_eq!(
            scene.lanes,
            vec![
                vec![Glyph('P'), Glyph('*'), Glyph('c')],
                vec![Glyph::EMPTY, Glyph::CROWD, Glyph::TOMBSTONE],
            ]
        );
        assert_eq!(scene.approaching, 1);
        assert_eq!(scene.suns, vec![CellCoord::new(1, 0)]);
    }

    #[test]
    fn breached_lanes_are_marked_at_the_house() {
        let mut snapshot = snapshot();
        snapshot.zombies[1].at_house = true;
        snapshot.zombies[1].col = -0.1;

        let text = Scene::from_snapshot(&snapshot).to_string();

        assert!(text.contains(" 1 !"));
        assert!(text.contains(" 0 |P*c|"));
    }

    #[test]
    fn text_backend_writes_frames() {
        let mut backend = TextBackend::new(Vec::new());
        backend
            .present(&Scene::from_snapshot(&snapshot()))
            .expect("writing into memory succeeds");

        let text = String::from_utf8(backend.into_inner()).expect("utf-8 output");
        assert!(text.starts_with("t=42"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn frame_cadence_rejects_zero_without_panicking() {
        assert_eq!(
            FrameCadence::new(0),
            Err(RenderingError::InvalidFrameInterval { every: 0 })
        );
        let cadence = FrameCadence::new(5).expect("positive interval");
        assert!(cadence.is_due(10));
        assert!(!cadence.is_due(11));
    }
}
