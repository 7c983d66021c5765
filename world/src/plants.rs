//! Plants and their periodic behaviors.

use lawn_defence_core::{CellCoord, Event, PlantKind, SunSource};

use crate::{entity::Entity, projectiles::Pea, suns::SunField, zombies::Zombie};

const SUN_PRODUCTION_INTERVAL: u32 = 24;
const FIRE_INTERVAL: u32 = 2;
const CHERRY_FUSE: u32 = 1;
const MINE_ARMING_TIME: u32 = 14;

/// Level state lent to a plant while it behaves.
pub(crate) struct PlantContext<'a> {
    pub(crate) time: u32,
    pub(crate) columns: u32,
    pub(crate) enemies: &'a mut [Zombie],
    pub(crate) peas: &'a mut Vec<Pea>,
    pub(crate) suns: &'a mut SunField,
    pub(crate) events: &'a mut Vec<Event>,
}

/// Stationary defender occupying a single lawn cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plant {
    kind: PlantKind,
    health: u32,
    cell: CellCoord,
    planted_at: u32,
    last_action: u32,
}

impl Plant {
    pub(crate) fn new(kind: PlantKind, cell: CellCoord, time: u32) -> Self {
        Self {
            kind,
            health: kind.health(),
            cell,
            planted_at: time,
            last_action: time,
        }
    }

    /// Kind of the plant.
    #[must_use]
    pub const fn kind(&self) -> PlantKind {
        self.kind
    }

    /// Display name of the plant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Cell the plant occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Time at which the plant was placed.
    #[must_use]
    pub const fn planted_at(&self) -> u32 {
        self.planted_at
    }

    /// Whether a potato mine finished arming at `time`.
    #[must_use]
    pub fn is_armed(&self, time: u32) -> bool {
        self.kind == PlantKind::PotatoMine
            && time.saturating_sub(self.planted_at) >= MINE_ARMING_TIME
    }

    pub(crate) fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Runs the plant's periodic behavior for one tick.
    pub(crate) fn behave(&mut self, context: &mut PlantContext<'_>) {
        if !self.is_alive() {
            return;
        }

        match self.kind {
            PlantKind::Sunflower => self.produce_sun(context),
            PlantKind::Peashooter => self.shoot(context, false),
            PlantKind::SnowPea => self.shoot(context, true),
            PlantKind::WallNut => {}
            PlantKind::CherryBomb => {
                if context.time.saturating_sub(self.planted_at) >= CHERRY_FUSE {
                    self.detonate(context, |plant, zombie| {
                        plant.cell.row().abs_diff(zombie.row()) <= 1
                            && zombie.col() >= plant.col() - 1.0
                            && zombie.col() < plant.col() + 2.0
                    });
                }
            }
            PlantKind::PotatoMine => {
                if self.is_armed(context.time)
                    && context
                        .enemies
                        .iter()
                        .any(|zombie| self.is_under_mine(zombie))
                {
                    self.detonate(context, Plant::is_under_mine);
                }
            }
        }
    }

    fn produce_sun(&mut self, context: &mut PlantContext<'_>) {
        if context.time.saturating_sub(self.last_action) < SUN_PRODUCTION_INTERVAL {
            return;
        }

        let _ = context.suns.drop_sun(
            self.cell,
            context.time,
            SunSource::Sunflower,
            context.events,
        );
        self.last_action = context.time;
    }

    fn shoot(&mut self, context: &mut PlantContext<'_>, frozen: bool) {
        if context.time.saturating_sub(self.last_action) < FIRE_INTERVAL {
            return;
        }

        let lawn_end = context.columns as f32;
        let target_ahead = context.enemies.iter().any(|zombie| {
            zombie.row() == self.cell.row()
                && zombie.is_alive()
                && !zombie.is_at_house()
                && zombie.col() >= self.col()
                && zombie.col() < lawn_end
        });
        if !target_ahead {
            return;
        }

        context
            .peas
            .push(Pea::new(self.cell.row(), self.col(), self.damage(), frozen));
        context.events.push(Event::PeaFired {
            cell: self.cell,
            frozen,
        });
        self.last_action = context.time;
    }

    fn detonate<F>(&mut self, context: &mut PlantContext<'_>, in_blast: F)
    where
        F: Fn(&Plant, &Zombie) -> bool,
    {
        context.events.push(Event::PlantDetonated {
            kind: self.kind,
            cell: self.cell,
        });
        let plant: &Plant = self;
        let mut caught = Vec::new();
        for (index, zombie) in context.enemies.iter().enumerate() {
            if zombie.is_alive() && !zombie.is_at_house() && in_blast(plant, zombie) {
                caught.push(index);
            }
        }
        let damage = self.damage();
        for index in caught {
            if let Some(zombie) = context.enemies.get_mut(index) {
                zombie.take_damage(damage, context.events);
            }
        }
        self.health = 0;
    }

    fn is_under_mine(&self, zombie: &Zombie) -> bool {
        zombie.row() == self.cell.row()
            && zombie.is_alive()
            && !zombie.is_at_house()
            && zombie.col() >= self.col()
            && zombie.col() < self.col() + 1.0
    }
}

impl Entity for Plant {
    fn health(&self) -> u32 {
        self.health
    }

    fn damage(&self) -> u32 {
        self.kind.damage()
    }

    fn row(&self) -> u32 {
        self.cell.row()
    }

    fn col(&self) -> f32 {
        self.cell.column() as f32
    }
}
