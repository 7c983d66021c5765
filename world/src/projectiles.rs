//! Peas fired by shooter plants.

use lawn_defence_core::Event;

use crate::{entity::Entity, zombies::Zombie};

const PEA_SPEED: f32 = 1.5;
const SLOW_DURATION: u32 = 10;

/// Projectile travelling right along a lane until it strikes a zombie.
#[derive(Clone, Debug, PartialEq)]
pub struct Pea {
    row: u32,
    col: f32,
    damage: u32,
    frozen: bool,
    in_flight: bool,
    spent: bool,
}

impl Pea {
    pub(crate) fn new(row: u32, col: f32, damage: u32, frozen: bool) -> Self {
        Self {
            row,
            col,
            damage,
            frozen,
            in_flight: false,
            spent: false,
        }
    }

    /// Lane the pea travels along.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous column position of the pea.
    #[must_use]
    pub const fn col(&self) -> f32 {
        self.col
    }

    /// Damage dealt to the zombie the pea strikes.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Whether the pea slows the zombie it strikes.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the pea hit something or left the lawn.
    #[must_use]
    pub const fn is_spent(&self) -> bool {
        self.spent
    }

    /// Moves the pea and resolves a hit against the nearest zombie it reaches.
    ///
    /// Zombies move before peas, so a pea that already flew one tick also
    /// catches a zombie that walked past its tip during this tick.
    pub(crate) fn update(
        &mut self,
        enemies: &mut [Zombie],
        time: u32,
        columns: u32,
        out_events: &mut Vec<Event>,
    ) {
        if self.spent {
            return;
        }

        let from = self.col;
        let to = from + PEA_SPEED;
        let in_flight = self.in_flight;
        let target = enemies
            .iter_mut()
            .filter(|zombie| {
                let reach_back = if in_flight { zombie.speed() } else { 0.0 };
                zombie.row() == self.row
                    && zombie.is_alive()
                    && !zombie.is_at_house()
                    && zombie.col() >= from - reach_back
                    && zombie.col() <= to
            })
            .min_by(|left, right| left.col().total_cmp(&right.col()));

        if let Some(zombie) = target {
            out_events.push(Event::PeaHit {
                zombie: zombie.id(),
                damage: self.damage,
            });
            zombie.take_damage(self.damage, out_events);
            if self.frozen {
                zombie.slow(time.saturating_add(SLOW_DURATION));
            }
            self.spent = true;
            return;
        }

        self.col = to;
        self.in_flight = true;
        if self.col >= columns as f32 {
            self.spent = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lawn_defence_core::{ZombieId, ZombieKind};

    fn zombie(id: u32, row: u32, col: f32) -> Zombie {
        Zombie::new(ZombieId::new(id), ZombieKind::Normal, row, col, 0)
    }

    #[test]
    fn strikes_the_nearest_zombie_in_range() {
        let mut enemies = vec![zombie(0, 2, 3.4), zombie(1, 2, 3.1), zombie(2, 1, 2.5)];
        let mut pea = Pea::new(2, 2.0, 20, false);
        let mut events = Vec::new();

        pea.update(&mut enemies, 5, 9, &mut events);

        assert!(pea.is_spent());
        assert_eq!(enemies[1].health(), 180);
        assert_eq!(enemies[0].health(), 200);
        assert_eq!(
            events,
            vec![Event::PeaHit {
                zombie: ZombieId::new(1),
                damage: 20,
            }]
        );
    }

    #[test]
    fn keeps_flying_until_it_leaves_the_lawn() {
        let mut enemies = vec![zombie(0, 0, 1.0)];
        let mut pea = Pea::new(0, 6.0, 20, false);
        let mut events = Vec::new();

        pea.update(&mut enemies, 1, 9, &mut events);
        assert!(!pea.is_spent());
        assert!((pea.col() - 7.5).abs() < f32::EPSILON);

        pea.update(&mut enemies, 2, 9, &mut events);
        assert!(pea.is_spent());
        assert!(events.is_empty());
    }

    #[test]
    fn catches_zombies_that_stepped_past_its_tip() {
        let mut enemies = vec![zombie(0, 0, 3.6)];
        let mut pea = Pea::new(0, 2.0, 20, false);
        let mut events = Vec::new();

        pea.update(&mut enemies, 1, 9, &mut events);
        assert!(!pea.is_spent());

        enemies[0] = zombie(0, 0, 3.35);
        pea.update(&mut enemies, 2, 9, &mut events);

        assert!(pea.is_spent());
        assert_eq!(enemies[0].health(), 180);
    }

    #[test]
    fn frozen_peas_slow_their_target() {
        let mut enemies = vec![zombie(0, 0, 4.0)];
        let mut pea = Pea::new(0, 3.0, 20, true);
        let mut events = Vec::new();

        pea.update(&mut enemies, 7, 9, &mut events);

        assert!(enemies[0].is_slowed());
    }
}
