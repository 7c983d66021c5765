//! Zombies walking down the lanes towards the house.

use lawn_defence_core::{CellCoord, Event, ZombieId, ZombieKind};

use crate::{entity::Entity, Occupant};

/// Distance a polevaulter lands in front of the plant it jumps over.
const VAULT_CLEARANCE: f32 = 0.05;

/// Mobile enemy advancing from the right edge of the lawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Zombie {
    id: ZombieId,
    kind: ZombieKind,
    health: u32,
    armor: u32,
    row: u32,
    col: f32,
    speed: f32,
    at_house: bool,
    slowed_until: Option<u32>,
    has_pole: bool,
    spawned_at: u32,
}

impl Zombie {
    pub(crate) fn new(id: ZombieId, kind: ZombieKind, row: u32, col: f32, time: u32) -> Self {
        Self {
            id,
            kind,
            health: kind.body_health(),
            armor: kind.armor(),
            row,
            col,
            speed: kind.speed(),
            at_house: false,
            slowed_until: None,
            has_pole: kind == ZombieKind::Polevaulter,
            spawned_at: time,
        }
    }

    /// Identifier assigned to the zombie.
    #[must_use]
    pub const fn id(&self) -> ZombieId {
        self.id
    }

    /// Variant of the zombie.
    #[must_use]
    pub const fn kind(&self) -> ZombieKind {
        self.kind
    }

    /// Remaining armor points.
    #[must_use]
    pub const fn armor(&self) -> u32 {
        self.armor
    }

    /// Columns walked per time unit before slowing is applied.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether the zombie walked into the house.
    #[must_use]
    pub const fn is_at_house(&self) -> bool {
        self.at_house
    }

    /// Whether a frozen pea currently slows the zombie.
    #[must_use]
    pub const fn is_slowed(&self) -> bool {
        self.slowed_until.is_some()
    }

    /// Whether a polevaulter still carries its pole.
    #[must_use]
    pub const fn has_pole(&self) -> bool {
        self.has_pole
    }

    /// Time at which the zombie entered the level.
    #[must_use]
    pub const fn spawned_at(&self) -> u32 {
        self.spawned_at
    }

    /// Applies damage, stripping armor before the body.
    pub(crate) fn take_damage(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        let absorbed = amount.min(self.armor);
        let had_armor = self.armor > 0;
        self.armor -= absorbed;
        if had_armor && self.armor == 0 {
            out_events.push(Event::ArmorShed { zombie: self.id });
        }
        self.health = self.health.saturating_sub(amount - absorbed);
    }

    pub(crate) fn slow(&mut self, until: u32) {
        self.slowed_until = Some(until);
    }

    /// Runs one tick of behavior against the tiles of the zombie's lane.
    pub(crate) fn behave(
        &mut self,
        row_tiles: &mut [Option<Occupant>],
        time: u32,
        out_events: &mut Vec<Event>,
    ) {
        if self.at_house || !self.is_alive() {
            return;
        }

        if self.slowed_until.is_some_and(|until| time >= until) {
            self.slowed_until = None;
        }

        if let Some(column) = self.blocking_column(row_tiles) {
            if self.has_pole {
                self.vault(column, out_events);
            } else if let Some(Some(Occupant::Plant(plant))) = row_tiles.get_mut(column) {
                plant.take_damage(self.kind.damage());
            }
            return;
        }

        self.col -= self.effective_speed();
        if self.col < 0.0 {
            self.at_house = true;
            out_events.push(Event::ZombieReachedHouse {
                zombie: self.id,
                row: self.row,
            });
        }
    }

    fn effective_speed(&self) -> f32 {
        if self.is_slowed() {
            self.speed / 2.0
        } else {
            self.speed
        }
    }

    fn blocking_column(&self, row_tiles: &[Option<Occupant>]) -> Option<usize> {
        if self.col < 0.0 {
            return None;
        }

        let column = self.col.floor() as usize;
        match row_tiles.get(column) {
            Some(Some(Occupant::Plant(plant))) if plant.is_alive() => Some(column),
            _ => None,
        }
    }

    fn vault(&mut self, column: usize, out_events: &mut Vec<Event>) {
        self.col = column as f32 - VAULT_CLEARANCE;
        self.has_pole = false;
        self.speed = ZombieKind::Normal.speed();
        out_events.push(Event::ZombieVaulted {
            zombie: self.id,
            over: CellCoord::new(self.row, u32::try_from(column).unwrap_or(u32::MAX)),
        });
    }
}

impl Entity for Zombie {
    fn health(&self) -> u32 {
        self.health
    }

    fn damage(&self) -> u32 {
        self.kind.damage()
    }

    fn row(&self) -> u32 {
        self.row
    }

    fn col(&self) -> f32 {
        self.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plants::Plant;
    use lawn_defence_core::PlantKind;

    fn lane_with_plant(kind: PlantKind, column: u32) -> Vec<Option<Occupant>> {
        let mut lane = vec![None; 9];
        lane[column as usize] = Some(Occupant::Plant(Plant::new(
            kind,
            CellCoord::new(0, column),
            0,
        )));
        lane
    }

    #[test]
    fn walks_left_at_its_speed() {
        let mut zombie = Zombie::new(ZombieId::new(0), ZombieKind::Normal, 0, 8.0, 0);
        let mut lane = vec![None; 9];
        let mut events = Vec::new();

        zombie.behave(&mut lane, 1, &mut events);

        assert!((zombie.col() - 7.75).abs() < f32::EPSILON);
        assert!(events.is_empty());
    }

    #[test]
    fn bites_the_plant_in_its_cell() {
        let mut zombie = Zombie::new(ZombieId::new(0), ZombieKind::Normal, 0, 3.5, 0);
        let mut lane = lane_with_plant(PlantKind::Peashooter, 3);
        let mut events = Vec::new();

        zombie.behave(&mut lane, 1, &mut events);

        assert!((zombie.col() - 3.5).abs() < f32::EPSILON, "blocked zombies stay put");
        match &lane[3] {
            Some(Occupant::Plant(plant)) => assert_eq!(plant.health(), 200),
            other => panic!("unexpected occupant: {other:?}"),
        }
    }

    #[test]
    fn walks_past_tombstones() {
        let mut zombie = Zombie::new(ZombieId::new(0), ZombieKind::Normal, 0, 3.5, 0);
        let mut lane = vec![None; 9];
        lane[3] = Some(Occupant::Tombstone(crate::Tombstone::new(CellCoord::new(0, 3))));
        let mut events = Vec::new();

        zombie.behave(&mut lane, 1, &mut events);

        assert!((zombie.col() - 3.25).abs() < f32::EPSILON);
    }

    #[test]
    fn polevaulter_jumps_the_first_plant_only() {
        let mut zombie = Zombie::new(ZombieId::new(4), ZombieKind::Polevaulter, 0, 5.2, 0);
        let mut lane = lane_with_plant(PlantKind::WallNut, 5);
        let mut events = Vec::new();

        zombie.behave(&mut lane, 1, &mut events);

        assert!(!zombie.has_pole());
        assert!(zombie.col() < 5.0);
        assert!((zombie.speed() - 0.25).abs() < f32::EPSILON);
        assert_eq!(
            events,
            vec![Event::ZombieVaulted {
                zombie: ZombieId::new(4),
                over: CellCoord::new(0, 5),
            }]
        );

        lane[4] = lane[5].take();
        zombie.behave(&mut lane, 2, &mut events);
        match &lane[4] {
            Some(Occupant::Plant(plant)) => assert_eq!(plant.health(), 3_900),
            other => panic!("unexpected occupant: {other:?}"),
        }
    }

    #[test]
    fn armor_absorbs_damage_before_the_body() {
        let mut zombie = Zombie::new(ZombieId::new(1), ZombieKind::Conehead, 0, 8.0, 0);
        let mut events = Vec::new();

        zombie.take_damage(360, &mut events);
        assert_eq!(zombie.armor(), 10);
        assert_eq!(zombie.health(), 200);
        assert!(events.is_empty());

        zombie.take_damage(20, &mut events);
        assert_eq!(zombie.armor(), 0);
        assert_eq!(zombie.health(), 190);
        assert_eq!(events, vec![Event::ArmorShed { zombie: ZombieId::new(1) }]);
    }

    #[test]
    fn slowed_zombies_walk_at_half_speed_until_it_wears_off() {
        let mut zombie = Zombie::new(ZombieId::new(0), ZombieKind::Normal, 0, 8.0, 0);
        let mut lane = vec![None; 9];
        let mut events = Vec::new();
        zombie.slow(3);

        zombie.behave(&mut lane, 2, &mut events);
        assert!((zombie.col() - 7.875).abs() < f32::EPSILON);
        assert!(zombie.is_slowed());

        zombie.behave(&mut lane, 3, &mut events);
        assert!(!zombie.is_slowed());
        assert!((zombie.col() - 7.625).abs() < f32::EPSILON);
    }

    #[test]
    fn leaving_the_lawn_reaches_the_house() {
        let mut zombie = Zombie::new(ZombieId::new(2), ZombieKind::Normal, 3, 0.1, 0);
        let mut lane = vec![None; 9];
        let mut events = Vec::new();

        zombie.behave(&mut lane, 1, &mut events);

        assert!(zombie.is_at_house());
        assert_eq!(
            events,
            vec![Event::ZombieReachedHouse {
                zombie: ZombieId::new(2),
                row: 3,
            }]
        );

        let col = zombie.col();
        zombie.behave(&mut lane, 2, &mut events);
        assert!((zombie.col() - col).abs() < f32::EPSILON, "zombies stop at the house");
    }
}
