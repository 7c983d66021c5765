//! Sun drops and the level's sun bank.

use lawn_defence_core::{CellCoord, Event, SunId, SunSource, SUN_AMOUNT};

/// Time units a sun stays on the lawn before fading.
pub(crate) const SUN_LIFETIME: u32 = 10;

/// Collectible sun lying on the lawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sun {
    id: SunId,
    cell: CellCoord,
    amount: u32,
    spawned_at: u32,
    expired: bool,
}

impl Sun {
    fn new(id: SunId, cell: CellCoord, time: u32) -> Self {
        Self {
            id,
            cell,
            amount: SUN_AMOUNT,
            spawned_at: time,
            expired: false,
        }
    }

    /// Identifier assigned to the sun.
    #[must_use]
    pub const fn id(&self) -> SunId {
        self.id
    }

    /// Cell the sun landed on.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Amount of sun the drop is worth.
    #[must_use]
    pub const fn amount(&self) -> u32 {
        self.amount
    }

    /// Time at which the sun appeared.
    #[must_use]
    pub const fn spawned_at(&self) -> u32 {
        self.spawned_at
    }

    /// Time at which the sun fades.
    #[must_use]
    pub const fn expires_at(&self) -> u32 {
        self.spawned_at.saturating_add(SUN_LIFETIME)
    }

    /// Whether the sun faded during a previous update.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    fn update(&mut self, time: u32) {
        if time >= self.expires_at() {
            self.expired = true;
        }
    }
}

/// Suns on the lawn together with the amount the player can spend.
///
/// A drop is credited to the bank the moment it appears; collecting it only
/// clears it from the lawn.
#[derive(Clone, Debug, Default)]
pub(crate) struct SunField {
    suns: Vec<Sun>,
    next_id: u32,
    unclaimed: u32,
}

impl SunField {
    pub(crate) fn suns(&self) -> &[Sun] {
        &self.suns
    }

    pub(crate) fn unclaimed(&self) -> u32 {
        self.unclaimed
    }

    pub(crate) fn set_unclaimed(&mut self, amount: u32) {
        self.unclaimed = amount;
    }

    pub(crate) fn spend(&mut self, amount: u32) {
        self.unclaimed = self.unclaimed.saturating_sub(amount);
    }

    pub(crate) fn drop_sun(
        &mut self,
        cell: CellCoord,
        time: u32,
        source: SunSource,
        out_events: &mut Vec<Event>,
    ) -> SunId {
        let id = SunId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);

        let sun = Sun::new(id, cell, time);
        self.unclaimed = self.unclaimed.saturating_add(sun.amount());
        out_events.push(Event::SunSpawned {
            sun: id,
            cell,
            amount: sun.amount(),
            source,
        });
        self.suns.push(sun);
        id
    }

    pub(crate) fn update(&mut self, time: u32, out_events: &mut Vec<Event>) {
        for sun in &mut self.suns {
            sun.update(time);
        }

        self.suns.retain(|sun| {
            if sun.is_expired() {
                out_events.push(Event::SunExpired { sun: sun.id() });
                false
            } else {
                true
            }
        });
    }

    pub(crate) fn collect(&mut self, id: SunId) -> Option<u32> {
        let index = self.suns.iter().position(|sun| sun.id() == id)?;
        Some(self.suns.remove(index).amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_sun_is_credited_immediately() {
        let mut field = SunField::default();
        let mut events = Vec::new();

        let id = field.drop_sun(CellCoord::new(1, 2), 10, SunSource::Sky, &mut events);

        assert_eq!(field.unclaimed(), SUN_AMOUNT);
        assert_eq!(field.suns().len(), 1);
        assert_eq!(
            events,
            vec![Event::SunSpawned {
                sun: id,
                cell: CellCoord::new(1, 2),
                amount: SUN_AMOUNT,
                source: SunSource::Sky,
            }]
        );
    }

    #[test]
    fn suns_fade_after_their_lifetime() {
        let mut field = SunField::default();
        let mut events = Vec::new();
        let id = field.drop_sun(CellCoord::new(0, 0), 10, SunSource::Sky, &mut events);
        events.clear();

        field.update(19, &mut events);
        assert_eq!(field.suns().len(), 1);
        assert!(events.is_empty());

        field.update(20, &mut events);
        assert!(field.suns().is_empty());
        assert_eq!(events, vec![Event::SunExpired { sun: id }]);
        assert_eq!(field.unclaimed(), SUN_AMOUNT, "fading keeps the credit");
    }

    #[test]
    fn collecting_unknown_sun_is_absent() {
        let mut field = SunField::default();
        let mut events = Vec::new();
        let id = field.drop_sun(CellCoord::new(0, 0), 0, SunSource::Sunflower, &mut events);

        assert_eq!(field.collect(SunId::new(99)), None);
        assert_eq!(field.collect(id), Some(SUN_AMOUNT));
        assert_eq!(field.collect(id), None);
    }

    #[test]
    fn spending_saturates_at_zero() {
        let mut field = SunField::default();
        field.set_unclaimed(30);
        field.spend(50);
        assert_eq!(field.unclaimed(), 0);
    }
}
