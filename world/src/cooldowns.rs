//! Placement cooldowns tracked per plant kind.

use lawn_defence_core::PlantKind;

/// Timer gating how often a plant kind may be placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cooldown {
    kind: PlantKind,
    duration: u32,
    last_used: Option<u32>,
}

impl Cooldown {
    /// Creates an unused cooldown for the provided plant kind.
    #[must_use]
    pub const fn new(kind: PlantKind) -> Self {
        Self {
            kind,
            duration: kind.cooldown(),
            last_used: None,
        }
    }

    /// Plant kind gated by the cooldown.
    #[must_use]
    pub const fn kind(&self) -> PlantKind {
        self.kind
    }

    /// Name of the plant kind, used as the lookup key.
    #[must_use]
    pub const fn plant_type(&self) -> &'static str {
        self.kind.name()
    }

    /// Time units that must pass between two placements.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Time of the most recent placement, if the kind was ever placed.
    #[must_use]
    pub const fn last_used(&self) -> Option<u32> {
        self.last_used
    }

    /// Time units left before the kind can be placed again.
    #[must_use]
    pub fn remaining(&self, time: u32) -> u32 {
        match self.last_used {
            Some(last_used) => {
                let elapsed = time.saturating_sub(last_used);
                self.duration.saturating_sub(elapsed)
            }
            None => 0,
        }
    }

    /// Whether the kind may be placed at `time`.
    #[must_use]
    pub fn is_ready(&self, time: u32) -> bool {
        self.remaining(time) == 0
    }

    /// Starts the cooldown at `time`.
    pub(crate) fn trigger(&mut self, time: u32) {
        self.last_used = Some(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unused_cooldown_is_ready() {
        let cooldown = Cooldown::new(PlantKind::Peashooter);
        assert!(cooldown.is_ready(0));
        assert_eq!(cooldown.remaining(0), 0);
    }

    #[test]
    fn triggered_cooldown_counts_down() {
        let mut cooldown = Cooldown::new(PlantKind::WallNut);
        cooldown.trigger(10);

        assert_eq!(cooldown.remaining(10), 30);
        assert_eq!(cooldown.remaining(25), 15);
        assert!(!cooldown.is_ready(39));
        assert!(cooldown.is_ready(40));
    }
}
