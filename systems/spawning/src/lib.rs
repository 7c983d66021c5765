#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning policy deciding when zombies, the final hoard and
//! sky sun enter a level.
//!
//! The policy only decides *when* something spawns. The level owns the random
//! source and decides *where*, so the same seed always replays the same run.

use lawn_defence_core::ZombieKind;

/// Time units between two sky sun drops.
pub const SUN_INTERVAL: u32 = 10;

const PER_MILLE: u64 = 1_000;
const FIRST_WAVE_START: u64 = 170;
const FIRST_WAVE_END: u64 = 445;
const SECOND_WAVE_END: u64 = 780;
const THIRD_WAVE_END: u64 = 945;
const VICTORY_WINDOW: u64 = 940;

const FIRST_WAVE_INTERVAL: u32 = 10;
const SECOND_WAVE_INTERVAL: u32 = 5;
const THIRD_WAVE_INTERVAL: u32 = 3;

const HOARD_BASE: u32 = 4;
const HOARD_PER_LEVEL: u32 = 2;

/// Piecewise schedule derived from a level's number and length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnSchedule {
    level_num: u32,
    time_length: u32,
}

impl SpawnSchedule {
    /// Creates the schedule for the provided level.
    #[must_use]
    pub const fn new(level_num: u32, time_length: u32) -> Self {
        Self {
            level_num,
            time_length,
        }
    }

    /// Returns the regular zombie interval active at `time`, if any.
    ///
    /// No zombies arrive before 17% of the level. Afterwards one arrives every
    /// 10 time units up to 44.5%, every 5 up to 78% and every 3 up to 94.5%.
    /// Regular spawning stops once the hoard becomes eligible.
    #[must_use]
    pub fn interval_at(&self, time: u32) -> Option<u32> {
        if time < self.floor_fraction(FIRST_WAVE_START) {
            None
        } else if time <= self.floor_fraction(FIRST_WAVE_END) {
            Some(FIRST_WAVE_INTERVAL)
        } else if time <= self.floor_fraction(SECOND_WAVE_END) {
            Some(SECOND_WAVE_INTERVAL)
        } else if time <= self.floor_fraction(THIRD_WAVE_END) {
            Some(THIRD_WAVE_INTERVAL)
        } else {
            None
        }
    }

    /// Last time at which the hoard is still withheld.
    #[must_use]
    pub fn hoard_threshold(&self) -> u32 {
        self.floor_fraction(THIRD_WAVE_END)
    }

    /// Reports whether the final hoard may fire at `time`.
    #[must_use]
    pub fn is_hoard_eligible(&self, time: u32) -> bool {
        time > self.hoard_threshold()
    }

    /// Number of regular zombies accompanying the flag zombie in the hoard.
    #[must_use]
    pub const fn hoard_size(&self) -> u32 {
        HOARD_BASE + HOARD_PER_LEVEL * self.level_num.saturating_sub(1)
    }

    /// First time at which clearing every zombie wins the level.
    #[must_use]
    pub fn victory_threshold(&self) -> u32 {
        let scaled = u64::from(self.time_length) * VICTORY_WINDOW;
        to_u32(scaled.div_ceil(PER_MILLE))
    }

    /// Time at which the level is won regardless of remaining zombies.
    #[must_use]
    pub const fn time_length(&self) -> u32 {
        self.time_length
    }

    fn floor_fraction(&self, per_mille: u64) -> u32 {
        to_u32(u64::from(self.time_length) * per_mille / PER_MILLE)
    }
}

fn to_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Decisions reached by [`Spawning::plan`] for a single cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnPlan {
    /// Whether one regular zombie should spawn.
    pub zombie: bool,
    /// Number of regular zombies joining the flag zombie when the hoard fires.
    pub hoard: Option<u32>,
    /// Whether a sky sun should drop.
    pub sun: bool,
}

/// Spawn timers owned by a level.
#[derive(Clone, Debug)]
pub struct Spawning {
    schedule: SpawnSchedule,
    last_zombie_spawn: u32,
    last_sun_spawn: u32,
    hoard_triggered: bool,
}

impl Spawning {
    /// Creates spawn timers that start counting from `start_time`.
    #[must_use]
    pub const fn new(schedule: SpawnSchedule, start_time: u32) -> Self {
        Self {
            schedule,
            last_zombie_spawn: start_time,
            last_sun_spawn: start_time,
            hoard_triggered: false,
        }
    }

    /// Schedule the timers follow.
    #[must_use]
    pub const fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    /// Whether the final hoard already fired.
    #[must_use]
    pub const fn hoard_triggered(&self) -> bool {
        self.hoard_triggered
    }

    /// Decides what spawns at `time` and advances the timers accordingly.
    ///
    /// Callers must execute every decision in the returned plan; the timers
    /// assume the spawns happened.
    pub fn plan(&mut self, time: u32) -> SpawnPlan {
        let mut plan = SpawnPlan::default();

        if let Some(interval) = self.schedule.interval_at(time) {
            if time.saturating_sub(self.last_zombie_spawn) >= interval {
                plan.zombie = true;
                self.last_zombie_spawn = time;
            }
        }

        if !self.hoard_triggered && self.schedule.is_hoard_eligible(time) {
            plan.hoard = Some(self.schedule.hoard_size());
            self.hoard_triggered = true;
        }

        if time.saturating_sub(self.last_sun_spawn) >= SUN_INTERVAL {
            plan.sun = true;
            self.last_sun_spawn = time;
        }

        plan
    }
}

/// Maps a uniform roll in `[0, 1)` onto the zombie a tombstone raises.
///
/// Rolls above 0.5 raise a normal zombie, rolls in `[0.3, 0.5]` a conehead,
/// `[0.15, 0.3)` a buckethead and anything lower a polevaulter.
#[must_use]
pub fn tombstone_variant(roll: f32) -> ZombieKind {
    if roll > 0.5 {
        ZombieKind::Normal
    } else if roll >= 0.3 {
        ZombieKind::Conehead
    } else if roll >= 0.15 {
        ZombieKind::Buckethead
    } else {
        ZombieKind::Polevaulter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_use_exact_fractions() {
        let schedule = SpawnSchedule::new(1, 100);
        assert_eq!(schedule.floor_fraction(FIRST_WAVE_START), 17);
        assert_eq!(schedule.hoard_threshold(), 94);
        assert_eq!(schedule.victory_threshold(), 94);
    }

    #[test]
    fn victory_threshold_rounds_up() {
        let schedule = SpawnSchedule::new(1, 90);
        assert_eq!(schedule.victory_threshold(), 85);
    }
}
