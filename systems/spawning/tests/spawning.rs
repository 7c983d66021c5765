use lawn_defence_core::ZombieKind;
use lawn_defence_system_spawning::{tombstone_variant, SpawnPlan, SpawnSchedule, Spawning, SUN_INTERVAL};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[test]
fn interval_steps_through_every_wave() {
    let schedule = SpawnSchedule::new(1, 1_000);

    assert_eq!(schedule.interval_at(169), None);
    assert_eq!(schedule.interval_at(170), Some(10));
    assert_eq!(schedule.interval_at(445), Some(10));
    assert_eq!(schedule.interval_at(446), Some(5));
    assert_eq!(schedule.interval_at(780), Some(5));
    assert_eq!(schedule.interval_at(781), Some(3));
    assert_eq!(schedule.interval_at(945), Some(3));
    assert_eq!(schedule.interval_at(946), None);
    assert!(!schedule.is_hoard_eligible(945));
    assert!(schedule.is_hoard_eligible(946));
}

#[test]
fn thresholds_use_floor_of_the_fraction() {
    let schedule = SpawnSchedule::new(1, 90);

    assert_eq!(schedule.interval_at(14), None);
    assert_eq!(schedule.interval_at(15), Some(10), "floor(0.17 * 90) = 15");
    assert_eq!(schedule.hoard_threshold(), 85, "floor(0.945 * 90) = 85");
    assert_eq!(schedule.victory_threshold(), 85, "ceil(0.94 * 90) = 85");
}

#[test]
fn hoard_grows_with_the_level_number() {
    assert_eq!(SpawnSchedule::new(1, 100).hoard_size(), 4);
    assert_eq!(SpawnSchedule::new(2, 100).hoard_size(), 6);
    assert_eq!(SpawnSchedule::new(5, 100).hoard_size(), 12);
}

#[test]
fn regular_zombies_follow_the_active_interval() {
    let mut spawning = Spawning::new(SpawnSchedule::new(1, 100), 0);
    let spawned: Vec<u32> = (1..=94)
        .filter(|&time| spawning.plan(time).zombie)
        .collect();

    assert_eq!(
        spawned,
        vec![17, 27, 37, 45, 50, 55, 60, 65, 70, 75, 79, 82, 85, 88, 91, 94]
    );
}

#[test]
fn hoard_fires_once_however_long_the_level_runs() {
    let mut spawning = Spawning::new(SpawnSchedule::new(3, 100), 0);
    let hoards: Vec<(u32, SpawnPlan)> = (1..=200)
        .map(|time| (time, spawning.plan(time)))
        .filter(|(_, plan)| plan.hoard.is_some())
        .collect();

    assert_eq!(hoards.len(), 1);
    assert_eq!(hoards[0].0, 95);
    assert_eq!(hoards[0].1.hoard, Some(8));
    assert!(spawning.hoard_triggered());
}

#[test]
fn sky_sun_drops_on_a_fixed_cadence() {
    let mut spawning = Spawning::new(SpawnSchedule::new(1, 100), 3);
    let drops: Vec<u32> = (4..=45).filter(|&time| spawning.plan(time).sun).collect();

    assert_eq!(drops, vec![13, 23, 33, 43]);
    assert!(drops.windows(2).all(|pair| pair[1] - pair[0] == SUN_INTERVAL));
}

#[test]
fn tombstone_rolls_map_onto_the_draw_table() {
    assert_eq!(tombstone_variant(0.99), ZombieKind::Normal);
    assert_eq!(tombstone_variant(0.5), ZombieKind::Conehead);
    assert_eq!(tombstone_variant(0.3), ZombieKind::Conehead);
    assert_eq!(tombstone_variant(0.29), ZombieKind::Buckethead);
    assert_eq!(tombstone_variant(0.15), ZombieKind::Buckethead);
    assert_eq!(tombstone_variant(0.0), ZombieKind::Polevaulter);

    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed);
    let draws = 10_000;
    let polevaulters = (0..draws)
        .filter(|_| tombstone_variant(rng.gen()) == ZombieKind::Polevaulter)
        .count();
    let share = polevaulters as f64 / f64::from(draws);
    assert!((share - 0.15).abs() < 0.02, "observed share {share:.3}");
}
