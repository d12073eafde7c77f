//! Procedural spawning of hazards and coins
//!
//! Three independent timers with randomized thresholds. Spacing is checked
//! only at spawn time against whatever is already on the field.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, Entities, FlyingHazard, GroundHazard, GroundHazardKind};
use crate::Tuning;
use crate::consts::FIELD_WIDTH;

/// Outcome of one timer on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnAttempt {
    /// Timer has not fired
    #[default]
    Idle,
    /// Timer fired but the coin flip said no
    Skipped,
    /// Spacing check failed
    Rejected,
    Spawned,
}

/// What the scheduler did on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnReport {
    pub ground: SpawnAttempt,
    pub coin: SpawnAttempt,
    pub flying: SpawnAttempt,
}

/// Spawn timers
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    pub ground_timer: f32,
    ground_threshold: f32,
    pub coin_timer: f32,
    coin_threshold: f32,
    /// Only accumulates past the distance gate
    pub flying_timer: f32,
}

impl SpawnScheduler {
    pub fn new(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            ground_timer: 0.0,
            ground_threshold: Self::ground_threshold(tuning, rng),
            coin_timer: 0.0,
            coin_threshold: Self::coin_threshold(tuning, rng),
            flying_timer: 0.0,
        }
    }

    fn ground_threshold(tuning: &Tuning, rng: &mut impl Rng) -> f32 {
        rng.random_range(tuning.ground_spawn_min_secs..tuning.ground_spawn_max_secs)
    }

    fn coin_threshold(tuning: &Tuning, rng: &mut impl Rng) -> f32 {
        rng.random_range(tuning.coin_spawn_min_secs..tuning.coin_spawn_max_secs)
    }

    /// Seconds the ground timer must exceed before firing
    pub fn next_ground_threshold(&self) -> f32 {
        self.ground_threshold
    }

    /// Seconds the coin timer must exceed before firing
    pub fn next_coin_threshold(&self) -> f32 {
        self.coin_threshold
    }

    /// Advance all timers and spawn whatever is due.
    ///
    /// Order matters: ground hazards first, then coins, then flying hazards,
    /// so each later check sees entities created earlier in the same tick.
    pub fn update(
        &mut self,
        dt: f32,
        distance: f32,
        entities: &mut Entities,
        rng: &mut impl Rng,
        tuning: &Tuning,
    ) -> SpawnReport {
        SpawnReport {
            ground: self.update_ground(dt, entities, rng, tuning),
            coin: self.update_coin(dt, entities, rng, tuning),
            flying: self.update_flying(dt, distance, entities, tuning),
        }
    }

    fn update_ground(
        &mut self,
        dt: f32,
        entities: &mut Entities,
        rng: &mut impl Rng,
        tuning: &Tuning,
    ) -> SpawnAttempt {
        self.ground_timer += dt;
        if self.ground_timer <= self.ground_threshold {
            return SpawnAttempt::Idle;
        }

        let kind = GroundHazardKind::ALL[rng.random_range(0..GroundHazardKind::ALL.len())];
        let x = FIELD_WIDTH + tuning.ground_spawn_offset;
        entities.ground.push(GroundHazard::new(x, kind));
        log::debug!("Spawned {kind:?} ground hazard at x={x}");

        self.ground_timer = 0.0;
        self.ground_threshold = Self::ground_threshold(tuning, rng);
        SpawnAttempt::Spawned
    }

    fn update_coin(
        &mut self,
        dt: f32,
        entities: &mut Entities,
        rng: &mut impl Rng,
        tuning: &Tuning,
    ) -> SpawnAttempt {
        self.coin_timer += dt;
        if self.coin_timer <= self.coin_threshold {
            return SpawnAttempt::Idle;
        }

        let attempt = if rng.random_bool(tuning.coin_spawn_chance) {
            let x = FIELD_WIDTH + rng.random_range(tuning.coin_offset_min..tuning.coin_offset_max);
            if coin_spot_clear(x, entities, tuning) {
                entities
                    .collectibles
                    .push(Collectible::new(Vec2::new(x, tuning.coin_y)));
                log::debug!("Spawned coin at x={x}");
                SpawnAttempt::Spawned
            } else {
                log::debug!("Coin at x={x} too close to a hazard, skipped");
                SpawnAttempt::Rejected
            }
        } else {
            SpawnAttempt::Skipped
        };

        // Full reset whatever happened
        self.coin_timer = 0.0;
        self.coin_threshold = Self::coin_threshold(tuning, rng);
        attempt
    }

    fn update_flying(
        &mut self,
        dt: f32,
        distance: f32,
        entities: &mut Entities,
        tuning: &Tuning,
    ) -> SpawnAttempt {
        if distance <= tuning.flying_min_distance {
            return SpawnAttempt::Idle;
        }
        self.flying_timer += dt;
        if self.flying_timer <= tuning.flying_interval_secs {
            return SpawnAttempt::Idle;
        }

        let x = FIELD_WIDTH + tuning.flying_spawn_offset;
        if flying_spot_clear(x, entities, tuning) {
            entities
                .flying
                .push(FlyingHazard::new(Vec2::new(x, tuning.flying_y)));
            log::debug!("Spawned flying hazard at x={x}");
            self.flying_timer = 0.0;
            SpawnAttempt::Spawned
        } else {
            // Quick retry instead of waiting a full interval
            log::debug!("Flying hazard blocked, retrying soon");
            self.flying_timer = tuning.flying_retry_secs;
            SpawnAttempt::Rejected
        }
    }
}

/// A coin may not appear within `coin_clearance` of any hazard
pub fn coin_spot_clear(x: f32, entities: &Entities, tuning: &Tuning) -> bool {
    let clear = tuning.coin_clearance;
    entities.ground.iter().all(|h| (h.x - x).abs() >= clear)
        && entities.flying.iter().all(|f| (f.pos.x - x).abs() >= clear)
}

/// A flying hazard keeps its distance from coins and ground hazards
pub fn flying_spot_clear(x: f32, entities: &Entities, tuning: &Tuning) -> bool {
    entities
        .collectibles
        .iter()
        .all(|c| (c.pos.x - x).abs() >= tuning.flying_coin_clearance)
        && entities
            .ground
            .iter()
            .all(|h| (h.x - x).abs() >= tuning.flying_ground_clearance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup(seed: u64) -> (Tuning, Pcg32, SpawnScheduler) {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let scheduler = SpawnScheduler::new(&tuning, &mut rng);
        (tuning, rng, scheduler)
    }

    #[test]
    fn test_thresholds_within_ranges() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let s = SpawnScheduler::new(&tuning, &mut rng);
            assert!((1.5..3.0).contains(&s.next_ground_threshold()));
            assert!((3.0..5.0).contains(&s.next_coin_threshold()));
        }
    }

    #[test]
    fn test_ground_fires_at_right_edge_and_resets() {
        let (tuning, mut rng, mut scheduler) = setup(1);
        let mut entities = Entities::default();
        let mut ticks = 0;
        loop {
            let report = scheduler.update(SIM_DT, 0.0, &mut entities, &mut rng, &tuning);
            ticks += 1;
            if report.ground == SpawnAttempt::Spawned {
                break;
            }
            assert!(ticks <= 181, "ground timer never fired");
        }
        assert!(ticks >= 90);
        assert_eq!(entities.ground.len(), 1);
        assert_eq!(entities.ground[0].x, FIELD_WIDTH + 20.0);
        assert_eq!(scheduler.ground_timer, 0.0);
    }

    #[test]
    fn test_flying_gated_by_distance() {
        let (tuning, mut rng, mut scheduler) = setup(2);
        let mut entities = Entities::default();
        for _ in 0..600 {
            scheduler.update(SIM_DT, 300.0, &mut entities, &mut rng, &tuning);
        }
        assert_eq!(scheduler.flying_timer, 0.0);
        assert!(entities.flying.is_empty());

        scheduler.update(SIM_DT, 300.5, &mut entities, &mut rng, &tuning);
        assert!(scheduler.flying_timer > 0.0);
    }

    #[test]
    fn test_flying_spawns_at_fixed_spot() {
        let (tuning, mut rng, mut scheduler) = setup(3);
        let mut entities = Entities::default();
        scheduler.flying_timer = 4.0;
        let report = scheduler.update(SIM_DT, 1000.0, &mut entities, &mut rng, &tuning);
        assert_eq!(report.flying, SpawnAttempt::Spawned);
        assert_eq!(
            entities.flying[0].pos,
            Vec2::new(FIELD_WIDTH + 50.0, tuning.flying_y)
        );
        assert_eq!(scheduler.flying_timer, 0.0);
    }

    /// The flying timer drops back to 3.5s on rejection rather than 0. This
    /// asymmetry with the coin timer is intentional and must stay.
    #[test]
    fn test_flying_rejection_sets_quick_retry() {
        let (tuning, mut rng, mut scheduler) = setup(4);
        let mut entities = Entities::default();
        entities
            .ground
            .push(GroundHazard::new(FIELD_WIDTH + 50.0 - 79.0, GroundHazardKind::Tall));
        scheduler.flying_timer = 4.0;

        let report = scheduler.update(SIM_DT, 1000.0, &mut entities, &mut rng, &tuning);
        assert_eq!(report.flying, SpawnAttempt::Rejected);
        assert_eq!(scheduler.flying_timer, 3.5);
        assert!(entities.flying.is_empty());

        // Next attempt comes after another 0.5s, not 4s
        entities.ground.clear();
        let mut ticks = 0;
        while entities.flying.is_empty() {
            scheduler.update(SIM_DT, 1000.0, &mut entities, &mut rng, &tuning);
            ticks += 1;
        }
        assert!((30..=32).contains(&ticks), "retry took {ticks} ticks");
    }

    #[test]
    fn test_flying_blocked_by_nearby_coin() {
        let tuning = Tuning::default();
        let mut entities = Entities::default();
        let x = FIELD_WIDTH + 50.0;
        entities.collectibles.push(Collectible::new(Vec2::new(x + 99.0, 90.0)));
        assert!(!flying_spot_clear(x, &entities, &tuning));
        entities.collectibles[0].pos.x = x + 100.0;
        assert!(flying_spot_clear(x, &entities, &tuning));
    }

    #[test]
    fn test_coin_rejection_resets_timer_fully() {
        let mut tuning = Tuning::default();
        tuning.coin_spawn_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(5);
        let mut scheduler = SpawnScheduler::new(&tuning, &mut rng);
        let mut entities = Entities::default();
        // Hazards blanket the whole candidate window
        for x in (900..1000).step_by(50) {
            entities.ground.push(GroundHazard::new(x as f32, GroundHazardKind::Short));
        }
        scheduler.coin_timer = 10.0;
        let report = scheduler.update(0.0, 0.0, &mut entities, &mut rng, &tuning);
        assert_eq!(report.coin, SpawnAttempt::Rejected);
        assert!(entities.collectibles.is_empty());
        assert_eq!(scheduler.coin_timer, 0.0);
    }

    #[test]
    fn test_coin_lands_in_offset_window() {
        let mut tuning = Tuning::default();
        tuning.coin_spawn_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(6);
        let mut scheduler = SpawnScheduler::new(&tuning, &mut rng);
        let mut entities = Entities::default();
        for _ in 0..200 {
            scheduler.coin_timer = 10.0;
            scheduler.update(0.0, 0.0, &mut entities, &mut rng, &tuning);
        }
        assert_eq!(entities.collectibles.len(), 200);
        for coin in &entities.collectibles {
            assert!((900.0..1000.0).contains(&coin.pos.x));
            assert_eq!(coin.pos.y, tuning.coin_y);
        }
    }

    #[test]
    fn test_spacing_holds_over_ten_thousand_attempts() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(0xD1_70);
        let mut scheduler = SpawnScheduler::new(&tuning, &mut rng);
        let (mut coin_spawns, mut coin_rejects) = (0, 0);
        let (mut flying_spawns, mut flying_rejects) = (0, 0);

        for _ in 0..10_000 {
            let mut entities = Entities::default();
            for _ in 0..rng.random_range(0..3) {
                let kind = GroundHazardKind::ALL[rng.random_range(0..3)];
                entities
                    .ground
                    .push(GroundHazard::new(rng.random_range(600.0..1100.0), kind));
            }
            for _ in 0..rng.random_range(0..2) {
                entities
                    .flying
                    .push(FlyingHazard::new(Vec2::new(rng.random_range(600.0..1100.0), 130.0)));
            }
            for _ in 0..rng.random_range(0..2) {
                entities
                    .collectibles
                    .push(Collectible::new(Vec2::new(rng.random_range(600.0..1100.0), 90.0)));
            }
            let flying_before = entities.flying.len();
            let coins_before = entities.collectibles.len();

            // Force coin and flying timers; a fresh ground hazard at the edge
            // would block every flying spawn, so only fire it some of the time
            scheduler.ground_timer = if rng.random_bool(0.5) { 10.0 } else { 0.0 };
            scheduler.coin_timer = 10.0;
            scheduler.flying_timer = 10.0;
            let report = scheduler.update(0.0, 1000.0, &mut entities, &mut rng, &tuning);

            match report.coin {
                SpawnAttempt::Spawned => {
                    coin_spawns += 1;
                    let coin = entities.collectibles[coins_before].pos.x;
                    assert!(entities.ground.iter().all(|h| (h.x - coin).abs() >= 100.0));
                    assert!(
                        entities.flying[..flying_before]
                            .iter()
                            .all(|f| (f.pos.x - coin).abs() >= 100.0)
                    );
                }
                SpawnAttempt::Rejected => coin_rejects += 1,
                _ => {}
            }
            match report.flying {
                SpawnAttempt::Spawned => {
                    flying_spawns += 1;
                    let bird = entities.flying[flying_before].pos.x;
                    assert!(entities.collectibles.iter().all(|c| (c.pos.x - bird).abs() >= 100.0));
                    assert!(entities.ground.iter().all(|h| (h.x - bird).abs() >= 80.0));
                }
                SpawnAttempt::Rejected => {
                    flying_rejects += 1;
                    assert_eq!(scheduler.flying_timer, 3.5);
                }
                _ => unreachable!("flying timer was forced to fire"),
            }
        }

        assert!(coin_spawns > 0 && coin_rejects > 0);
        assert!(flying_spawns > 0 && flying_rejects > 0);
    }

    #[test]
    fn test_consecutive_ground_hazards_keep_their_gap() {
        let (tuning, mut rng, mut scheduler) = setup(9);
        let mut entities = Entities::default();
        let min_gap = tuning.ground_spawn_min_secs / SIM_DT * tuning.base_speed();
        let speed = tuning.base_speed();

        for _ in 0..10_000 {
            let before = entities.ground.len();
            scheduler.update(SIM_DT, 0.0, &mut entities, &mut rng, &tuning);
            if entities.ground.len() > before && before > 0 {
                let gap = entities.ground[before].x - entities.ground[before - 1].x;
                assert!(gap >= min_gap - speed, "gap {gap} below {min_gap}");
            }
            for hazard in &mut entities.ground {
                hazard.scroll(speed);
            }
        }
    }
}
