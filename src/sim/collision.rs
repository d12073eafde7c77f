//! Hitbox collision between the runner and everything scrolling past
//!
//! Hazards shrink their boxes so near misses stay near misses; coins grow
//! theirs so grazing one still counts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, FlyingHazard, GroundHazard};
use crate::Tuning;

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Shrink every side by `amount` (negative grows). Size never goes below zero.
    pub fn inset(&self, amount: f32) -> Self {
        let size = (self.size - Vec2::splat(2.0 * amount)).max(Vec2::ZERO);
        Self {
            min: self.min + Vec2::splat(amount),
            size,
        }
    }

    /// Strict overlap; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

/// Which hazard ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardHit {
    Ground(usize),
    Flying(usize),
}

/// First hazard overlapping the runner, if any
pub fn find_hazard_hit(
    runner_box: &Rect,
    ground: &[GroundHazard],
    flying: &[FlyingHazard],
    tuning: &Tuning,
) -> Option<HazardHit> {
    if let Some(i) = ground
        .iter()
        .position(|h| h.hitbox(tuning).intersects(runner_box))
    {
        return Some(HazardHit::Ground(i));
    }
    flying
        .iter()
        .position(|f| f.hitbox(tuning).intersects(runner_box))
        .map(HazardHit::Flying)
}

/// Whether a coin is being picked up. Collected coins never report a hit.
pub fn pickup_hit(coin: &Collectible, runner_box: &Rect, tuning: &Tuning) -> bool {
    !coin.collected && coin.hitbox(tuning).intersects(runner_box)
}

/// Mark every touched coin collected. Returns how many were picked up.
pub fn collect_pickups(runner_box: &Rect, coins: &mut [Collectible], tuning: &Tuning) -> u32 {
    let mut picked = 0;
    for coin in coins.iter_mut() {
        if pickup_hit(coin, runner_box, tuning) {
            coin.collected = true;
            picked += 1;
        }
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GroundHazardKind, Runner};

    #[test]
    fn test_rect_inset_and_outset() {
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(40.0, 30.0));
        let shrunk = r.inset(5.0);
        assert_eq!(shrunk.min, Vec2::new(15.0, 25.0));
        assert_eq!(shrunk.size, Vec2::new(30.0, 20.0));

        let grown = r.inset(-5.0);
        assert_eq!(grown.min, Vec2::new(5.0, 15.0));
        assert_eq!(grown.size, Vec2::new(50.0, 40.0));

        assert_eq!(r.inset(100.0).size, Vec2::ZERO);
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.intersects(&b));
        let c = Rect::new(Vec2::new(9.5, 9.5), Vec2::splat(10.0));
        assert!(a.intersects(&c));
        assert!(c.intersects(&a));
    }

    #[test]
    fn test_ground_hazard_hit_on_runner() {
        let tuning = Tuning::default();
        let runner = Runner::new();
        let ground = vec![GroundHazard::new(runner.pos.x + 20.0, GroundHazardKind::Short)];
        let hit = find_hazard_hit(&runner.hitbox(&tuning), &ground, &[], &tuning);
        assert_eq!(hit, Some(HazardHit::Ground(0)));
    }

    #[test]
    fn test_inset_forgives_visual_overlap() {
        let tuning = Tuning::default();
        let runner = Runner::new();
        // Visuals overlap by 4px, hitboxes are 10px apart
        let x = runner.bounds().max().x - 4.0;
        let ground = vec![GroundHazard::new(x, GroundHazardKind::Tall)];
        assert!(ground[0].bounds().intersects(&runner.bounds()));
        assert_eq!(find_hazard_hit(&runner.hitbox(&tuning), &ground, &[], &tuning), None);
    }

    #[test]
    fn test_jumping_clears_flying_height_only_when_high() {
        let tuning = Tuning::default();
        let runner = Runner::new();
        let bird = FlyingHazard::new(Vec2::new(runner.pos.x, 130.0));
        // Standing runner hitbox top is 206; bird hitbox bottom is 187
        assert_eq!(
            find_hazard_hit(&runner.hitbox(&tuning), &[], std::slice::from_ref(&bird), &tuning),
            None
        );

        let mut airborne = runner.clone();
        airborne.pos.y -= 40.0;
        assert_eq!(
            find_hazard_hit(&airborne.hitbox(&tuning), &[], &[bird], &tuning),
            Some(HazardHit::Flying(0))
        );
    }

    #[test]
    fn test_coin_outset_makes_pickup_generous() {
        let tuning = Tuning::default();
        let runner_box = Rect::new(Vec2::new(0.0, 0.0), Vec2::splat(20.0));
        // 3px gap between visuals, closed by the 5px outset
        let coin = Collectible::new(Vec2::new(23.0, 0.0));
        assert!(!coin.bounds().intersects(&runner_box));
        assert!(pickup_hit(&coin, &runner_box, &tuning));
    }

    #[test]
    fn test_collected_coin_never_hits_again() {
        let tuning = Tuning::default();
        let runner_box = Rect::new(Vec2::ZERO, Vec2::splat(50.0));
        let mut coins = vec![Collectible::new(Vec2::new(10.0, 10.0))];

        assert_eq!(collect_pickups(&runner_box, &mut coins, &tuning), 1);
        assert!(coins[0].collected);
        // Still overlapping geometrically
        assert!(coins[0].hitbox(&tuning).intersects(&runner_box));
        assert!(!pickup_hit(&coins[0], &runner_box, &tuning));
        assert_eq!(collect_pickups(&runner_box, &mut coins, &tuning), 0);
    }
}
