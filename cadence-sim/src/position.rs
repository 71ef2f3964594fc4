//! Plane positions and the clamped goal-seeking step.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::direction::DirectionModel;
use crate::gaussian::GaussianSampler;

/// Point on the progress plane. Only `x` measures progress toward the goal;
/// `y` is the sideways drift that renderers plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading from `self` to `other`, in radians.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}

/// Move from `position` toward `goal`, turned by `offset` radians.
///
/// The step length is `min(cadence, distance)` so a run never walks past the
/// goal on its final cycle.
#[must_use]
pub fn advance(position: Point, goal: Point, cadence: u32, offset: f64) -> Point {
    let heading = position.angle_to(goal) + offset;
    let step = f64::from(cadence).min(position.distance_to(goal));
    Point {
        x: step.mul_add(heading.cos(), position.x),
        y: step.mul_add(heading.sin(), position.y),
    }
}

/// Samples a direction offset and applies [`advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdater {
    model: DirectionModel,
}

impl PositionUpdater {
    #[must_use]
    pub const fn new(model: DirectionModel) -> Self {
        Self { model }
    }

    #[must_use]
    pub const fn model(&self) -> DirectionModel {
        self.model
    }

    pub fn update<R: Rng + ?Sized>(
        &self,
        position: Point,
        goal: Point,
        cadence: u32,
        sampler: &mut GaussianSampler,
        rng: &mut R,
    ) -> Point {
        let offset = self.model.next_offset(sampler, rng);
        advance(position, goal, cadence, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn lands_exactly_on_goal_when_cadence_matches_distance() {
        let goal = Point::new(10.0, 0.0);
        let next = advance(Point::ORIGIN, goal, 10, 0.0);
        assert_eq!(next, goal);
        assert!(next.distance_to(goal).abs() < f64::EPSILON);
    }

    #[test]
    fn step_is_clamped_to_remaining_distance() {
        let goal = Point::new(4.0, 0.0);
        let next = advance(Point::ORIGIN, goal, 30, 0.0);
        assert!((next.x - 4.0).abs() < 1e-12);
        assert!(next.y.abs() < 1e-12);
    }

    #[test]
    fn offset_turns_the_step() {
        let goal = Point::new(100.0, 0.0);
        let next = advance(Point::ORIGIN, goal, 5, FRAC_PI_2);
        assert!(next.x.abs() < 1e-9);
        assert!((next.y - 5.0).abs() < 1e-9);
    }

    #[test]
    fn standing_on_goal_stays_put() {
        let goal = Point::new(3.0, 4.0);
        let next = advance(goal, goal, 7, 1.3);
        assert_eq!(next, goal);
    }

    #[test]
    fn remaining_distance_never_shrinks_by_more_than_cadence() {
        let updater = PositionUpdater::new(DirectionModel::new(20.0));
        let mut sampler = GaussianSampler::new();
        let mut rng = SmallRng::seed_from_u64(7);
        let goal = Point::new(200.0, 0.0);
        let mut position = Point::ORIGIN;
        for cadence in [1_u32, 3, 7, 14, 30].iter().cycle().take(500) {
            let before = position.distance_to(goal);
            let next = updater.update(position, goal, *cadence, &mut sampler, &mut rng);
            let after = next.distance_to(goal);
            assert!(after >= 0.0);
            assert!(after + 1e-9 >= before - f64::from(*cadence));
            assert!(position.distance_to(next) <= f64::from(*cadence) + 1e-9);
            position = next;
        }
    }
}
