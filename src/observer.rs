//! Observer placement against a finished forest.
//!
//! Observers are checked against trees only, never against each other.

use crate::error::PlacementError;
use crate::forest::Forest;
use crate::geometry::Circle;
use crate::prng::RandomSource;
use crate::sampler::place_non_overlapping;

pub const OBSERVER_RADIUS: f64 = 2.0;

pub fn place_observer<R>(
    rng: &mut R,
    forest: &Forest,
    radius: f64,
    max_attempts: u32,
) -> Result<Circle, PlacementError>
where
    R: RandomSource + ?Sized,
{
    place_non_overlapping(rng, forest, radius, forest.width(), forest.height(), max_attempts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{generate_forest, ForestParams};
    use crate::geometry::overlaps;
    use crate::prng::Pcg32;

    #[test]
    fn observers_clear_of_trees() {
        let mut rng = Pcg32::new(4, 0);
        let forest = generate_forest(&mut rng, &ForestParams::new(0.4, 5.0, 300.0, 200.0));
        for _ in 0..200 {
            let o = place_observer(&mut rng, &forest, OBSERVER_RADIUS, 1000).unwrap();
            assert_eq!(o.r, OBSERVER_RADIUS);
            assert!(forest.trees().iter().all(|t| !overlaps(&o, t)));
        }
    }

    #[test]
    fn exhaustion_propagates_unchanged() {
        let mut rng = Pcg32::new(4, 0);
        let mut params = ForestParams::new(0.9, 40.0, 100.0, 100.0);
        params.max_attempts = 50;
        let forest = generate_forest(&mut rng, &params);
        assert!(!forest.is_empty());
        let err = place_observer(&mut rng, &forest, 200.0, 7).unwrap_err();
        assert_eq!(err, PlacementError::Exhausted { attempts: 7, radius: 200.0 });
    }
}
