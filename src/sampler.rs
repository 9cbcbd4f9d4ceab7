//! Rejection sampling of non-overlapping circles.
//!
//! Candidates are drawn uniformly over the rectangle with no bias
//! correction, so achievable density stops at random-packing limits.

use crate::error::PlacementError;
use crate::geometry::{overlaps, Bounds, Circle};
use crate::prng::RandomSource;
use crate::spatial::SpatialGrid;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// A set of already placed circles a candidate must not overlap.
pub trait Occupancy {
    fn overlaps_any(&self, candidate: &Circle) -> bool;
}

impl Occupancy for [Circle] {
    fn overlaps_any(&self, candidate: &Circle) -> bool {
        self.iter().any(|c| overlaps(candidate, c))
    }
}

impl Occupancy for Vec<Circle> {
    fn overlaps_any(&self, candidate: &Circle) -> bool {
        self.as_slice().overlaps_any(candidate)
    }
}

impl Occupancy for SpatialGrid {
    fn overlaps_any(&self, candidate: &Circle) -> bool {
        if self.is_empty() {
            return false;
        }
        let region = Bounds::around(candidate).expand(self.max_radius());
        self.query(&region).any(|c| overlaps(candidate, c))
    }
}

/// Place a circle of `radius` uniformly in `[0, w) x [0, h)` so that it
/// overlaps nothing in `existing`. Each attempt draws x then y. Gives up
/// after `max_attempts` rejected candidates; zero attempts draws nothing.
pub fn place_non_overlapping<R, O>(
    rng: &mut R,
    existing: &O,
    radius: f64,
    w: f64,
    h: f64,
    max_attempts: u32,
) -> Result<Circle, PlacementError>
where
    R: RandomSource + ?Sized,
    O: Occupancy + ?Sized,
{
    for _ in 0..max_attempts {
        let x = rng.next_below(w);
        let y = rng.next_below(h);
        let candidate = Circle::new(x, y, radius);
        if !existing.overlaps_any(&candidate) {
            return Ok(candidate);
        }
    }
    Err(PlacementError::Exhausted {
        attempts: max_attempts,
        radius,
    })
}
