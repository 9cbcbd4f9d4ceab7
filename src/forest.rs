//! Forest generation: rejection-sample trees until the covered area
//! reaches the requested density, or until placement gets stuck.

use std::f64::consts::PI;

use crate::config::GridSpec;
use crate::error::PlacementError;
use crate::geometry::Circle;
use crate::prng::RandomSource;
use crate::sampler::{place_non_overlapping, Occupancy, DEFAULT_MAX_ATTEMPTS};
use crate::spatial::SpatialGrid;
use crate::visibility;

#[derive(Debug, Clone)]
pub struct ForestParams {
    pub density: f64,
    pub radius: f64,
    pub width: f64,
    pub height: f64,
    pub max_attempts: u32,
    pub grid: Option<GridSpec>,
}

impl ForestParams {
    pub fn new(density: f64, radius: f64, width: f64, height: f64) -> Self {
        ForestParams {
            density,
            radius,
            width,
            height,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            grid: None,
        }
    }
}

/// The obstacle set of one trial. Trees keep placement order.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<Circle>,
    index: Option<SpatialGrid>,
    width: f64,
    height: f64,
    requested_density: f64,
    halted: Option<PlacementError>,
}

impl Forest {
    pub fn trees(&self) -> &[Circle] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn index(&self) -> Option<&SpatialGrid> {
        self.index.as_ref()
    }

    pub fn requested_density(&self) -> f64 {
        self.requested_density
    }

    /// Covered fraction of the rectangle, in `[0, 1]` for a valid forest.
    pub fn achieved_density(&self) -> f64 {
        let covered: f64 = self.trees.iter().map(Circle::area).sum();
        covered / (self.width * self.height)
    }

    /// Why generation stopped short of the requested density, if it did.
    pub fn halted(&self) -> Option<&PlacementError> {
        self.halted.as_ref()
    }

    /// Visibility between two observers through this forest.
    pub fn can_see(&self, from: &Circle, to: &Circle) -> bool {
        match &self.index {
            Some(grid) => visibility::can_see_indexed(from, to, grid),
            None => visibility::can_see(from, to, &self.trees),
        }
    }

    fn insert(&mut self, tree: Circle) {
        if let Some(grid) = self.index.as_mut() {
            grid.add_circle(tree);
        }
        self.trees.push(tree);
    }
}

impl Occupancy for Forest {
    fn overlaps_any(&self, candidate: &Circle) -> bool {
        match &self.index {
            Some(grid) => grid.overlaps_any(candidate),
            None => self.trees.overlaps_any(candidate),
        }
    }
}

/// Place trees of `params.radius` while `count * PI * r^2 < w * h * density`.
///
/// Exhaustion is not an error here: the forest built so far is returned
/// with `halted()` set, and `achieved_density()` tells how far it got.
pub fn generate_forest<R>(rng: &mut R, params: &ForestParams) -> Forest
where
    R: RandomSource + ?Sized,
{
    let (w, h, r) = (params.width, params.height, params.radius);
    let mut forest = Forest {
        trees: Vec::new(),
        index: params
            .grid
            .map(|g| SpatialGrid::new(w, h, g.columns, g.rows)),
        width: w,
        height: h,
        requested_density: params.density,
        halted: None,
    };

    while forest.trees.len() as f64 * PI * r * r < w * h * params.density {
        match place_non_overlapping(rng, &forest, r, w, h, params.max_attempts) {
            Ok(tree) => forest.insert(tree),
            Err(e) => {
                forest.halted = Some(e);
                break;
            }
        }
    }
    forest
}
