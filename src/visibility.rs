//! Line-of-sight test between two observers through a field of trees.
//!
//! A tree occludes when its center lies inside the segment's bounding
//! box grown by the tree radius AND its distance to the infinite line
//! through both observers is strictly less than the radius. The box
//! test is what keeps the infinite-line test near the segment; a tree
//! just past a segment end but inside the grown box can still occlude.

use crate::geometry::{distance, point_to_line_distance, Bounds, Circle, Point};
use crate::spatial::SpatialGrid;

/// Order endpoints so both call directions run identical arithmetic.
fn canonical(a: Point, b: Point) -> (Point, Point) {
    if (a.x, a.y) <= (b.x, b.y) {
        (a, b)
    } else {
        (b, a)
    }
}

/// Sight line between two observer centers, with its bounding box.
#[derive(Debug, Clone, Copy)]
struct SightLine {
    a: Point,
    b: Point,
    bounds: Bounds,
}

impl SightLine {
    fn new(from: &Circle, to: &Circle) -> Self {
        let (a, b) = canonical(from.center(), to.center());
        SightLine {
            a,
            b,
            bounds: Bounds::of_segment(a, b),
        }
    }

    fn blocked_by(&self, tree: &Circle) -> bool {
        let r = tree.r;
        if !self.bounds.expand(r).contains(tree.center()) {
            return false;
        }
        // Coincident observers: measure to the shared point instead.
        let d = point_to_line_distance(tree.center(), self.a, self.b)
            .unwrap_or_else(|_| distance(tree.center(), self.a));
        d < r
    }
}

/// Index of the first tree (in slice order) blocking the sight line.
pub fn first_occluder(from: &Circle, to: &Circle, obstacles: &[Circle]) -> Option<usize> {
    let line = SightLine::new(from, to);
    obstacles.iter().position(|tree| line.blocked_by(tree))
}

/// True if no tree in `obstacles` blocks the line from `from` to `to`.
pub fn can_see(from: &Circle, to: &Circle, obstacles: &[Circle]) -> bool {
    first_occluder(from, to, obstacles).is_none()
}

/// Same verdict as [`can_see`], visiting only the grid cells near the
/// sight line.
pub fn can_see_indexed(from: &Circle, to: &Circle, grid: &SpatialGrid) -> bool {
    if grid.is_empty() {
        return true;
    }
    let line = SightLine::new(from, to);
    let region = line.bounds.expand(grid.max_radius());
    !grid.query(&region).any(|tree| line.blocked_by(tree))
}
