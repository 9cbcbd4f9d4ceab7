//! Uniform grid bucketing circles by the cell containing their center.
//!
//! A circle lives only in its center's cell, so region queries must be
//! widened by the largest radius stored. `max_radius()` exposes it.

use crate::geometry::{Bounds, Circle};

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    width: f64,
    height: f64,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<Circle>>,
    max_radius: f64,
    len: usize,
}

impl SpatialGrid {
    /// Grid of `columns x rows` cells over `[0, width] x [0, height]`.
    /// Zero counts are bumped to one.
    pub fn new(width: f64, height: f64, columns: u32, rows: u32) -> Self {
        let columns = columns.max(1) as usize;
        let rows = rows.max(1) as usize;
        SpatialGrid {
            width,
            height,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
            max_radius: 0.0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn add_circle(&mut self, circle: Circle) {
        let (cx, cy) = self.cell_containing(circle.x, circle.y);
        self.cells[cy * self.columns + cx].push(circle);
        self.max_radius = self.max_radius.max(circle.r);
        self.len += 1;
    }

    /// Cell coordinates holding `(x, y)`, clamped onto the grid.
    pub fn cell_containing(&self, x: f64, y: f64) -> (usize, usize) {
        (
            Self::axis_cell(x, self.width, self.columns),
            Self::axis_cell(y, self.height, self.rows),
        )
    }

    fn axis_cell(v: f64, extent: f64, count: usize) -> usize {
        let c = (v * count as f64 / extent).floor();
        if c.is_nan() || c < 0.0 {
            0
        } else {
            (c as usize).min(count - 1)
        }
    }

    pub fn cell(&self, cx: usize, cy: usize) -> &[Circle] {
        &self.cells[cy * self.columns + cx]
    }

    /// Every circle stored in a cell that overlaps `region`. This is a
    /// superset of the circles whose centers lie inside `region`.
    pub fn query(&self, region: &Bounds) -> impl Iterator<Item = &Circle> + '_ {
        let (x0, y0) = self.cell_containing(region.left, region.top);
        let (x1, y1) = self.cell_containing(region.right, region.bottom);
        (y0..=y1).flat_map(move |cy| {
            (x0..=x1).flat_map(move |cx| self.cell(cx, cy).iter())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_circle_by_center() {
        let mut grid = SpatialGrid::new(800.0, 600.0, 8, 6);
        grid.add_circle(Circle::new(150.0, 250.0, 5.0));
        assert_eq!(grid.cell(1, 2).len(), 1);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.max_radius(), 5.0);
    }

    #[test]
    fn far_edge_clamps_into_last_cell() {
        let grid = SpatialGrid::new(800.0, 600.0, 8, 6);
        assert_eq!(grid.cell_containing(800.0, 600.0), (7, 5));
        assert_eq!(grid.cell_containing(-3.0, 1e9), (0, 5));
    }

    #[test]
    fn query_returns_neighbouring_cells_only() {
        let mut grid = SpatialGrid::new(100.0, 100.0, 10, 10);
        grid.add_circle(Circle::new(5.0, 5.0, 1.0));
        grid.add_circle(Circle::new(15.0, 5.0, 1.0));
        grid.add_circle(Circle::new(95.0, 95.0, 1.0));
        let region = Bounds { left: 2.0, top: 2.0, right: 12.0, bottom: 8.0 };
        let found: Vec<&Circle> = grid.query(&region).collect();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.x < 20.0));
    }

    #[test]
    fn query_covers_every_center_in_region() {
        let mut grid = SpatialGrid::new(100.0, 100.0, 7, 3);
        let mut inside = 0;
        let region = Bounds { left: 20.0, top: 30.0, right: 61.0, bottom: 74.0 };
        for i in 0..20 {
            for j in 0..20 {
                let c = Circle::new(i as f64 * 5.0, j as f64 * 5.0, 1.0);
                if region.contains(c.center()) {
                    inside += 1;
                }
                grid.add_circle(c);
            }
        }
        let hits = grid
            .query(&region)
            .filter(|c| region.contains(c.center()))
            .count();
        assert_eq!(hits, inside);
    }
}
