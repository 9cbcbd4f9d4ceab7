//! Circle, point and line primitives on the simulation rectangle.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// A tree or an observer. Immutable once placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Circle { x, y, r }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.r * self.r
    }
}

/// Axis-aligned box, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Bounding box of the segment between two points.
    pub fn of_segment(a: Point, b: Point) -> Self {
        Bounds {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn around(c: &Circle) -> Self {
        Bounds {
            left: c.x - c.r,
            top: c.y - c.r,
            right: c.x + c.r,
            bottom: c.y + c.r,
        }
    }

    pub fn expand(&self, margin: f64) -> Self {
        Bounds {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }
}

/// True if the discs overlap. Touching (`d == r_a + r_b`) is NOT overlap.
pub fn overlaps(a: &Circle, b: &Circle) -> bool {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let r = a.r + b.r;
    dx * dx + dy * dy < r * r
}

pub fn distance(p: Point, q: Point) -> f64 {
    let dx = q.x - p.x;
    let dy = q.y - p.y;
    (dx * dx + dy * dy).sqrt()
}

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
pub fn point_to_line_distance(p: Point, a: Point, b: Point) -> Result<f64, GeometryError> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d = (dx * dx + dy * dy).sqrt();
    if d == 0.0 {
        return Err(GeometryError::DegenerateInput);
    }
    Ok((dy * p.x - dx * p.y + b.x * a.y - b.y * a.x).abs() / d)
}
