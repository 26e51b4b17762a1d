//! Canvas-space geometry shared by the scorer and the shape catalog.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Smallest distance from `target` to any point in `candidates`.
///
/// Returns `f64::INFINITY` when `candidates` is empty.
#[must_use]
pub fn nearest_distance(target: Point, candidates: &[Point]) -> f64 {
    candidates
        .iter()
        .map(|c| target.distance(*c))
        .fold(f64::INFINITY, f64::min)
}

// =============================================================================
// BOUNDING BOX
// =============================================================================

/// Axis-aligned bounding box of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounding box of `points`, or `None` for an empty slice.
    #[must_use]
    pub fn of(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let init = Self { min_x: first.x, min_y: first.y, max_x: first.x, max_y: first.y };
        Some(points[1..].iter().fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Width over height. A flat box (zero height) divides by 1 instead.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let height = self.height();
        let height = if height == 0.0 { 1.0 } else { height };
        self.width() / height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}
