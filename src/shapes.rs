//! Shape template catalog.
//!
//! DESIGN
//! ======
//! Each template knows how to describe itself twice at a given canvas size:
//! an outline (a small display list a front end strokes in grey) and a
//! sequence of ideal points sampled along the true geometry, which is what
//! the scorer compares against. Both are recomputed from the canvas size on
//! demand, so a resized canvas changes the template and not the stroke.
//!
//! Sampling walks a running float accumulator (`x += 5`, `angle += 0.1`)
//! and the sample counts depend on that accumulation, so it is kept as-is
//! rather than computed from an integer index.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod tests;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Horizontal sampling step for straight template segments, in pixels.
const LINE_STEP: f64 = 5.0;
/// Angular sampling step for arcs, in radians.
const ARC_STEP: f64 = 0.1;
/// Number of intervals sampled along the Z diagonal.
const DIAGONAL_STEPS: u32 = 20;

pub const DEFAULT_CANVAS_WIDTH: f64 = 600.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 400.0;
/// Largest accepted canvas side. Sampling cost grows linearly with size.
pub const MAX_CANVAS_SIDE: f64 = 10_000.0;

// =============================================================================
// CANVAS
// =============================================================================

/// Drawing surface dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    /// Build a canvas size; `None` unless both sides are finite, positive
    /// and at most [`MAX_CANVAS_SIDE`].
    #[must_use]
    pub fn new(width: f64, height: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0 && v <= MAX_CANVAS_SIDE;
        (valid(width) && valid(height)).then_some(Self { width, height })
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self { width: DEFAULT_CANVAS_WIDTH, height: DEFAULT_CANVAS_HEIGHT }
    }
}

// =============================================================================
// OUTLINE
// =============================================================================

/// One drawing instruction of a template outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Clockwise arc in canvas coordinates (y grows downward).
    Arc { cx: f64, cy: f64, radius: f64, start_angle: f64, end_angle: f64 },
}

// =============================================================================
// TEMPLATES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    StraightLine,
    ZShape,
    SemiCircle,
    Circle,
}

/// A named reference shape with a fixed leniency factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapeTemplate {
    pub kind: ShapeKind,
    pub name: &'static str,
    /// Multiplier on distance tolerances; `>= 1.0`, larger is more forgiving.
    pub leniency: f64,
}

const CATALOG: [ShapeTemplate; 4] = [
    ShapeTemplate { kind: ShapeKind::StraightLine, name: "Straight Line", leniency: 1.0 },
    ShapeTemplate { kind: ShapeKind::ZShape, name: "Z Shape", leniency: 1.0 },
    ShapeTemplate { kind: ShapeKind::SemiCircle, name: "Semi-Circle", leniency: 1.3 },
    ShapeTemplate { kind: ShapeKind::Circle, name: "Circle", leniency: 1.3 },
];

/// All templates in assessment order.
#[must_use]
pub fn catalog() -> &'static [ShapeTemplate] {
    &CATALOG
}

/// Look up the template for `kind`.
#[must_use]
pub fn template(kind: ShapeKind) -> &'static ShapeTemplate {
    match kind {
        ShapeKind::StraightLine => &CATALOG[0],
        ShapeKind::ZShape => &CATALOG[1],
        ShapeKind::SemiCircle => &CATALOG[2],
        ShapeKind::Circle => &CATALOG[3],
    }
}

impl ShapeTemplate {
    /// Display list for drawing the template on a canvas of the given size.
    #[must_use]
    pub fn outline(&self, canvas: CanvasSize) -> Vec<PathCommand> {
        let CanvasSize { width: w, height: h } = canvas;
        match self.kind {
            ShapeKind::StraightLine => vec![
                PathCommand::MoveTo { x: w * 0.2, y: h * 0.5 },
                PathCommand::LineTo { x: w * 0.8, y: h * 0.5 },
            ],
            ShapeKind::ZShape => vec![
                PathCommand::MoveTo { x: w * 0.2, y: h * 0.3 },
                PathCommand::LineTo { x: w * 0.8, y: h * 0.3 },
                PathCommand::LineTo { x: w * 0.2, y: h * 0.7 },
                PathCommand::LineTo { x: w * 0.8, y: h * 0.7 },
            ],
            ShapeKind::SemiCircle => vec![arc(canvas, PI)],
            ShapeKind::Circle => vec![arc(canvas, 2.0 * PI)],
        }
    }

    /// Reference points sampled along the template's geometry.
    #[must_use]
    pub fn ideal_points(&self, canvas: CanvasSize) -> Vec<Point> {
        let CanvasSize { width: w, height: h } = canvas;
        match self.kind {
            ShapeKind::StraightLine => horizontal_run(w * 0.2, w * 0.8, h * 0.5),
            ShapeKind::ZShape => {
                let mut points = horizontal_run(w * 0.2, w * 0.8, h * 0.3);
                for i in 0..=DIAGONAL_STEPS {
                    let t = f64::from(i) / f64::from(DIAGONAL_STEPS);
                    points.push(Point::new(w * 0.8 - t * (w * 0.6), h * 0.3 + t * (h * 0.4)));
                }
                points.extend(horizontal_run(w * 0.2, w * 0.8, h * 0.7));
                points
            }
            ShapeKind::SemiCircle => arc_samples(canvas, |angle| angle <= PI),
            ShapeKind::Circle => arc_samples(canvas, |angle| angle < 2.0 * PI),
        }
    }
}

fn arc(canvas: CanvasSize, end_angle: f64) -> PathCommand {
    PathCommand::Arc {
        cx: canvas.width * 0.5,
        cy: canvas.height * 0.5,
        radius: canvas.width * 0.3,
        start_angle: 0.0,
        end_angle,
    }
}

fn horizontal_run(from_x: f64, to_x: f64, y: f64) -> Vec<Point> {
    let mut points = Vec::new();
    let mut x = from_x;
    while x <= to_x {
        points.push(Point::new(x, y));
        x += LINE_STEP;
    }
    points
}

fn arc_samples(canvas: CanvasSize, keep_going: impl Fn(f64) -> bool) -> Vec<Point> {
    let cx = canvas.width * 0.5;
    let cy = canvas.height * 0.5;
    let radius = canvas.width * 0.3;

    let mut points = Vec::new();
    let mut angle = 0.0_f64;
    while keep_going(angle) {
        points.push(Point::new(cx + radius * angle.cos(), cy + radius * angle.sin()));
        angle += ARC_STEP;
    }
    points
}
