//! Shape score evaluator.
//!
//! DESIGN
//! ======
//! A traced stroke is compared against the ideal points of a shape template
//! with four independent sub-scores, each in `[0, 100]`:
//!
//! - accuracy: mean distance from each traced point to the template path
//! - completeness: fraction of the template path the stroke passed near
//! - smoothness: mean turning angle along the stroke
//! - shape matching: bounding-box proportions and placement
//!
//! The total is a fixed weighted sum rounded to an integer. Distance
//! tolerances scale with the template's leniency factor; smoothness does not.
//!
//! TRADE-OFFS
//! ==========
//! Nearest-point search is a plain O(n·m) scan. Strokes are a few hundred
//! points and templates a few hundred samples, so this stays well under a
//! millisecond and keeps the scorer free of spatial indexes.

#[cfg(test)]
#[path = "scoring_test.rs"]
mod tests;

use std::f64::consts::PI;

use serde::Serialize;

use crate::geometry::{BoundingBox, Point, nearest_distance};

/// Average nearest distance, in pixels, at which accuracy reaches zero (before leniency).
pub const ACCURACY_MAX_DISTANCE: f64 = 50.0;
/// Radius, in pixels, within which an ideal point counts as covered (before leniency).
pub const COVERAGE_RADIUS: f64 = 30.0;
/// Bounding-box centre offset, in pixels, at which the centre score reaches zero (before leniency).
pub const CENTER_MAX_DISTANCE: f64 = 50.0;
/// Points lost per unit of aspect-ratio difference (before leniency).
pub const ASPECT_PENALTY: f64 = 50.0;

pub const ACCURACY_WEIGHT: f64 = 0.4;
pub const COMPLETENESS_WEIGHT: f64 = 0.3;
pub const SMOOTHNESS_WEIGHT: f64 = 0.1;
pub const SHAPE_MATCHING_WEIGHT: f64 = 0.2;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("stroke has {count} point(s); at least 2 are required")]
    TooFewPoints { count: usize },
    #[error("shape template produced no ideal points")]
    EmptyTemplate,
    #[error("leniency factor must be a finite value >= 1.0, got {0}")]
    InvalidLeniency(f64),
    #[error("point coordinates must be finite")]
    NonFinitePoint,
}

/// All four sub-scores plus the weighted total for one traced shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub accuracy: f64,
    pub completeness: f64,
    pub smoothness: f64,
    pub shape_matching: f64,
    pub total: u8,
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Score a traced stroke against a template's ideal points.
///
/// # Errors
///
/// Returns [`ScoreError`] if the stroke has fewer than two points, the
/// template is empty, the leniency factor is out of range, or any coordinate
/// is not finite.
pub fn evaluate(user: &[Point], ideal: &[Point], leniency: f64) -> Result<ScoreBreakdown, ScoreError> {
    if user.len() < 2 {
        return Err(ScoreError::TooFewPoints { count: user.len() });
    }
    if ideal.is_empty() {
        return Err(ScoreError::EmptyTemplate);
    }
    if !leniency.is_finite() || leniency < 1.0 {
        return Err(ScoreError::InvalidLeniency(leniency));
    }
    if !user.iter().chain(ideal).all(|p| p.is_finite()) {
        return Err(ScoreError::NonFinitePoint);
    }

    let accuracy = accuracy_score(user, ideal, leniency);
    let completeness = completeness_score(user, ideal, leniency);
    let smoothness = smoothness_score(user);
    let shape_matching = shape_matching_score(user, ideal, leniency);
    let total = combine(accuracy, completeness, smoothness, shape_matching);

    Ok(ScoreBreakdown { accuracy, completeness, smoothness, shape_matching, total })
}

/// Weighted sum of the four sub-scores, rounded and capped at 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn combine(accuracy: f64, completeness: f64, smoothness: f64, shape_matching: f64) -> u8 {
    let weighted = accuracy * ACCURACY_WEIGHT
        + completeness * COMPLETENESS_WEIGHT
        + smoothness * SMOOTHNESS_WEIGHT
        + shape_matching * SHAPE_MATCHING_WEIGHT;
    weighted.round().clamp(0.0, 100.0) as u8
}

// =============================================================================
// SUB-SCORES
// =============================================================================

/// Linear penalty on the mean nearest distance from each traced point to the template.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn accuracy_score(user: &[Point], ideal: &[Point], leniency: f64) -> f64 {
    if user.is_empty() {
        return 0.0;
    }

    let total: f64 = user.iter().map(|p| nearest_distance(*p, ideal)).sum();
    let avg = total / user.len() as f64;
    let max_distance = ACCURACY_MAX_DISTANCE * leniency;

    (100.0 - (avg / max_distance) * 100.0).max(0.0)
}

/// Percentage of ideal points that have a traced point strictly inside the coverage radius.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completeness_score(user: &[Point], ideal: &[Point], leniency: f64) -> f64 {
    if user.is_empty() || ideal.is_empty() {
        return 0.0;
    }

    let radius = COVERAGE_RADIUS * leniency;
    let covered = ideal
        .iter()
        .filter(|p| nearest_distance(**p, user) < radius)
        .count();

    covered as f64 / ideal.len() as f64 * 100.0
}

/// Penalty on the mean turning angle between consecutive stroke segments.
///
/// Corners whose incoming or outgoing segment has zero length contribute no
/// angle but still count toward the `len - 2` denominator, so repeated
/// points make a stroke look slightly smoother than it is.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn smoothness_score(user: &[Point]) -> f64 {
    if user.len() < 3 {
        return 100.0;
    }

    let total: f64 = user
        .windows(3)
        .filter_map(|w| turning_angle(w[0], w[1], w[2]))
        .sum();
    let avg = total / (user.len() - 2) as f64;

    (100.0 - (avg / PI) * 100.0).max(0.0)
}

/// Angle in radians between `prev -> current` and `current -> next`.
///
/// `None` when either segment has zero length.
fn turning_angle(prev: Point, current: Point, next: Point) -> Option<f64> {
    let (ax, ay) = (current.x - prev.x, current.y - prev.y);
    let (bx, by) = (next.x - current.x, next.y - current.y);
    let mag_a = ax.hypot(ay);
    let mag_b = bx.hypot(by);
    if mag_a == 0.0 || mag_b == 0.0 {
        return None;
    }

    let cos = (ax * bx + ay * by) / (mag_a * mag_b);
    Some(cos.clamp(-1.0, 1.0).acos())
}

/// Equal blend of aspect-ratio similarity and bounding-box centre offset.
#[must_use]
pub fn shape_matching_score(user: &[Point], ideal: &[Point], leniency: f64) -> f64 {
    let (Some(user_box), Some(ideal_box)) = (BoundingBox::of(user), BoundingBox::of(ideal)) else {
        return 0.0;
    };

    let aspect_diff = (user_box.aspect_ratio() - ideal_box.aspect_ratio()).abs();
    let aspect = (100.0 - (aspect_diff * ASPECT_PENALTY) / leniency).max(0.0);

    let offset = user_box.center().distance(ideal_box.center());
    let center = (100.0 - (offset / (CENTER_MAX_DISTANCE * leniency)) * 100.0).max(0.0);

    aspect * 0.5 + center * 0.5
}
