#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// `count` points evenly spaced from (0, y) to (600, y).
fn horizontal_line(count: usize, y: f64) -> Vec<Point> {
    let step = 600.0 / (count - 1) as f64;
    (0..count).map(|i| Point::new(i as f64 * step, y)).collect()
}

fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
    raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
}

// =============================================================================
// evaluate
// =============================================================================

#[test]
fn exact_trace_of_line_scores_100() {
    let ideal = horizontal_line(100, 100.0);
    let user = ideal.clone();
    let score = evaluate(&user, &ideal, 1.0).unwrap();
    assert!(approx_eq(score.accuracy, 100.0));
    assert!(approx_eq(score.completeness, 100.0));
    assert!(approx_eq(score.smoothness, 100.0));
    assert!(approx_eq(score.shape_matching, 100.0));
    assert_eq!(score.total, 100);
}

#[test]
fn far_away_stroke_scores_zero_accuracy() {
    let ideal = horizontal_line(100, 100.0);
    let user = pts(&[(0.0, 600.0), (600.0, 600.0)]);
    let score = evaluate(&user, &ideal, 1.0).unwrap();
    assert_eq!(score.accuracy, 0.0);
    assert_eq!(score.completeness, 0.0);
    assert_eq!(score.smoothness, 100.0);
    // Same aspect ratio, centre 500px away.
    assert!(approx_eq(score.shape_matching, 50.0));
    assert_eq!(score.total, 20);
}

#[test]
fn evaluate_is_deterministic() {
    let ideal = horizontal_line(50, 200.0);
    let user = pts(&[(3.0, 190.0), (150.0, 214.0), (300.0, 199.0), (420.0, 230.0), (590.0, 205.0)]);
    let a = evaluate(&user, &ideal, 1.3).unwrap();
    let b = evaluate(&user, &ideal, 1.3).unwrap();
    assert_eq!(a, b);
}

#[test]
fn evaluate_rejects_short_stroke() {
    let ideal = horizontal_line(10, 0.0);
    assert_eq!(evaluate(&[], &ideal, 1.0), Err(ScoreError::TooFewPoints { count: 0 }));
    assert_eq!(
        evaluate(&[Point::new(0.0, 0.0)], &ideal, 1.0),
        Err(ScoreError::TooFewPoints { count: 1 })
    );
}

#[test]
fn evaluate_rejects_empty_template() {
    let user = horizontal_line(10, 0.0);
    assert_eq!(evaluate(&user, &[], 1.0), Err(ScoreError::EmptyTemplate));
}

#[test]
fn evaluate_rejects_bad_leniency() {
    let line = horizontal_line(10, 0.0);
    assert!(matches!(evaluate(&line, &line, 0.5), Err(ScoreError::InvalidLeniency(_))));
    assert!(matches!(evaluate(&line, &line, f64::NAN), Err(ScoreError::InvalidLeniency(_))));
}

#[test]
fn evaluate_rejects_non_finite_points() {
    let ideal = horizontal_line(10, 0.0);
    let user = pts(&[(0.0, 0.0), (f64::NAN, 1.0)]);
    assert_eq!(evaluate(&user, &ideal, 1.0), Err(ScoreError::NonFinitePoint));
}

#[test]
fn total_stays_within_bounds() {
    let ideal = horizontal_line(60, 100.0);
    for offset in [0.0, 7.5, 31.0, 80.0, 1_000.0] {
        for leniency in [1.0, 1.3, 4.0] {
            let user: Vec<Point> = ideal
                .iter()
                .enumerate()
                .map(|(i, p)| Point::new(p.x, p.y + offset * if i % 2 == 0 { 1.0 } else { -1.0 }))
                .collect();
            let score = evaluate(&user, &ideal, leniency).unwrap();
            assert!(score.total <= 100);
            for sub in [score.accuracy, score.completeness, score.smoothness, score.shape_matching] {
                assert!((0.0..=100.0).contains(&sub), "sub-score {sub} out of range");
            }
        }
    }
}

// =============================================================================
// combine
// =============================================================================

#[test]
fn combine_applies_weights() {
    assert_eq!(combine(100.0, 100.0, 100.0, 100.0), 100);
    assert_eq!(combine(0.0, 0.0, 0.0, 0.0), 0);
    assert_eq!(combine(50.0, 50.0, 50.0, 50.0), 50);
    // 0.4 * 100 only.
    assert_eq!(combine(100.0, 0.0, 0.0, 0.0), 40);
    assert_eq!(combine(0.0, 0.0, 100.0, 0.0), 10);
}

// =============================================================================
// accuracy
// =============================================================================

#[test]
fn accuracy_decreases_with_distance() {
    let ideal = horizontal_line(61, 100.0);
    let mut last = f64::INFINITY;
    for shift in [0.0, 10.0, 20.0, 40.0] {
        let user: Vec<Point> = ideal.iter().map(|p| Point::new(p.x, p.y + shift)).collect();
        let score = accuracy_score(&user, &ideal, 1.0);
        assert!(score < last, "shift {shift} did not lower accuracy");
        last = score;
    }
}

#[test]
fn accuracy_is_linear_in_mean_distance() {
    let ideal = horizontal_line(61, 100.0);
    let user: Vec<Point> = ideal.iter().map(|p| Point::new(p.x, p.y + 10.0)).collect();
    assert!(approx_eq(accuracy_score(&user, &ideal, 1.0), 80.0));
}

#[test]
fn accuracy_leniency_widens_tolerance() {
    let ideal = horizontal_line(61, 100.0);
    let user: Vec<Point> = ideal.iter().map(|p| Point::new(p.x, p.y + 60.0)).collect();
    assert_eq!(accuracy_score(&user, &ideal, 1.0), 0.0);
    assert!(accuracy_score(&user, &ideal, 1.3) > 0.0);
}

#[test]
fn accuracy_of_empty_stroke_is_zero() {
    assert_eq!(accuracy_score(&[], &horizontal_line(5, 0.0), 1.0), 0.0);
}

// =============================================================================
// completeness
// =============================================================================

#[test]
fn completeness_counts_covered_ideal_points() {
    let ideal: Vec<Point> = (0..10).map(|i| Point::new(f64::from(i) * 10.0, 0.0)).collect();
    let user = pts(&[(0.0, 0.0), (40.0, 0.0)]);
    // x = 0..=60 are strictly inside 30px; x = 70 sits exactly on the radius.
    assert!(approx_eq(completeness_score(&user, &ideal, 1.0), 70.0));
}

#[test]
fn completeness_is_zero_when_nothing_is_near() {
    let ideal = horizontal_line(20, 0.0);
    let user = pts(&[(0.0, 500.0), (600.0, 500.0)]);
    assert_eq!(completeness_score(&user, &ideal, 1.0), 0.0);
}

#[test]
fn completeness_is_full_for_partial_length_within_radius() {
    let ideal = horizontal_line(20, 0.0);
    let user: Vec<Point> = ideal.iter().map(|p| Point::new(p.x, 25.0)).collect();
    assert!(approx_eq(completeness_score(&user, &ideal, 1.0), 100.0));
}

// =============================================================================
// smoothness
// =============================================================================

#[test]
fn smoothness_is_100_below_three_points() {
    assert_eq!(smoothness_score(&[]), 100.0);
    assert_eq!(smoothness_score(&pts(&[(0.0, 0.0)])), 100.0);
    assert_eq!(smoothness_score(&pts(&[(0.0, 0.0), (50.0, 80.0)])), 100.0);
}

#[test]
fn smoothness_penalizes_right_angles() {
    let user = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (20.0, 10.0)]);
    assert!(approx_eq(smoothness_score(&user), 50.0));
}

#[test]
fn smoothness_of_reversal_is_zero() {
    let user = pts(&[(0.0, 0.0), (10.0, 0.0), (0.0, 0.0)]);
    assert!(approx_eq(smoothness_score(&user), 0.0));
}

#[test]
fn smoothness_skipped_corners_still_count_in_denominator() {
    // One right angle, then a repeated point whose corner is skipped.
    let user = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (10.0, 10.0)]);
    assert!(approx_eq(smoothness_score(&user), 75.0));
}

#[test]
fn smoothness_of_straight_stroke_is_100() {
    assert!(approx_eq(smoothness_score(&horizontal_line(30, 5.0)), 100.0));
}

// =============================================================================
// shape matching
// =============================================================================

#[test]
fn shape_matching_identical_boxes_score_100() {
    let a = pts(&[(0.0, 0.0), (100.0, 50.0)]);
    assert!(approx_eq(shape_matching_score(&a, &a, 1.0), 100.0));
}

#[test]
fn shape_matching_penalizes_aspect_difference() {
    let ideal = pts(&[(0.0, 0.0), (100.0, 100.0)]);
    // Same centre, aspect 2.0 vs 1.0 -> aspect score 50.
    let user = pts(&[(-50.0, 0.0), (150.0, 100.0)]);
    assert!(approx_eq(shape_matching_score(&user, &ideal, 1.0), 75.0));
}

#[test]
fn shape_matching_penalizes_center_offset() {
    let ideal = pts(&[(0.0, 0.0), (100.0, 100.0)]);
    let user = pts(&[(25.0, 0.0), (125.0, 100.0)]);
    // Aspect equal, centre 25px away -> centre score 50.
    assert!(approx_eq(shape_matching_score(&user, &ideal, 1.0), 75.0));
}

#[test]
fn shape_matching_of_empty_set_is_zero() {
    let a = pts(&[(0.0, 0.0), (1.0, 1.0)]);
    assert_eq!(shape_matching_score(&[], &a, 1.0), 0.0);
    assert_eq!(shape_matching_score(&a, &[], 1.0), 0.0);
}
