#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// --- Point ---

#[test]
fn distance_is_euclidean() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(3.0, 4.0);
    assert!(approx_eq(a.distance(b), 5.0));
    assert!(approx_eq(b.distance(a), 5.0));
}

#[test]
fn distance_to_self_is_zero() {
    let p = Point::new(12.5, -7.0);
    assert_eq!(p.distance(p), 0.0);
}

#[test]
fn point_is_finite_rejects_nan_and_infinity() {
    assert!(Point::new(1.0, 2.0).is_finite());
    assert!(!Point::new(f64::NAN, 2.0).is_finite());
    assert!(!Point::new(1.0, f64::INFINITY).is_finite());
}

#[test]
fn point_deserializes_from_xy_object() {
    let p: Point = serde_json::from_str(r#"{"x":1.5,"y":-2}"#).unwrap();
    assert_eq!(p, Point::new(1.5, -2.0));
}

// --- nearest_distance ---

#[test]
fn nearest_distance_picks_minimum() {
    let candidates = [Point::new(10.0, 0.0), Point::new(2.0, 0.0), Point::new(-5.0, 0.0)];
    assert!(approx_eq(nearest_distance(Point::new(0.0, 0.0), &candidates), 2.0));
}

#[test]
fn nearest_distance_of_empty_is_infinite() {
    assert!(nearest_distance(Point::new(0.0, 0.0), &[]).is_infinite());
}

// --- BoundingBox ---

#[test]
fn bounding_box_of_empty_is_none() {
    assert!(BoundingBox::of(&[]).is_none());
}

#[test]
fn bounding_box_spans_all_points() {
    let pts = [Point::new(5.0, 1.0), Point::new(-2.0, 8.0), Point::new(3.0, -4.0)];
    let b = BoundingBox::of(&pts).unwrap();
    assert_eq!(b, BoundingBox { min_x: -2.0, min_y: -4.0, max_x: 5.0, max_y: 8.0 });
    assert!(approx_eq(b.width(), 7.0));
    assert!(approx_eq(b.height(), 12.0));
    assert_eq!(b.center(), Point::new(1.5, 2.0));
}

#[test]
fn aspect_ratio_of_flat_box_divides_by_one() {
    let pts = [Point::new(0.0, 100.0), Point::new(600.0, 100.0)];
    let b = BoundingBox::of(&pts).unwrap();
    assert!(approx_eq(b.aspect_ratio(), 600.0));
}

#[test]
fn aspect_ratio_of_square_is_one() {
    let pts = [Point::new(0.0, 0.0), Point::new(40.0, 40.0)];
    assert!(approx_eq(BoundingBox::of(&pts).unwrap().aspect_ratio(), 1.0));
}

#[test]
fn single_point_box_is_degenerate() {
    let b = BoundingBox::of(&[Point::new(4.0, 4.0)]).unwrap();
    assert_eq!(b.width(), 0.0);
    assert_eq!(b.aspect_ratio(), 0.0);
    assert_eq!(b.center(), Point::new(4.0, 4.0));
}
