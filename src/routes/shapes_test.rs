use axum::response::IntoResponse;
use serde_json::{Value, json};

use super::*;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(body: Value) -> ScoreShapeRequest {
    serde_json::from_value(body).unwrap()
}

// =========================================================================
// Canvas params
// =========================================================================

#[test]
fn missing_canvas_sides_use_defaults() {
    let canvas = CanvasParams::default().resolve().unwrap();
    assert_eq!(canvas, CanvasSize::default());

    let canvas = CanvasParams { width: Some(300.0), height: None }.resolve().unwrap();
    assert_eq!(canvas, CanvasSize::new(300.0, 400.0).unwrap());
}

#[test]
fn non_positive_canvas_is_rejected() {
    let err = CanvasParams { width: Some(0.0), height: None }.resolve().unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(CanvasParams { width: None, height: Some(-4.0) }.resolve().is_err());
}

// =========================================================================
// GET /api/shapes
// =========================================================================

#[tokio::test]
async fn list_shapes_returns_catalog_in_order() {
    let response = list_shapes(Query(CanvasParams::default())).await.into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let kinds: Vec<&str> = body["shapes"].as_array().unwrap().iter().map(|s| s["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, ["straight_line", "z_shape", "semi_circle", "circle"]);
    assert_eq!(body["canvas"], json!({ "width": 600.0, "height": 400.0 }));

    let line = &body["shapes"][0];
    assert_eq!(line["name"], "Straight Line");
    assert_eq!(line["outline"][0], json!({ "op": "move_to", "x": 120.0, "y": 200.0 }));
    assert_eq!(line["ideal_points"].as_array().unwrap().len(), 73);
    assert_eq!(body["shapes"][3]["leniency"], 1.3);
}

#[tokio::test]
async fn list_shapes_follows_canvas_size() {
    let params = CanvasParams { width: Some(300.0), height: Some(200.0) };
    let body = body_json(list_shapes(Query(params)).await.into_response()).await;
    assert_eq!(body["shapes"][0]["ideal_points"][0], json!({ "x": 60.0, "y": 100.0 }));
}

#[tokio::test]
async fn list_shapes_rejects_invalid_canvas() {
    let params = CanvasParams { width: Some(f64::NAN), height: None };
    let response = list_shapes(Query(params)).await.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await, json!({ "error": INVALID_CANVAS_MESSAGE }));
}

#[tokio::test]
async fn list_shapes_rejects_oversized_canvas() {
    let params = CanvasParams { width: Some(1e20), height: None };
    let response = list_shapes(Query(params)).await.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// =========================================================================
// POST /api/shapes/{kind}/score
// =========================================================================

#[tokio::test]
async fn exact_trace_scores_full_marks() {
    let ideal = shapes::template(ShapeKind::StraightLine).ideal_points(CanvasSize::default());
    let body = ScoreShapeRequest { canvas: CanvasParams::default(), points: ideal };

    let Json(score) = score_shape(Path(ShapeKind::StraightLine), Json(body)).await.unwrap();
    assert_eq!(score.total, 100);
}

#[tokio::test]
async fn request_body_accepts_inline_canvas_fields() {
    let body = request(json!({
        "width": 300,
        "height": 200,
        "points": [{ "x": 60, "y": 100 }, { "x": 240, "y": 100 }]
    }));
    assert_eq!(body.canvas.resolve().unwrap(), CanvasSize::new(300.0, 200.0).unwrap());

    let Json(score) = score_shape(Path(ShapeKind::StraightLine), Json(body)).await.unwrap();
    assert!(score.total > 0);
}

#[tokio::test]
async fn single_point_stroke_is_unprocessable() {
    let body = request(json!({ "points": [{ "x": 1, "y": 1 }] }));
    let response = score_shape(Path(ShapeKind::Circle), Json(body)).await.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("at least 2"));
}

#[tokio::test]
async fn score_shape_rejects_oversized_canvas() {
    let body = request(json!({
        "width": 1e20,
        "points": [{ "x": 1, "y": 1 }, { "x": 2, "y": 2 }]
    }));
    let err = score_shape(Path(ShapeKind::StraightLine), Json(body)).await.unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn kind_path_segment_uses_snake_case() {
    let kind: ShapeKind = serde_json::from_value(json!("semi_circle")).unwrap();
    assert_eq!(kind, ShapeKind::SemiCircle);
    assert!(serde_json::from_value::<ShapeKind>(json!("triangle")).is_err());
}
