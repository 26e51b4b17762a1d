//! Shape catalog and one-off scoring routes.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::geometry::Point;
use crate::scoring::{self, ScoreBreakdown};
use crate::shapes::{self, CanvasSize, PathCommand, ShapeKind};

pub const INVALID_CANVAS_MESSAGE: &str = "canvas width and height must be finite, positive and at most 10000";

/// Optional canvas dimensions; a missing side falls back to the default.
#[derive(Debug, Default, Deserialize)]
pub struct CanvasParams {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl CanvasParams {
    pub(super) fn resolve(&self) -> Result<CanvasSize, ApiError> {
        let default = CanvasSize::default();
        CanvasSize::new(self.width.unwrap_or(default.width), self.height.unwrap_or(default.height))
            .ok_or_else(|| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, INVALID_CANVAS_MESSAGE))
    }
}

#[derive(Debug, Serialize)]
pub struct ShapeResponse {
    pub kind: ShapeKind,
    pub name: &'static str,
    pub leniency: f64,
    pub outline: Vec<PathCommand>,
    pub ideal_points: Vec<Point>,
}

#[derive(Debug, Serialize)]
pub struct ShapesResponse {
    pub canvas: CanvasSize,
    pub shapes: Vec<ShapeResponse>,
}

/// `GET /api/shapes?width=&height=` — every template laid out on the canvas.
pub async fn list_shapes(Query(params): Query<CanvasParams>) -> Result<Json<ShapesResponse>, ApiError> {
    let canvas = params.resolve()?;
    let shapes = shapes::catalog()
        .iter()
        .map(|t| ShapeResponse {
            kind: t.kind,
            name: t.name,
            leniency: t.leniency,
            outline: t.outline(canvas),
            ideal_points: t.ideal_points(canvas),
        })
        .collect();
    Ok(Json(ShapesResponse { canvas, shapes }))
}

#[derive(Debug, Deserialize)]
pub struct ScoreShapeRequest {
    #[serde(flatten)]
    pub canvas: CanvasParams,
    pub points: Vec<Point>,
}

/// `POST /api/shapes/{kind}/score` — score a stroke against one template
/// without touching any session.
pub async fn score_shape(
    Path(kind): Path<ShapeKind>,
    Json(body): Json<ScoreShapeRequest>,
) -> Result<Json<ScoreBreakdown>, ApiError> {
    let canvas = body.canvas.resolve()?;
    let template = shapes::template(kind);
    let ideal = template.ideal_points(canvas);
    scoring::evaluate(&body.points, &ideal, template.leniency)
        .map(Json)
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))
}

#[cfg(test)]
#[path = "shapes_test.rs"]
mod tests;
