use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::core::intake::DetectionIntake;
use crate::error::AppResult;
use crate::AppState;

/// POST /api/patient-data
pub async fn forward(state: web::Data<AppState>, body: web::Json<DetectionIntake>) -> AppResult<HttpResponse> {
    let result = state.detection.detect(&body).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Data sent successfully",
        "result": result,
    })))
}
