use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::{created, message, ok};
use crate::api::middleware::parse_id;
use crate::error::AppResult;
use crate::models::{HospitalUpdate, NewHospital};
use crate::AppState;

const INVALID_ID: &str = "Invalid hospital ID";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Render patients as `{id, name, age}` instead of bare ids. Defaults to true.
    pub populate: Option<bool>,
}

/// GET /api/hospitals
pub async fn list(state: web::Data<AppState>, query: web::Query<ListQuery>) -> AppResult<HttpResponse> {
    let hospitals = state.db.list_hospitals(query.populate.unwrap_or(true)).await?;
    Ok(ok(hospitals))
}

/// POST /api/hospitals
pub async fn create(state: web::Data<AppState>, body: web::Json<NewHospital>) -> AppResult<HttpResponse> {
    let hospital = state.db.create_hospital(body.into_inner()).await?;
    Ok(created(hospital))
}

/// GET /api/hospitals/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, INVALID_ID)?;
    let hospital = state.db.get_hospital(id).await?;
    Ok(ok(hospital))
}

/// PUT /api/hospitals/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<HospitalUpdate>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path, INVALID_ID)?;
    let hospital = state.db.update_hospital(id, body.into_inner()).await?;
    Ok(ok(hospital))
}

/// DELETE /api/hospitals/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let id = parse_id(&path, INVALID_ID)?;
    state.db.delete_hospital(id).await?;
    Ok(message("Hospital and associated patients deleted successfully"))
}
