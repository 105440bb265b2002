use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub drug: Option<String>,
}

/// GET /api/drug/{name}
pub async fn lookup(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let info = state.fda.drug_info(&path).await?;
    Ok(HttpResponse::Ok().json(info))
}

/// GET /api/fda-report?drug=
pub async fn report(state: web::Data<AppState>, query: web::Query<ReportQuery>) -> AppResult<HttpResponse> {
    let drug = query
        .drug
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::BadRequest("Drug query parameter is required".into()))?;

    let report = state.fda.brand_report(drug).await?;
    Ok(HttpResponse::Ok().json(report))
}
