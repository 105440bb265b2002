//! Signup, login and logout backed by the session cookie.
//!
//! There are no passwords: knowing a hospital's email is enough to log in.

use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use validator::Validate;

use super::ok;
use crate::api::middleware::CurrentHospital;
use crate::core::session::SessionCodec;
use crate::error::{AppError, AppResult};
use crate::models::{Hospital, NewHospital};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
}

fn with_session(state: &AppState, hospital: Hospital, status: StatusCode) -> AppResult<HttpResponse> {
    let (token, session) = state.sessions.issue(hospital.id, Utc::now())?;
    Ok(HttpResponse::build(status)
        .cookie(SessionCodec::cookie(token, &session))
        .json(json!({ "success": true, "data": hospital })))
}

/// POST /api/auth/signup
pub async fn signup(state: web::Data<AppState>, body: web::Json<NewHospital>) -> AppResult<HttpResponse> {
    let hospital = state.db.create_hospital(body.into_inner()).await?;
    info!(hospital_id = %hospital.id, "hospital signed up");
    with_session(&state, hospital, StatusCode::CREATED)
}

/// POST /api/auth/login
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> AppResult<HttpResponse> {
    body.validate().map_err(|e| AppError::from_validation(&e))?;
    let email = body.email.as_deref().unwrap_or_default();

    let hospital = state
        .db
        .find_hospital_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("Hospital not found".into()))?;
    info!(hospital_id = %hospital.id, "hospital logged in");
    with_session(&state, hospital, StatusCode::OK)
}

/// POST /api/auth/logout
pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(SessionCodec::removal_cookie())
        .json(json!({ "success": true, "message": "Logged out" }))
}

/// GET /api/auth/session
pub async fn session(current: CurrentHospital) -> AppResult<HttpResponse> {
    Ok(ok(current.0))
}
