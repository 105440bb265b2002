//! Request extractors shared by the handlers.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use chrono::Utc;
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::core::session::SESSION_COOKIE;
use crate::error::AppError;
use crate::models::Hospital;
use crate::AppState;

/// The hospital named by a valid session cookie.
///
/// Rejects with 401 when the cookie is absent, forged, expired, or points at
/// a hospital that no longer exists.
pub struct CurrentHospital(pub Hospital);

impl FromRequest for CurrentHospital {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let state = state.ok_or_else(|| AppError::Internal("application state missing".into()))?;
            let token = token.ok_or(AppError::Unauthorized)?;
            let session = state
                .sessions
                .decode(&token, Utc::now())
                .ok_or(AppError::Unauthorized)?;

            match state.db.find_hospital(session.hospital_id).await? {
                Some(hospital) => Ok(CurrentHospital(hospital)),
                None => Err(AppError::Unauthorized),
            }
        })
    }
}

/// Parses a path segment as a record id, rejecting with `message`.
pub fn parse_id(raw: &str, message: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(message.into()))
}
