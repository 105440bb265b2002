//! HTTP handlers, one module per resource.

pub mod auth;
pub mod detection;
pub mod drugs;
pub mod health;
pub mod hospitals;
pub mod patients;
pub mod social;

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

/// `{"success": true, "data": ...}` with status 200.
pub(crate) fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "data": data }))
}

/// `{"success": true, "data": ...}` with status 201.
pub(crate) fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(json!({ "success": true, "data": data }))
}

pub(crate) fn message(text: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "message": text }))
}
