//! Route table.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, HttpRequest,
};

use super::handlers::{auth, detection, drugs, health, hospitals, patients, social};
use crate::error::AppError;

/// Malformed JSON bodies, query strings and paths get the same
/// `{success, error}` shape as every other rejection.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid request body: {}", err)).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid query string: {}", err)).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid path: {}", err)).into()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/health", web::get().to(health::health))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/hospitals")
                        .route(web::get().to(hospitals::list))
                        .route(web::post().to(hospitals::create)),
                )
                .service(
                    web::resource("/hospitals/{id}")
                        .route(web::get().to(hospitals::get))
                        .route(web::put().to(hospitals::update))
                        .route(web::delete().to(hospitals::delete)),
                )
                .service(
                    web::resource("/hospitals/{id}/patients")
                        .route(web::get().to(patients::list))
                        .route(web::post().to(patients::create)),
                )
                .service(
                    web::resource("/hospitals/{id}/patients/{patient_id}")
                        .route(web::get().to(patients::get))
                        .route(web::put().to(patients::update))
                        .route(web::delete().to(patients::delete)),
                )
                .service(
                    web::resource("/hospitals/{id}/patients/{patient_id}/checkups")
                        .route(web::get().to(patients::checkups))
                        .route(web::post().to(patients::add_checkup)),
                )
                .route("/stats", web::get().to(patients::stats))
                .route("/auth/signup", web::post().to(auth::signup))
                .route("/auth/login", web::post().to(auth::login))
                .route("/auth/logout", web::post().to(auth::logout))
                .route("/auth/session", web::get().to(auth::session))
                .route("/drug/{name}", web::get().to(drugs::lookup))
                .route("/fda-report", web::get().to(drugs::report))
                .route("/reddit", web::get().to(social::reddit))
                .route("/patient-data", web::post().to(detection::forward)),
        );
}
