use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::{created, message, ok};
use crate::api::middleware::{parse_id, CurrentHospital};
use crate::error::AppResult;
use crate::models::{NewCheckup, NewPatient, PatientUpdate};
use crate::AppState;

const INVALID_HOSPITAL: &str = "Invalid hospital ID";
const INVALID_PAIR: &str = "Invalid hospital or patient ID";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn ids(path: &(String, String)) -> AppResult<(Uuid, Uuid)> {
    Ok((parse_id(&path.0, INVALID_PAIR)?, parse_id(&path.1, INVALID_PAIR)?))
}

/// GET /api/hospitals/{id}/patients
pub async fn list(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let hospital_id = parse_id(&path, INVALID_HOSPITAL)?;
    let patients = state.db.list_patients(hospital_id, query.q.as_deref()).await?;
    Ok(ok(patients))
}

/// POST /api/hospitals/{id}/patients
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<NewPatient>,
) -> AppResult<HttpResponse> {
    let hospital_id = parse_id(&path, INVALID_HOSPITAL)?;
    let patient = state.db.create_patient(hospital_id, body.into_inner()).await?;
    Ok(created(patient))
}

/// GET /api/hospitals/{id}/patients/{patient_id}
pub async fn get(state: web::Data<AppState>, path: web::Path<(String, String)>) -> AppResult<HttpResponse> {
    let (hospital_id, patient_id) = ids(&path)?;
    let patient = state.db.get_patient(hospital_id, patient_id).await?;
    Ok(ok(patient))
}

/// PUT /api/hospitals/{id}/patients/{patient_id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<PatientUpdate>,
) -> AppResult<HttpResponse> {
    let (hospital_id, patient_id) = ids(&path)?;
    let patient = state
        .db
        .update_patient(hospital_id, patient_id, body.into_inner())
        .await?;
    Ok(ok(patient))
}

/// DELETE /api/hospitals/{id}/patients/{patient_id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<(String, String)>) -> AppResult<HttpResponse> {
    let (hospital_id, patient_id) = ids(&path)?;
    state.db.delete_patient(hospital_id, patient_id).await?;
    Ok(message("Patient deleted successfully"))
}

/// GET /api/hospitals/{id}/patients/{patient_id}/checkups
pub async fn checkups(state: web::Data<AppState>, path: web::Path<(String, String)>) -> AppResult<HttpResponse> {
    let (hospital_id, patient_id) = ids(&path)?;
    let checkups = state.db.list_checkups(hospital_id, patient_id).await?;
    Ok(ok(checkups))
}

/// POST /api/hospitals/{id}/patients/{patient_id}/checkups
pub async fn add_checkup(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<NewCheckup>,
) -> AppResult<HttpResponse> {
    let (hospital_id, patient_id) = ids(&path)?;
    let checkup = state
        .db
        .add_checkup(hospital_id, patient_id, body.into_inner())
        .await?;
    Ok(created(checkup))
}

/// GET /api/stats
pub async fn stats(state: web::Data<AppState>, current: CurrentHospital) -> AppResult<HttpResponse> {
    let stats = state.db.patient_stats(current.0.id).await?;
    Ok(ok(stats))
}
