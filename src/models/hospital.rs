use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::patient::{Patient, PatientSummary};

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub email: String,
    /// Owned patients in admission order.
    #[sqlx(skip)]
    pub patients: Vec<PatientRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry of `Hospital::patients`, rendered at the detail level the
/// endpoint asks for.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PatientRef {
    Id(Uuid),
    Summary(PatientSummary),
    Full(Patient),
}

#[cfg(test)]
impl PatientRef {
    pub(crate) fn id(&self) -> Uuid {
        match self {
            PatientRef::Id(id) => *id,
            PatientRef::Summary(summary) => summary.id,
            PatientRef::Full(patient) => patient.id,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHospital {
    #[serde(alias = "hospitalName")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, length(min = 1))]
    pub address: Option<String>,
    #[validate(required, length(min = 1))]
    pub email: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HospitalUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub email: Option<String>,
}
