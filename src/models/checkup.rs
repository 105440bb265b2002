use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// One visit recorded against a patient.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Checkup {
    pub id: Uuid,
    #[sqlx(rename = "patient_id")]
    pub patient: Uuid,
    pub date: DateTime<Utc>,
    pub notes: String,
    #[sqlx(flatten)]
    pub vitals: Vitals,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    /// Free text such as "120/80".
    pub blood_pressure: Option<String>,
    #[validate(range(min = 0))]
    pub heart_rate: Option<i32>,
    #[validate(range(min = 0, max = 100))]
    pub oxygen_saturation: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCheckup {
    /// Defaults to the time of the request.
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[validate]
    pub vitals: Option<Vitals>,
}
