use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::core::intake;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub drug_usage: String,
    /// Owning hospital.
    #[sqlx(rename = "hospital_id")]
    pub hospital: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Name and age only, as listed under each hospital.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
}

/// Intake form submitted when a patient is admitted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    #[serde(alias = "fullName")]
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, range(min = 0))]
    pub age: Option<i32>,
    /// Absent and `null` lists both count as empty.
    pub medications: Option<Vec<String>>,
    pub symptoms: Option<Vec<String>>,
    pub conditions: Option<Vec<String>>,
}

impl NewPatient {
    /// The `drugUsage` text assembled from the intake lists.
    pub fn drug_usage(&self) -> String {
        fn list(items: &Option<Vec<String>>) -> &[String] {
            items.as_deref().unwrap_or_default()
        }
        intake::drug_usage(list(&self.medications), list(&self.symptoms), list(&self.conditions))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(range(min = 0))]
    pub age: Option<i32>,
    pub drug_usage: Option<String>,
    /// Joined with spaces into `drug_usage`; wins over a plain `drugUsage`.
    pub drug_usage_array: Option<DrugUsageInput>,
}

impl PatientUpdate {
    /// The free-text value to store, if the update touches it at all.
    pub fn resolved_drug_usage(&self) -> Option<String> {
        match &self.drug_usage_array {
            Some(DrugUsageInput::Many(parts)) => Some(parts.join(" ")),
            Some(DrugUsageInput::One(text)) => Some(text.clone()),
            None => self.drug_usage.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DrugUsageInput {
    Many(Vec<String>),
    One(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub total_patients: i64,
    /// Patients admitted in the last thirty days.
    pub active_admissions: i64,
    /// Checkups dated since midnight UTC.
    pub checkups_today: i64,
    pub recent_activity: Vec<RecentActivity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub patient_id: Uuid,
    pub patient_name: String,
    pub action: String,
    pub date: DateTime<Utc>,
}
