use chrono::{Duration, TimeZone, Utc};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::Database;
use crate::error::{AppError, AppResult};
use crate::models::{
    Checkup, NewCheckup, NewPatient, Patient, PatientStats, PatientUpdate, RecentActivity,
};

const PATIENT_COLUMNS: &str = "id, name, age, drug_usage, hospital_id, created_at, updated_at";
const CHECKUP_COLUMNS: &str =
    "id, patient_id, date, notes, temperature, blood_pressure, heart_rate, oxygen_saturation, created_at";

/// How far back `active_admissions` looks.
const RECENT_ADMISSION_DAYS: i64 = 30;
const RECENT_ACTIVITY_LIMIT: i64 = 5;

fn patient_not_found() -> AppError {
    AppError::NotFound("Patient not found in this hospital".into())
}

/// Escapes LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl Database {
    // ===== Patient Management =====

    /// Patients of one hospital, newest first, optionally filtered by a
    /// case-insensitive name fragment.
    #[instrument(skip(self))]
    pub async fn list_patients(&self, hospital_id: Uuid, query: Option<&str>) -> AppResult<Vec<Patient>> {
        self.ensure_hospital(hospital_id).await?;

        let term = query.map(str::trim).filter(|q| !q.is_empty());
        let patients = match term {
            Some(term) => {
                sqlx::query_as::<_, Patient>(&format!(
                    "SELECT {} FROM patients
                     WHERE hospital_id = ? AND name LIKE ? ESCAPE '\\'
                     ORDER BY rowid DESC",
                    PATIENT_COLUMNS
                ))
                .bind(hospital_id)
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Patient>(&format!(
                    "SELECT {} FROM patients WHERE hospital_id = ? ORDER BY rowid DESC",
                    PATIENT_COLUMNS
                ))
                .bind(hospital_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(patients)
    }

    #[instrument(skip(self))]
    pub async fn get_patient(&self, hospital_id: Uuid, patient_id: Uuid) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM patients WHERE id = ? AND hospital_id = ?",
            PATIENT_COLUMNS
        ))
        .bind(patient_id)
        .bind(hospital_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(patient_not_found)
    }

    /// Admits a patient: inserts the record and appends it to the hospital's
    /// patient list in one transaction.
    #[instrument(skip(self, input))]
    pub async fn create_patient(&self, hospital_id: Uuid, input: NewPatient) -> AppResult<Patient> {
        self.ensure_hospital(hospital_id).await?;
        input.validate().map_err(|e| AppError::from_validation(&e))?;
        let (Some(name), Some(age)) = (input.name.as_ref(), input.age) else {
            return Err(AppError::BadRequest("Missing required fields".into()));
        };

        let drug_usage = input.drug_usage();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "INSERT INTO patients (id, name, age, drug_usage, hospital_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {}",
            PATIENT_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(age)
        .bind(&drug_usage)
        .bind(hospital_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO hospital_patients (hospital_id, patient_id) VALUES (?, ?)")
            .bind(hospital_id)
            .bind(patient.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        info!(patient_id = %patient.id, "patient admitted");
        Ok(patient)
    }

    #[instrument(skip(self, update))]
    pub async fn update_patient(
        &self,
        hospital_id: Uuid,
        patient_id: Uuid,
        update: PatientUpdate,
    ) -> AppResult<Patient> {
        update.validate().map_err(|e| AppError::from_validation(&e))?;
        let drug_usage = update.resolved_drug_usage();

        let patient = sqlx::query_as::<_, Patient>(&format!(
            "UPDATE patients
             SET name = COALESCE(?, name),
                 age = COALESCE(?, age),
                 drug_usage = COALESCE(?, drug_usage),
                 updated_at = ?
             WHERE id = ? AND hospital_id = ?
             RETURNING {}",
            PATIENT_COLUMNS
        ))
        .bind(update.name)
        .bind(update.age)
        .bind(drug_usage)
        .bind(Utc::now())
        .bind(patient_id)
        .bind(hospital_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(patient_not_found)?;

        info!("patient updated");
        Ok(patient)
    }

    /// Removes the patient and pulls it from the hospital's list in one
    /// transaction.
    #[instrument(skip(self))]
    pub async fn delete_patient(&self, hospital_id: Uuid, patient_id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM patient_checkups
             WHERE patient_id IN (SELECT id FROM patients WHERE id = ? AND hospital_id = ?)",
        )
        .bind(patient_id)
        .bind(hospital_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM hospital_patients WHERE hospital_id = ? AND patient_id = ?")
            .bind(hospital_id)
            .bind(patient_id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM patients WHERE id = ? AND hospital_id = ?")
            .bind(patient_id)
            .bind(hospital_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(patient_not_found());
        }

        tx.commit().await?;
        info!("patient deleted");
        Ok(())
    }

    /// Counts and latest admissions for the dashboard.
    #[instrument(skip(self))]
    pub async fn patient_stats(&self, hospital_id: Uuid) -> AppResult<PatientStats> {
        let total_patients =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM patients WHERE hospital_id = ?")
                .bind(hospital_id)
                .fetch_one(&self.pool)
                .await?;

        let now = Utc::now();
        let active_admissions = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM patients WHERE hospital_id = ? AND created_at >= ?",
        )
        .bind(hospital_id)
        .bind(now - Duration::days(RECENT_ADMISSION_DAYS))
        .fetch_one(&self.pool)
        .await?;

        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive))
            .unwrap_or(now);
        let checkups_today = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)
             FROM patient_checkups c
             JOIN patients p ON p.id = c.patient_id
             WHERE p.hospital_id = ? AND c.date >= ?",
        )
        .bind(hospital_id)
        .bind(midnight)
        .fetch_one(&self.pool)
        .await?;

        let recent_activity = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM patients WHERE hospital_id = ? ORDER BY rowid DESC LIMIT ?",
            PATIENT_COLUMNS
        ))
        .bind(hospital_id)
        .bind(RECENT_ACTIVITY_LIMIT)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|p| RecentActivity {
            patient_id: p.id,
            patient_name: p.name,
            action: "was admitted".into(),
            date: p.created_at,
        })
        .collect();

        Ok(PatientStats {
            total_patients,
            active_admissions,
            checkups_today,
            recent_activity,
        })
    }

    /// Records a checkup for a patient of `hospital_id`.
    #[instrument(skip(self, input))]
    pub async fn add_checkup(
        &self,
        hospital_id: Uuid,
        patient_id: Uuid,
        input: NewCheckup,
    ) -> AppResult<Checkup> {
        input.validate().map_err(|e| AppError::from_validation(&e))?;
        self.get_patient(hospital_id, patient_id).await?;

        let now = Utc::now();
        let vitals = input.vitals.unwrap_or_default();
        let checkup = sqlx::query_as::<_, Checkup>(&format!(
            "INSERT INTO patient_checkups ({cols})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {cols}",
            cols = CHECKUP_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(patient_id)
        .bind(input.date.unwrap_or(now))
        .bind(input.notes.unwrap_or_default())
        .bind(vitals.temperature)
        .bind(vitals.blood_pressure)
        .bind(vitals.heart_rate)
        .bind(vitals.oxygen_saturation)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        info!(checkup_id = %checkup.id, "checkup recorded");
        Ok(checkup)
    }

    /// Checkup history of one patient, most recent first.
    #[instrument(skip(self))]
    pub async fn list_checkups(&self, hospital_id: Uuid, patient_id: Uuid) -> AppResult<Vec<Checkup>> {
        self.get_patient(hospital_id, patient_id).await?;

        let checkups = sqlx::query_as::<_, Checkup>(&format!(
            "SELECT {} FROM patient_checkups WHERE patient_id = ? ORDER BY date DESC, rowid DESC",
            CHECKUP_COLUMNS
        ))
        .bind(patient_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(checkups)
    }

    async fn ensure_hospital(&self, hospital_id: Uuid) -> AppResult<()> {
        match self.fetch_hospital(hospital_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("Hospital not found".into())),
        }
    }
}
