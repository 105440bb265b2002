use std::collections::HashMap;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Hospital, HospitalUpdate, NewHospital, Patient, PatientRef, PatientSummary};

pub(crate) const DUPLICATE_EMAIL: &str = "A hospital with this email already exists";

const HOSPITAL_COLUMNS: &str = "id, name, address, email, created_at, updated_at";

fn hospital_not_found() -> AppError {
    AppError::NotFound("Hospital not found".into())
}

/// Maps a unique-key violation on `email` to the duplicate message.
fn map_write_error(err: sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(DUPLICATE_EMAIL.into()),
        _ => AppError::Database(err),
    }
}

impl Database {
    // ===== Hospital Management =====

    /// All hospitals. With `populate`, each patient entry carries name and
    /// age; otherwise only the id.
    #[instrument(skip(self))]
    pub async fn list_hospitals(&self, populate: bool) -> AppResult<Vec<Hospital>> {
        let mut hospitals = sqlx::query_as::<_, Hospital>(&format!(
            "SELECT {} FROM hospitals ORDER BY rowid",
            HOSPITAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        let links = sqlx::query_as::<_, (Uuid, Uuid, String, i32)>(
            "SELECT hp.hospital_id, p.id, p.name, p.age
             FROM hospital_patients hp
             JOIN patients p ON p.id = hp.patient_id
             ORDER BY hp.position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_hospital: HashMap<Uuid, Vec<PatientRef>> = HashMap::new();
        for (hospital_id, id, name, age) in links {
            let entry = if populate {
                PatientRef::Summary(PatientSummary { id, name, age })
            } else {
                PatientRef::Id(id)
            };
            by_hospital.entry(hospital_id).or_default().push(entry);
        }

        for hospital in &mut hospitals {
            hospital.patients = by_hospital.remove(&hospital.id).unwrap_or_default();
        }
        Ok(hospitals)
    }

    /// One hospital with its full patient records.
    #[instrument(skip(self), fields(hospital_id = %id))]
    pub async fn get_hospital(&self, id: Uuid) -> AppResult<Hospital> {
        let mut hospital = self.fetch_hospital(id).await?.ok_or_else(hospital_not_found)?;

        hospital.patients = sqlx::query_as::<_, Patient>(
            "SELECT p.id, p.name, p.age, p.drug_usage, p.hospital_id, p.created_at, p.updated_at
             FROM hospital_patients hp
             JOIN patients p ON p.id = hp.patient_id
             WHERE hp.hospital_id = ?
             ORDER BY hp.position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PatientRef::Full)
        .collect();

        Ok(hospital)
    }

    #[instrument(skip(self))]
    pub async fn find_hospital_by_email(&self, email: &str) -> AppResult<Option<Hospital>> {
        let hospital = sqlx::query_as::<_, Hospital>(&format!(
            "SELECT {} FROM hospitals WHERE email = ?",
            HOSPITAL_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        match hospital {
            Some(mut hospital) => {
                hospital.patients = self.patient_refs(hospital.id).await?;
                Ok(Some(hospital))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_hospital(&self, input: NewHospital) -> AppResult<Hospital> {
        input.validate().map_err(|e| AppError::from_validation(&e))?;
        let (Some(name), Some(address), Some(email)) = (input.name, input.address, input.email)
        else {
            return Err(AppError::BadRequest("Missing required fields".into()));
        };

        let now = Utc::now();
        let hospital = sqlx::query_as::<_, Hospital>(&format!(
            "INSERT INTO hospitals (id, name, address, email, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {}",
            HOSPITAL_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&name)
        .bind(&address)
        .bind(&email)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        info!(hospital_id = %hospital.id, "hospital created");
        Ok(hospital)
    }

    /// Applies the supplied fields; the patient list comes back as ids.
    #[instrument(skip(self, update), fields(hospital_id = %id))]
    pub async fn update_hospital(&self, id: Uuid, update: HospitalUpdate) -> AppResult<Hospital> {
        update.validate().map_err(|e| AppError::from_validation(&e))?;

        let mut hospital = sqlx::query_as::<_, Hospital>(&format!(
            "UPDATE hospitals
             SET name = COALESCE(?, name),
                 address = COALESCE(?, address),
                 email = COALESCE(?, email),
                 updated_at = ?
             WHERE id = ?
             RETURNING {}",
            HOSPITAL_COLUMNS
        ))
        .bind(update.name)
        .bind(update.address)
        .bind(update.email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or_else(hospital_not_found)?;

        hospital.patients = self.patient_refs(id).await?;
        info!("hospital updated");
        Ok(hospital)
    }

    /// Deletes the hospital together with every patient it owns.
    ///
    /// Returns how many patients were removed.
    #[instrument(skip(self), fields(hospital_id = %id))]
    pub async fn delete_hospital(&self, id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM hospitals WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if exists == 0 {
            return Err(hospital_not_found());
        }

        sqlx::query(
            "DELETE FROM patient_checkups
             WHERE patient_id IN (SELECT id FROM patients WHERE hospital_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM hospital_patients WHERE hospital_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let patients = sqlx::query("DELETE FROM patients WHERE hospital_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM hospitals WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(patients_removed = patients, "hospital deleted");
        Ok(patients)
    }

    /// One hospital with patient ids only.
    #[instrument(skip(self), fields(hospital_id = %id))]
    pub async fn find_hospital(&self, id: Uuid) -> AppResult<Option<Hospital>> {
        match self.fetch_hospital(id).await? {
            Some(mut hospital) => {
                hospital.patients = self.patient_refs(id).await?;
                Ok(Some(hospital))
            }
            None => Ok(None),
        }
    }

    pub(crate) async fn fetch_hospital(&self, id: Uuid) -> AppResult<Option<Hospital>> {
        let hospital = sqlx::query_as::<_, Hospital>(&format!(
            "SELECT {} FROM hospitals WHERE id = ?",
            HOSPITAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(hospital)
    }

    /// Ordered patient ids of one hospital.
    pub(crate) async fn patient_refs(&self, hospital_id: Uuid) -> AppResult<Vec<PatientRef>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT patient_id FROM hospital_patients WHERE hospital_id = ? ORDER BY position",
        )
        .bind(hospital_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().map(PatientRef::Id).collect())
    }
}
