//! Forwarding of patient intake to the adverse-event detection service.

use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::intake::DetectionIntake;
use crate::error::{AppError, AppResult};

pub const SOURCE: &str = "adr-desk";

pub struct DetectionClient {
    http: Client,
    url: String,
}

impl DetectionClient {
    pub fn new(http: Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }

    /// Sends the flattened intake and returns the service's verdict as-is.
    #[instrument(skip_all)]
    pub async fn detect(&self, intake: &DetectionIntake) -> AppResult<Value> {
        let text = intake.clinical_text();
        let payload = json!({
            "patient_data": text,
            "text": text,
            "timestamp": Utc::now().to_rfc3339(),
            "source": SOURCE,
        });

        let response = self.http.post(&self.url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Internal(format!(
                "Failed to send data. Server responded with {}",
                response.status().as_u16()
            )));
        }

        let result = response.json::<Value>().await?;
        info!("adverse event detection completed");
        Ok(result)
    }
}
