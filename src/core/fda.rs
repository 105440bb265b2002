//! openFDA drug label lookups.

use actix_web::http::StatusCode;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use url::Url;

use crate::error::{AppError, AppResult};

/// The subset of a label record the drug page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrugInfo {
    pub boxed_warning: Value,
    pub indications_and_usage: Value,
    pub adverse_reactions: Value,
    pub generic_name: String,
    pub brand_name: Option<String>,
    pub manufacturer: String,
}

impl DrugInfo {
    /// Picks the displayed fields out of one openFDA `results[]` entry.
    pub fn from_label(label: &Value, requested_name: &str) -> Self {
        let field = |name: &str| label.get(name).cloned().unwrap_or(Value::Null);
        let openfda = |name: &str| {
            label
                .pointer(&format!("/openfda/{}/0", name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            boxed_warning: field("boxed_warning"),
            indications_and_usage: field("indications_and_usage"),
            adverse_reactions: field("adverse_reactions"),
            generic_name: openfda("generic_name").unwrap_or_else(|| requested_name.to_string()),
            brand_name: openfda("brand_name"),
            manufacturer: openfda("manufacturer_name").unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

pub struct FdaClient {
    http: Client,
    base_url: String,
}

impl FdaClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// First label mentioning `name` among its drug interactions.
    #[instrument(skip(self))]
    pub async fn drug_info(&self, name: &str) -> AppResult<DrugInfo> {
        let search = format!("drug_interactions:{}", name);
        let body = self.label_search(&[("search", search.as_str()), ("limit", "1")]).await?;

        let label = body
            .get("results")
            .and_then(Value::as_array)
            .and_then(|results| results.first())
            .ok_or_else(|| AppError::NotFound("No data found for this drug".into()))?;

        info!(drug = name, "drug label found");
        Ok(DrugInfo::from_label(label, name))
    }

    /// Raw label search by brand name.
    #[instrument(skip(self))]
    pub async fn brand_report(&self, drug: &str) -> AppResult<Value> {
        let search = format!("openfda.brand_name:\"{}\"", drug);
        self.label_search(&[("search", search.as_str())]).await
    }

    async fn label_search(&self, params: &[(&str, &str)]) -> AppResult<Value> {
        let endpoint = format!("{}/drug/label.json", self.base_url);
        let url = Url::parse_with_params(&endpoint, params)
            .map_err(|e| AppError::Internal(format!("invalid FDA url: {}", e)))?;

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            let status = StatusCode::from_u16(response.status().as_u16())
                .unwrap_or(StatusCode::BAD_GATEWAY);
            warn!(status = status.as_u16(), "FDA API request failed");
            return Err(AppError::Upstream {
                status,
                message: "Failed to fetch data from FDA API".into(),
            });
        }

        Ok(response.json::<Value>().await?)
    }
}
