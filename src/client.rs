// HTTP client for the district performance API.
use crate::config::AppConfig;
use crate::types::{ComparativeResult, District, DomainError, PerformanceRecord, PerformanceResponse};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How much of an unreadable body is kept for display.
const RAW_PREVIEW: usize = 200;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{url} answered {status}")]
    Status { status: StatusCode, url: String },
    #[error("response is not valid JSON: {raw}")]
    MalformedJson { raw: String },
    #[error("{}", .0.error)]
    Domain(DomainError),
    #[error("API base URL {0:?} is not an absolute http(s) URL")]
    InvalidBase(String),
}

/// A performance fetch that succeeded. Zero records is a valid answer, not
/// a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum PerformanceOutcome {
    Records { records: Vec<PerformanceRecord>, source: Option<String> },
    Empty { source: Option<String> },
}

impl From<PerformanceResponse> for PerformanceOutcome {
    fn from(resp: PerformanceResponse) -> Self {
        if resp.records.is_empty() {
            PerformanceOutcome::Empty { source: resp.source }
        } else {
            PerformanceOutcome::Records { records: resp.records, source: resp.source }
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
}

fn truncate(raw: &str) -> String {
    raw.chars().take(RAW_PREVIEW).collect()
}

impl ApiClient {
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ApiError> {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ApiError::InvalidBase(base.to_string()));
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base: base.trim_end_matches('/').to_string() })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, ApiError> {
        Self::new(&cfg.api_base, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// GET `path` with `query`, returning the body text of a success status.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base, path);
        info!(%url, ?query, "fetching");
        let resp = self.http.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(%url, %status, "non-success status");
            return Err(ApiError::Status { status, url });
        }
        Ok(resp.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
        let text = self.get_text(path, query).await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!(error = %e, "unreadable payload");
            ApiError::MalformedJson { raw: truncate(&text) }
        })
    }

    pub async fn districts(&self) -> Result<Vec<District>, ApiError> {
        let districts: Vec<District> = self.get_json("/api/districts", &[]).await?;
        debug!(count = districts.len(), "districts received");
        Ok(districts)
    }

    pub async fn performance(&self, state: &str, district: &str, limit: u32) -> Result<PerformanceOutcome, ApiError> {
        let limit = limit.to_string();
        let resp: PerformanceResponse = self
            .get_json("/api/performance", &[("state", state), ("district", district), ("limit", limit.as_str())])
            .await?;
        match resp.records.first() {
            Some(first) => debug!(keys = ?first.keys().collect::<Vec<_>>(), "first record shape"),
            None => warn!(district, source = ?resp.source, "no records in response"),
        }
        Ok(resp.into())
    }

    pub async fn state_average(&self, state: &str, district: &str) -> Result<ComparativeResult, ApiError> {
        let result: ComparativeResult = self
            .get_json("/api/comparatives/state-average", &[("state", state), ("district", district)])
            .await?;
        into_comparison(result)
    }

    pub async fn district_comparison(
        &self,
        state: &str,
        district1: &str,
        district2: &str,
    ) -> Result<ComparativeResult, ApiError> {
        let result: ComparativeResult = self
            .get_json(
                "/api/comparatives/district-comparison",
                &[("state", state), ("district1", district1), ("district2", district2)],
            )
            .await?;
        into_comparison(result)
    }
}

fn into_comparison(result: ComparativeResult) -> Result<ComparativeResult, ApiError> {
    match result {
        ComparativeResult::Failure(e) => Err(ApiError::Domain(e)),
        other => Ok(other),
    }
}
