//! Backend HTTP client.
//!
//! Wraps the three pipeline endpoints:
//! - `GET /materials/` — list materials
//! - `GET /materials/{id}/concepts/` — list a material's concepts
//! - `POST /upload-material/` — multipart upload of new study material
//!
//! The two read paths never fail: on transport failure they resolve to the
//! built-in sample dataset, tagged as [`FetchOutcome::Degraded`] so callers
//! and tests can tell demo data from live data. Uploads always propagate
//! their errors — they are never silently substituted.
//!
//! # Retry Strategy
//!
//! Reads use exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! Uploads are a single attempt; retrying a non-idempotent POST could create
//! duplicate materials.

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::models::{Concept, Material, UploadPayload};
use crate::normalize::{normalize_concept, normalize_material, ConceptRecord, MaterialRecord};
use crate::sample;

/// Result of a read-path fetch: live backend data, or the sample dataset
/// substituted after a transport failure (with the original error chain as
/// `cause`).
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    Live(T),
    Degraded { data: T, cause: String },
}

impl<T> FetchOutcome<T> {
    pub fn data(&self) -> &T {
        match self {
            FetchOutcome::Live(data) => data,
            FetchOutcome::Degraded { data, .. } => data,
        }
    }

    pub fn into_data(self) -> T {
        match self {
            FetchOutcome::Live(data) => data,
            FetchOutcome::Degraded { data, .. } => data,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, FetchOutcome::Degraded { .. })
    }
}

/// Client for the study pipeline backend.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    max_retries: u32,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.resolve_token(),
            max_retries: config.max_retries,
        })
    }

    /// Fetch the materials list, degrading to the sample dataset on
    /// transport failure.
    pub async fn list_materials(&self) -> FetchOutcome<Vec<Material>> {
        match self.get_list::<MaterialRecord>("/materials/").await {
            Ok(records) => {
                debug!("Fetched {} materials", records.len());
                FetchOutcome::Live(records.into_iter().map(normalize_material).collect())
            }
            Err(e) => {
                warn!("Materials fetch failed, using sample data: {:#}", e);
                FetchOutcome::Degraded {
                    data: sample::sample_materials(),
                    cause: format!("{:#}", e),
                }
            }
        }
    }

    /// Fetch a material's concepts, degrading to the sample dataset on
    /// transport failure.
    pub async fn list_concepts(&self, material_id: i64) -> FetchOutcome<Vec<Concept>> {
        let path = format!("/materials/{}/concepts/", material_id);
        match self.get_list::<ConceptRecord>(&path).await {
            Ok(records) => {
                debug!(
                    "Fetched {} concepts for material {}",
                    records.len(),
                    material_id
                );
                FetchOutcome::Live(records.into_iter().map(normalize_concept).collect())
            }
            Err(e) => {
                warn!(
                    "Concept fetch failed for material {}, using sample data: {:#}",
                    material_id, e
                );
                FetchOutcome::Degraded {
                    data: sample::sample_concepts(),
                    cause: format!("{:#}", e),
                }
            }
        }
    }

    /// Upload new study material. Returns the created material's id.
    ///
    /// Unlike the read paths this propagates every failure; the caller
    /// surfaces the message to the user.
    pub async fn upload_material(&self, payload: &UploadPayload) -> Result<i64> {
        if payload.title.trim().is_empty() {
            bail!("Upload title must not be empty");
        }

        let mut form = reqwest::multipart::Form::new()
            .text("title", payload.title.clone())
            .text("source_type", payload.source.as_str());

        if let Some(ref notes) = payload.notes {
            form = form.text("text_content", notes.clone());
        }

        if let Some(ref path) = payload.file {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read upload file: {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.bin".to_string());
            form = form.part(
                "original_file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );
        }

        let url = format!("{}/upload-material/", self.base_url);
        debug!("Uploading material '{}' to {}", payload.title, url);

        let response = self
            .authorize(self.http.post(&url))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Upload request failed for {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if body.trim().is_empty() {
                bail!("Upload failed ({})", status);
            }
            bail!("Upload failed ({}): {}", status, body);
        }

        let created: serde_json::Value = response
            .json()
            .await
            .context("Upload response was not valid JSON")?;
        created
            .get("id")
            .and_then(|id| id.as_i64())
            .ok_or_else(|| anyhow::anyhow!("Upload response carried no material id"))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GET a JSON list with retry/backoff.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .authorize(self.http.get(&url))
                .header("Accept", "application/json")
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return response
                            .json::<Vec<T>>()
                            .await
                            .with_context(|| format!("Decoding JSON for {}", url));
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!("Backend error {}: {}", status, body));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body = response.text().await.unwrap_or_default();
                    bail!("Backend error {} for {}: {}", status, url, body);
                }
                Err(e) => {
                    last_err = Some(
                        anyhow::Error::new(e).context(format!("Request failed for {}", url)),
                    );
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Fetch failed after retries")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;

    fn offline_client() -> BackendClient {
        BackendClient::new(&BackendConfig {
            base_url: "http://127.0.0.1:1/api".to_string(),
            token: None,
            timeout_secs: 2,
            max_retries: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn unreachable_backend_degrades_to_sample_materials() {
        let client = offline_client();
        let outcome = client.list_materials().await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.data(), &sample::sample_materials());
    }

    #[tokio::test]
    async fn degraded_fetches_are_identical() {
        let client = offline_client();
        let first = client.list_concepts(501).await.into_data();
        let second = client.list_concepts(501).await.into_data();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn upload_failure_propagates() {
        let client = offline_client();
        let payload = UploadPayload {
            title: "Linear Algebra Midterm Notes".to_string(),
            notes: None,
            source: crate::models::SourceKind::Upload,
            file: None,
        };
        let err = client.upload_material(&payload).await.unwrap_err();
        assert!(format!("{:#}", err).contains("Upload request failed"));
    }

    #[tokio::test]
    async fn empty_title_is_rejected_before_any_request() {
        let client = offline_client();
        let payload = UploadPayload {
            title: "   ".to_string(),
            notes: None,
            source: crate::models::SourceKind::Upload,
            file: None,
        };
        let err = client.upload_material(&payload).await.unwrap_err();
        assert!(err.to_string().contains("title"));
    }
}
