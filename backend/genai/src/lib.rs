//! Gemini client: Files API upload/delete plus `generateContent`.
//!
//! Implements [`RemoteFileService`] over the REST endpoints at
//! `generativelanguage.googleapis.com`. Every call is a single blocking
//! (awaited) request with its own deadline; nothing here retries.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use adscope_config::{Config, SafetySetting};
use adscope_core::{AdscopeError, RemoteFileService, RemoteHandle, RequestPart, Result};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the Gemini generative-language service.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    safety_settings: Vec<SafetySetting>,
    /// Deadline for upload and delete calls; generation brings its own.
    http_timeout: Duration,
}

impl GeminiClient {
    /// Build a client from runtime configuration.
    ///
    /// Fails when no API credential is configured; nothing remote can work
    /// without one, so this surfaces before any artifact is touched.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| AdscopeError::Config("GEN_AI credential is not set".into()))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            api_key,
            model: config.model.clone(),
            safety_settings: config.safety_settings.clone(),
            http_timeout: Duration::from_secs(config.http_timeout_secs),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: UploadedFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadedFile {
    name: String,
    uri: String,
    mime_type: Option<String>,
}

#[async_trait]
impl RemoteFileService for GeminiClient {
    async fn upload(&self, path: &Path) -> Result<RemoteHandle> {
        let artifact = path.display().to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AdscopeError::io(path, e))?;

        debug!("uploading {artifact} ({} bytes)", bytes.len());
        let response = self
            .http
            .post(format!(
                "{}/upload/v1beta/files?key={}",
                self.base_url, self.api_key
            ))
            .header("X-Goog-Upload-Protocol", "raw")
            .header("Content-Type", "image/jpeg")
            .timeout(self.http_timeout)
            .body(bytes)
            .send()
            .await
            .map_err(|e| AdscopeError::Upload {
                artifact: artifact.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdscopeError::Upload {
                artifact,
                message: format!("{status}: {body}"),
            });
        }

        let uploaded: UploadResponse =
            response.json().await.map_err(|e| AdscopeError::Upload {
                artifact: artifact.clone(),
                message: format!("malformed upload response: {e}"),
            })?;

        Ok(RemoteHandle {
            name: uploaded.file.name,
            uri: uploaded.file.uri,
            mime_type: uploaded.file.mime_type.unwrap_or_else(|| "image/jpeg".into()),
        })
    }

    async fn generate(&self, parts: &[RequestPart], timeout: Duration) -> Result<String> {
        let body = build_generate_body(parts, &self.safety_settings);
        info!(
            "generating with {} over {} request parts",
            self.model,
            parts.len()
        );

        let response = self
            .http
            .post(format!(
                "{}/v1beta/{}:generateContent?key={}",
                self.base_url, self.model, self.api_key
            ))
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AdscopeError::GenerationTimeout {
                        seconds: timeout.as_secs(),
                    }
                } else {
                    AdscopeError::Generation(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AdscopeError::Generation(format!("{status}: {body}")));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| AdscopeError::Generation(format!("malformed response: {e}")))?;

        let text = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();
        if text.is_empty() {
            return Err(AdscopeError::Generation(
                "response carried no candidate text".into(),
            ));
        }
        Ok(text)
    }

    async fn delete(&self, handle: &RemoteHandle) -> Result<()> {
        debug!("deleting remote file {}", handle.name);
        let response = self
            .http
            .delete(format!(
                "{}/v1beta/{}?key={}",
                self.base_url, handle.name, self.api_key
            ))
            .timeout(self.http_timeout)
            .send()
            .await
            .map_err(|e| AdscopeError::Delete {
                handle: handle.name.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AdscopeError::Delete {
                handle: handle.name.clone(),
                message: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Assemble the `generateContent` body: one user turn whose parts mirror the
/// request sequence exactly, plus the configured safety settings.
fn build_generate_body(parts: &[RequestPart], safety_settings: &[SafetySetting]) -> Value {
    let json_parts: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            RequestPart::Text(text) => json!({ "text": text }),
            RequestPart::File(handle) => json!({
                "fileData": {
                    "mimeType": handle.mime_type,
                    "fileUri": handle.uri,
                }
            }),
        })
        .collect();

    let safety: Vec<Value> = safety_settings
        .iter()
        .map(|s| json!({ "category": s.category, "threshold": s.threshold }))
        .collect();

    json!({
        "contents": [{ "parts": json_parts }],
        "safetySettings": safety,
    })
}
