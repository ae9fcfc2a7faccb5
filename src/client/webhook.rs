//! HTTP client for the chat webhook.
//!
//! The webhook exposes two endpoints under one base URL: a JSON query
//! endpoint answering `{ "query": … }` with `{ "output": … }`, and a
//! multipart transcription endpoint answering `{ "text": … }`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::audio::AudioClip;
use super::{QueryProvider, SpeechToTextProvider};
use crate::config::WebhookConfig;
use crate::error::ChatError;

pub const DEFAULT_QUERY_PATH: &str = "query";
pub const DEFAULT_TRANSCRIBE_PATH: &str = "transcribe";
const AUDIO_FIELD: &str = "audio";

#[derive(Serialize, Debug)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize, Debug)]
struct QueryResponse {
    output: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Client for the chat webhook.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    base_url: String,
    query_path: String,
    transcribe_path: Option<String>,
    timeout_seconds: Option<u64>,
}

/// Builder for [`WebhookClient`].
#[derive(Debug, Default)]
pub struct WebhookClientBuilder {
    base_url: Option<String>,
    query_path: Option<String>,
    transcribe_path: Option<Option<String>>,
    timeout_seconds: Option<u64>,
    client: Option<reqwest::Client>,
}

impl WebhookClientBuilder {
    /// Sets the base URL; trailing slashes are ignored.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the path segment of the query endpoint.
    pub fn query_path(mut self, path: impl Into<String>) -> Self {
        self.query_path = Some(path.into());
        self
    }

    /// Sets the path segment of the transcription endpoint.
    pub fn transcribe_path(mut self, path: impl Into<String>) -> Self {
        self.transcribe_path = Some(Some(path.into()));
        self
    }

    /// Turns voice transcription off.
    pub fn without_transcription(mut self) -> Self {
        self.transcribe_path = Some(None);
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Reuses an existing reqwest client (connection pool, proxies, TLS).
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> Result<WebhookClient, ChatError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ChatError::Config("webhook base URL is not set".to_string()))?;

        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder().build()?,
        };

        Ok(WebhookClient {
            client,
            base_url,
            query_path: self
                .query_path
                .unwrap_or_else(|| DEFAULT_QUERY_PATH.to_string()),
            transcribe_path: self
                .transcribe_path
                .unwrap_or_else(|| Some(DEFAULT_TRANSCRIBE_PATH.to_string())),
            timeout_seconds: self.timeout_seconds,
        })
    }
}

impl WebhookClient {
    pub fn builder() -> WebhookClientBuilder {
        WebhookClientBuilder::default()
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Self, ChatError> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .query_path(&config.query_path);
        builder = match &config.transcribe_path {
            Some(path) => builder.transcribe_path(path),
            None => builder.without_transcription(),
        };
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout_seconds(seconds);
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an endpoint below the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn supports_transcription(&self) -> bool {
        self.transcribe_path.is_some()
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self.client.post(url);
        if let Some(t) = self.timeout_seconds {
            req = req.timeout(Duration::from_secs(t));
        }
        req
    }

    async fn ensure_success_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response, ChatError> {
        log::debug!("{context} HTTP status: {}", response.status());
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await?;
        log::warn!("{context} failed with status {status}");
        Err(ChatError::StatusError {
            context: context.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl QueryProvider for WebhookClient {
    async fn ask(&self, query: &str) -> Result<String, ChatError> {
        let url = self.endpoint(&self.query_path);
        log::debug!("webhook query to {url} ({} chars)", query.chars().count());

        let resp = self
            .post(&url)
            .json(&QueryRequest { query })
            .send()
            .await
            .map_err(|e| {
                log::warn!("webhook query transport error: {e}");
                ChatError::from(e)
            })?;
        let resp = self.ensure_success_response(resp, "webhook query").await?;
        let raw = resp.text().await?;

        match serde_json::from_str::<QueryResponse>(&raw) {
            Ok(QueryResponse {
                output: Some(output),
            }) if !output.is_empty() => Ok(output),
            _ => Err(ChatError::invalid_response(raw)),
        }
    }
}

#[async_trait]
impl SpeechToTextProvider for WebhookClient {
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, ChatError> {
        let path = self.transcribe_path.as_deref().ok_or_else(|| {
            ChatError::UnsupportedEnvironment("speech transcription is not configured".into())
        })?;
        let url = self.endpoint(path);
        log::debug!(
            "webhook transcription to {url} ({} bytes, {})",
            clip.len(),
            clip.media_type()
        );

        let form = reqwest::multipart::Form::new().part(AUDIO_FIELD, audio_part(clip)?);

        let resp = self.post(&url).multipart(form).send().await?;
        let resp = self
            .ensure_success_response(resp, "webhook transcription")
            .await?;
        let raw = resp.text().await?;

        match serde_json::from_str::<TranscriptionResponse>(&raw) {
            Ok(TranscriptionResponse { text: Some(text) }) => Ok(text),
            _ => Err(ChatError::invalid_response(raw)),
        }
    }
}

/// Multipart part for a clip. A media type reqwest cannot parse is replaced
/// by the canonical type of the clip's format.
fn audio_part(clip: &AudioClip) -> Result<reqwest::multipart::Part, ChatError> {
    let part = || {
        reqwest::multipart::Part::bytes(clip.data().to_vec()).file_name(clip.file_name())
    };
    match part().mime_str(clip.media_type()) {
        Ok(part) => Ok(part),
        Err(err) => {
            let fallback = clip.format().mime_type();
            log::debug!(
                "media type {:?} rejected ({err}), uploading as {fallback}",
                clip.media_type()
            );
            Ok(part().mime_str(fallback)?)
        }
    }
}
