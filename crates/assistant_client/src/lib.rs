//! Client side of the election assistant: a narrow `ask` contract plus the
//! HTTP adapter for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_INSTRUCTION: &str = "You are a helpful election assistant. Provide factual and neutral information about democratic voting processes and the importance of participation. Keep answers under 100 words.";
const QUERY_PREFIX: &str = "As an election information assistant, answer this briefly: ";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("assistant service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AssistantError {
    fn unavailable(reason: impl Into<String>) -> Self {
        Self::ServiceUnavailable(reason.into())
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            Self::unavailable(format!("request timed out: {value}"))
        } else if value.is_decode() {
            Self::unavailable(format!("malformed response: {value}"))
        } else {
            Self::unavailable(value.to_string())
        }
    }
}

#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, query: &str) -> Result<String, AssistantError>;
}

/// Stand-in used when no credential is configured.
pub struct MissingAssistant;

#[async_trait]
impl Assistant for MissingAssistant {
    async fn ask(&self, _query: &str) -> Result<String, AssistantError> {
        Err(AssistantError::unavailable("no assistant credential configured"))
    }
}

#[derive(Debug, Clone)]
pub struct AssistantOptions {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl AssistantOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiAssistant {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiAssistant {
    pub fn new(options: AssistantOptions) -> Result<Self, AssistantError> {
        let endpoint = generate_content_url(&options.base_url, &options.model)?;
        let http = Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|err| AssistantError::unavailable(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            endpoint,
            api_key: options.api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn ask(&self, query: &str) -> Result<String, AssistantError> {
        if self.api_key.trim().is_empty() {
            return Err(AssistantError::unavailable("assistant credential is empty"));
        }

        let prompt = format!("{QUERY_PREFIX}{query}");
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_INSTRUCTION,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: &prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, "sending assistant query");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "assistant request rejected");
            return Err(AssistantError::unavailable(format!(
                "assistant returned status {status}"
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        Ok(body.into_text())
    }
}

fn generate_content_url(base_url: &str, model: &str) -> Result<Url, AssistantError> {
    let raw = format!(
        "{}/v1beta/models/{model}:generateContent",
        base_url.trim().trim_end_matches('/')
    );
    Url::parse(&raw)
        .map_err(|err| AssistantError::unavailable(format!("invalid assistant endpoint '{raw}': {err}")))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
