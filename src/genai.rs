//! Client for the Google Generative Language `generateContent` API.
//!
//! Requests carry a prompt plus a response schema and ask for JSON output.
//! The returned text is decoded into typed records by [`decode_records`];
//! nothing about the payload shape is trusted before that step.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::GenAiConfig;

// ─── Errors ─────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    #[error("generative API is disabled (no API key configured)")]
    Disabled,

    #[error("request to generative API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generative API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("generative API returned no text")]
    EmptyResponse,

    #[error("failed to decode generated records: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected {expected} generated records, got {actual}")]
    Count { expected: usize, actual: usize },
}

// ─── Response schema ────────────────────────────────────────────

/// Subset of the OpenAPI schema dialect accepted as `responseSchema`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Schema {
    String,
    Number,
    Array {
        items: Box<Schema>,
    },
    Object {
        properties: BTreeMap<String, Schema>,
        required: Vec<String>,
    },
}

impl Schema {
    /// Object whose listed fields are all required
    pub fn object(fields: &[(&str, Schema)]) -> Self {
        Schema::Object {
            properties: fields
                .iter()
                .map(|(name, schema)| (name.to_string(), schema.clone()))
                .collect(),
            required: fields.iter().map(|(name, _)| name.to_string()).collect(),
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Schema::Array {
            items: Box::new(items),
        }
    }
}

/// One structured generation request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub schema: Schema,
}

// ─── Wire types ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Schema,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

fn build_body(request: &GenerationRequest) -> ApiRequest<'_> {
    ApiRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![RequestPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &request.schema,
        },
    }
}

/// Concatenate the text parts of the first candidate
fn response_text(resp: ApiResponse) -> Result<String, GenAiError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GenAiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

// ─── Generator seam ─────────────────────────────────────────────

/// Anything that can turn a structured request into generated JSON text
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        config: &GenAiConfig,
        request: &GenerationRequest,
    ) -> Result<String, GenAiError>;
}

/// HTTP client for the hosted Gemini models
#[derive(Debug, Clone, Default)]
pub struct GeminiClient {
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        config: &GenAiConfig,
        request: &GenerationRequest,
    ) -> Result<String, GenAiError> {
        let api_key = match (&config.api_key, config.enabled) {
            (Some(key), true) => key,
            _ => return Err(GenAiError::Disabled),
        };

        tracing::debug!("POST {} (model {})", config.generate_url(), config.model);

        let mut builder = self
            .http
            .post(config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&build_body(request));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder.send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenAiError::Status {
                status,
                message: error_message(status, &body),
            });
        }

        let api_resp: ApiResponse = resp.json().await?;
        response_text(api_resp)
    }
}

// ─── Decoding ───────────────────────────────────────────────────

/// Decode generated text as a JSON array of `T`.
///
/// Tolerates a surrounding markdown code fence, which models occasionally
/// add even when asked for raw JSON.
pub fn decode_records<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, GenAiError> {
    let trimmed = strip_code_fence(text.trim());
    Ok(serde_json::from_str(trimmed)?)
}

/// Decode exactly `expected` records; surplus records are dropped, a
/// shortfall is an error.
pub fn decode_exact<T: DeserializeOwned>(text: &str, expected: usize) -> Result<Vec<T>, GenAiError> {
    let mut records: Vec<T> = decode_records(text)?;
    if records.len() < expected {
        return Err(GenAiError::Count {
            expected,
            actual: records.len(),
        });
    }
    records.truncate(expected);
    Ok(records)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

// ─── Test support ───────────────────────────────────────────────
