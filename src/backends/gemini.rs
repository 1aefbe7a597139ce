//! Google Gemini API client for schema-enforced JSON generation.
//!
//! This module issues `generateContent` requests against the Gemini API with
//! a response schema attached, forcing the model to return machine-readable
//! JSON instead of prose.
//!
//! # Example
//! ```no_run
//! use mealplan::backends::gemini::Gemini;
//! use mealplan::generate::TextGenerator;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = Gemini::new(
//!         "your-api-key",
//!         None, // Use default model
//!         mealplan::prompt::response_schema(),
//!         Some(mealplan::prompt::SYSTEM_PROMPT.into()),
//!         None, // Default temperature
//!         None, // Default max tokens
//!         None, // Default timeout
//!     );
//!     let text = client.generate("Generate a 7-day meal plan").await.unwrap();
//!     println!("{text}");
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MealPlanError;
use crate::generate::TextGenerator;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini `generateContent` endpoint.
///
/// Holds the configuration and HTTP client needed to make one request per
/// user action. It implements [`TextGenerator`] so it can be wrapped by the
/// retry layer.
pub struct Gemini {
    /// API key for authentication
    pub api_key: String,
    /// Model identifier (e.g. "gemini-2.5-flash")
    pub model: String,
    /// Base URL, overridable for local testing
    pub base_url: String,
    /// Response schema attached to every request
    pub response_schema: Value,
    /// Optional system instruction
    pub system: Option<String>,
    /// Sampling temperature between 0.0 and 1.0
    pub temperature: Option<f32>,
    /// Maximum number of tokens to generate
    pub max_output_tokens: Option<u32>,
    /// HTTP client for making API requests
    client: Client,
}

/// Request body for content generation
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

/// A single content block in the conversation
#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

/// Text part within a content block
#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

/// System instruction wrapper
#[derive(Serialize)]
struct GeminiSystemInstruction<'a> {
    parts: Vec<GeminiPart<'a>>,
}

/// Generation parameters, including the structured-output settings
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Response from the generation endpoint
#[derive(Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Individual generation candidate
#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

/// Content block within a candidate
#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

/// Individual part of response content
#[derive(Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

impl Gemini {
    /// Creates a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for authentication
    /// * `model` - Model identifier (defaults to [`DEFAULT_MODEL`])
    /// * `response_schema` - JSON schema the response must conform to
    /// * `system` - System instruction to set context
    /// * `temperature` - Sampling temperature between 0.0 and 1.0
    /// * `max_output_tokens` - Maximum tokens in the response
    /// * `timeout_seconds` - Request timeout in seconds
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        response_schema: Value,
        system: Option<String>,
        temperature: Option<f32>,
        max_output_tokens: Option<u32>,
        timeout_seconds: Option<u64>,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(sec) = timeout_seconds {
            builder = builder.timeout(std::time::Duration::from_secs(sec));
        }
        Self {
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
            response_schema,
            system,
            temperature,
            max_output_tokens,
            client: builder.build().expect("Failed to build reqwest Client"),
        }
    }

    /// Overrides the API base URL (used to point at a mock server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Maps an unsuccessful HTTP status onto the error taxonomy.
    ///
    /// Only 429 and 5xx are server-side and retryable; 401/403 mean bad
    /// credentials, and every other status is reported immediately as an
    /// invalid request. Transport failures (no status at all) stay in
    /// `HttpError`.
    fn classify_status(status: StatusCode, body: String) -> MealPlanError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                MealPlanError::AuthError(format!("API returned {status}: {body}"))
            }
            s if s == StatusCode::TOO_MANY_REQUESTS || s.is_server_error() => {
                MealPlanError::ProviderError(format!("API returned {status}: {body}"))
            }
            _ => MealPlanError::InvalidRequest(format!("API returned {status}: {body}")),
        }
    }
}

#[async_trait]
impl TextGenerator for Gemini {
    /// Sends one `generateContent` request and returns the generated text.
    ///
    /// The text of all parts of the first candidate is joined; a response
    /// with no candidates or no text yields a `ResponseFormatError`.
    async fn generate(&self, prompt: &str) -> Result<String, MealPlanError> {
        if self.api_key.is_empty() {
            return Err(MealPlanError::AuthError(
                "Missing Gemini API key".to_string(),
            ));
        }

        let req_body = GeminiGenerateRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            system_instruction: self.system.as_deref().map(|text| GeminiSystemInstruction {
                parts: vec![GeminiPart { text }],
            }),
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json",
                response_schema: &self.response_schema,
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&req_body) {
                log::trace!("Gemini request payload: {json}");
            }
        }

        let url = format!(
            "{base}/models/{model}:generateContent?key={key}",
            base = self.base_url,
            model = self.model,
            key = self.api_key
        );

        let resp = self.client.post(&url).json(&req_body).send().await?;
        let status = resp.status();
        log::debug!("Gemini HTTP status: {status}");

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::classify_status(status, body));
        }

        let raw = resp.text().await?;
        let json_resp: GeminiGenerateResponse =
            serde_json::from_str(&raw).map_err(|e| MealPlanError::ResponseFormatError {
                message: format!("Failed to decode API response: {e}"),
                raw_response: raw.clone(),
            })?;

        let first_candidate = json_resp.candidates.into_iter().next().ok_or_else(|| {
            MealPlanError::ResponseFormatError {
                message: "No candidates returned by Gemini".to_string(),
                raw_response: raw.clone(),
            }
        })?;

        let text = first_candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(MealPlanError::ResponseFormatError {
                message: "Model did not return valid content".to_string(),
                raw_response: raw,
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_provider_errors() {
        for code in [429u16, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = Gemini::classify_status(status, String::new());
            assert!(
                matches!(err, MealPlanError::ProviderError(_)),
                "status {code} should classify as ProviderError, got {err:?}"
            );
        }
    }

    #[test]
    fn credential_errors_are_not_retryable_classes() {
        let err = Gemini::classify_status(StatusCode::UNAUTHORIZED, String::new());
        assert!(matches!(err, MealPlanError::AuthError(_)));
        let err = Gemini::classify_status(StatusCode::NOT_FOUND, String::new());
        assert!(matches!(err, MealPlanError::InvalidRequest(_)));
    }

    #[test]
    fn statuses_outside_the_taxonomy_are_reported_not_retried() {
        for code in [302u16, 402, 405, 418] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = Gemini::classify_status(status, String::new());
            assert!(
                matches!(err, MealPlanError::InvalidRequest(_)),
                "status {code} should classify as InvalidRequest, got {err:?}"
            );
        }
    }
}
