//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Gemini `generateContent` API.
//! It implements the `GenerativeModelService` port from the `core` crate.

use async_trait::async_trait;
use coursehub_core::generation::{Candidate, FinishReason, GenerationRequest, RawGeneration};
use coursehub_core::ports::{GenerationError, GenerativeModelService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Everything the client needs, passed in explicitly rather than read from the environment.
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// Upper bound for one request, connection included.
    pub timeout: Duration,
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    candidate_count: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseCandidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &'a GenerationRequest) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.as_str(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                top_k: request.top_k,
                top_p: request.top_p,
                max_output_tokens: request.max_output_tokens,
                candidate_count: request.candidate_count,
            },
            safety_settings: request
                .safety_thresholds
                .iter()
                .map(|(category, threshold)| SafetySetting {
                    category: category.as_str(),
                    threshold: threshold.as_str(),
                })
                .collect(),
        }
    }
}

impl From<GenerateContentResponse> for RawGeneration {
    fn from(response: GenerateContentResponse) -> Self {
        let candidates = response
            .candidates
            .into_iter()
            .map(|candidate| {
                let texts: Vec<String> = candidate
                    .content
                    .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
                    .unwrap_or_default();
                Candidate {
                    finish_reason: candidate.finish_reason.as_deref().map(FinishReason::parse),
                    text: (!texts.is_empty()).then(|| texts.concat()),
                }
            })
            .collect();
        RawGeneration { candidates }
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerativeModelService` against the Gemini REST API.
#[derive(Clone)]
pub struct GeminiAdapter {
    client: Client,
    config: GeminiConfig,
}

impl GeminiAdapter {
    /// Creates a new `GeminiAdapter` with a client bounded by `config.timeout`.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

//=========================================================================================
// `GenerativeModelService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeModelService for GeminiAdapter {
    async fn generate_content(
        &self,
        request: &GenerationRequest,
    ) -> Result<RawGeneration, GenerationError> {
        let body = GenerateContentRequest::from_request(request);
        debug!(
            model = %self.config.model,
            max_output_tokens = request.max_output_tokens,
            "Sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Gemini request timed out after {:?}", self.config.timeout);
                    GenerationError::Network(format!(
                        "request timed out after {:?}",
                        self.config.timeout
                    ))
                } else {
                    error!("Gemini request failed: {}", e);
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, body);
            return Err(GenerationError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let decoded: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Decode(e.to_string()))?;

        Ok(decoded.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn adapter(server: &MockServer, timeout: Duration) -> GeminiAdapter {
        GeminiAdapter::new(GeminiConfig {
            api_key: "test-key".to_string(),
            model: "gemini-test".to_string(),
            base_url: server.uri(),
            timeout,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_prompt_and_generation_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "parts": [{ "text": "What is CSS?" }] }],
                "generationConfig": { "maxOutputTokens": 512, "candidateCount": 1, "topK": 40 },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "CSS styles " }, { "text": "pages." }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let raw = adapter(&server, Duration::from_secs(5))
            .generate_content(&GenerationRequest::new("What is CSS?", 512))
            .await
            .unwrap();

        assert_eq!(
            raw,
            RawGeneration {
                candidates: vec![Candidate {
                    finish_reason: Some(FinishReason::Stop),
                    text: Some("CSS styles pages.".to_string()),
                }]
            }
        );
    }

    #[tokio::test]
    async fn test_sends_all_safety_settings() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        adapter(&server, Duration::from_secs(5))
            .generate_content(&GenerationRequest::new("hi", 100))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let settings = body["safetySettings"].as_array().unwrap();
        assert_eq!(settings.len(), 4);
        assert_eq!(settings[0]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }

    #[tokio::test]
    async fn test_missing_candidates_and_parts_decode_to_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "MAX_TOKENS", "content": { "parts": [] } }]
            })))
            .mount(&server)
            .await;

        let raw = adapter(&server, Duration::from_secs(5))
            .generate_content(&GenerationRequest::new("hi", 100))
            .await
            .unwrap();

        assert_eq!(raw.candidates[0].finish_reason, Some(FinishReason::MaxTokens));
        assert_eq!(raw.candidates[0].text, None);
    }

    #[tokio::test]
    async fn test_http_error_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let err = adapter(&server, Duration::from_secs(5))
            .generate_content(&GenerationRequest::new("hi", 100))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            GenerationError::Http { status: 429, ref body } if body == "quota exceeded"
        ));
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = adapter(&server, Duration::from_secs(5))
            .generate_content(&GenerationRequest::new("hi", 100))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "candidates": [] }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = adapter(&server, Duration::from_millis(100))
            .generate_content(&GenerationRequest::new("hi", 100))
            .await
            .unwrap_err();

        assert!(
            matches!(err, GenerationError::Network(ref message) if message.contains("timed out"))
        );
    }
}
