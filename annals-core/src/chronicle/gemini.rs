//! Gemini backend for the chronicler
//!
//! One `generateContent` call per request, with the structured-output schema
//! attached so the model answers in JSON.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::backend::{ChronicleBackend, DetailRequest};
use super::config::{ApiKey, ChronicleConfig};
use super::schema::response_schema;
use crate::error::{ConfigError, FetchError};

/// Gemini API backend
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: ApiKey,
}

impl GeminiBackend {
    /// Create a backend from validated config and an already-resolved key
    pub fn new(config: &ChronicleConfig, api_key: ApiKey) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("annals/{}", env!("CARGO_PKG_VERSION")));

        if let Some(timeout_seconds) = config.timeout_seconds {
            // Structured generation routinely takes several seconds
            const MIN_TIMEOUT_SECONDS: u64 = 5;
            let timeout_seconds = if timeout_seconds < MIN_TIMEOUT_SECONDS {
                warn!(
                    "Configured timeout_seconds={} is too low; using minimum of {} seconds",
                    timeout_seconds, MIN_TIMEOUT_SECONDS
                );
                MIN_TIMEOUT_SECONDS
            } else {
                timeout_seconds
            };
            builder = builder.timeout(Duration::from_secs(timeout_seconds));
        }

        let client = builder
            .build()
            .map_err(|source| ConfigError::HttpClient { source })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig<'a>,
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

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn build_body<'a>(request: &'a DetailRequest) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user"),
            parts: vec![Part {
                text: &request.prompt,
            }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: &request.system_instruction,
            }],
        },
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    }
}

#[async_trait]
impl ChronicleBackend for GeminiBackend {
    async fn generate(&self, request: &DetailRequest) -> Result<String, FetchError> {
        debug!("Requesting era details from Gemini ({})", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&build_body(request))
            .send()
            .await
            .map_err(|source| FetchError::Transport { source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API error: {} - {}", status, body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = response
            .text()
            .await
            .map_err(|source| FetchError::Transport { source })?;

        let envelope: GenerateContentResponse =
            serde_json::from_str(&raw).map_err(|source| FetchError::Malformed { source })?;

        let text = envelope.text().ok_or(FetchError::NoContent)?;
        debug!("Gemini raw response ({} chars)", text.chars().count());
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }

    fn override_model(&mut self, model: String) {
        self.model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chronicle::record::fixtures::TANG_PAYLOAD;
    use mockito::{Matcher, Server};

    fn request() -> DetailRequest {
        DetailRequest {
            prompt: "请针对中国历史上的唐朝（Tang Dynasty）提供一份详尽的历史分析。".to_string(),
            system_instruction: "你是一位资深历史学家。".to_string(),
        }
    }

    fn backend(url: String) -> GeminiBackend {
        let config = ChronicleConfig {
            base_url: url,
            ..Default::default()
        };
        GeminiBackend::new(&config, ApiKey::new("test-key")).unwrap()
    }

    fn envelope(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_request_body_shape() {
        let req = request();
        let body = serde_json::to_value(build_body(&req)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], req.prompt.as_str());
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], req.system_instruction.as_str());
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(&body["generationConfig"]["responseSchema"], response_schema());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let backend = backend("https://example.com/".to_string());
        assert_eq!(
            backend.endpoint(),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_envelope_text_joins_parts() {
        let envelope: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]
        }))
        .unwrap();
        assert_eq!(envelope.text().as_deref(), Some("{\"a\":1}"));

        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), None);
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(envelope(TANG_PAYLOAD))
            .create_async()
            .await;

        let text = backend(server.url()).generate(&request()).await.unwrap();
        assert_eq!(text, TANG_PAYLOAD);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_override_model_changes_endpoint() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-pro:generateContent")
            .with_status(200)
            .with_body(envelope(TANG_PAYLOAD))
            .create_async()
            .await;

        let mut backend = backend(server.url());
        backend.override_model("gemini-2.5-pro".to_string());
        backend.generate(&request()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_is_status_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(401)
            .with_body(r#"{"error": {"code": 401, "message": "API key not valid"}}"#)
            .create_async()
            .await;

        let err = backend(server.url()).generate(&request()).await.unwrap_err();
        assert!(err.is_auth_rejection());
        assert!(matches!(err, FetchError::Status { status: 401, ref body } if body.contains("API key")));
    }

    #[tokio::test]
    async fn test_rate_limited_is_status_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let err = backend(server.url()).generate(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_missing_candidates_is_no_content() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let err = backend(server.url()).generate(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::NoContent));
    }

    #[tokio::test]
    async fn test_non_json_envelope_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let err = backend(server.url()).generate(&request()).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let err = backend("http://127.0.0.1:9".to_string())
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
