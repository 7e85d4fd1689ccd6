use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::ChatError;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: String,
}

/// Client for the generative-language API.
///
/// Each prompt is a standalone request; no conversation context is carried
/// between calls. One attempt per call, bounded by the 30-second timeout.
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, GEMINI_ENDPOINT, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    /// Sends one prompt and returns the first candidate's text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, "dispatching generate request");

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ChatError::Parse("response contained no candidate text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TEST_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn test_client(server: &MockServer, timeout: Duration) -> GeminiClient {
        GeminiClient::with_endpoint("test-key", format!("{}{}", server.uri(), TEST_PATH), timeout)
    }

    #[tokio::test]
    async fn returns_candidate_text_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEST_PATH))
            .and(query_param("key", "test-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "contents": [{"parts": [{"text": "hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "hello"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        assert_eq!(client.generate("hi").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn non_success_status_carries_raw_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEST_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        match client.generate("hi").await {
            Err(ChatError::Api { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "server error");
            }
            other => panic!("expected ChatError::Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_candidate_path_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEST_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        assert!(matches!(
            client.generate("hi").await,
            Err(ChatError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEST_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_secs(5));
        assert!(matches!(
            client.generate("hi").await,
            Err(ChatError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn timeout_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(TEST_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "candidates": [{"content": {"parts": [{"text": "late"}]}}]
                    }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, Duration::from_millis(100));
        assert!(matches!(
            client.generate("hi").await,
            Err(ChatError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        // Port 1 is reserved and nothing listens on it.
        let client = GeminiClient::with_endpoint(
            "test-key",
            "http://127.0.0.1:1/generate",
            Duration::from_secs(1),
        );
        assert!(matches!(
            client.generate("hi").await,
            Err(ChatError::Transport(_))
        ));
    }
}
