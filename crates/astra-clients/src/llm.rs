//! Typed client for the Gemini `generateContent` API.
//!
//! | Method | Path (relative to `api_url`) | Operation |
//! |--------|------------------------------|-----------|
//! | POST   | `models/{model}:generateContent` | Single-turn generation |
//!
//! The key travels in the `x-goog-api-key` header. Every request asks for
//! `application/json` output; callers parse the returned text.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{check_status, ClientError};
use crate::retry::{retry_send, RetryPolicy};

const API_KEY_HEADER: &str = "x-goog-api-key";

// -- Wire types ---------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

/// Response body of `generateContent`. Only the fields read here are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

// -- Client -------------------------------------------------------------------

#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: zeroize::Zeroizing<String>,
    models: Vec<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("models", &self.models)
            .finish()
    }
}

impl LlmClient {
    pub fn new(config: LlmConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self {
            http,
            base_url: config.api_url,
            api_key: config.api_key,
            models: config.models,
            retry: config.retry,
        })
    }

    /// Model names in the order they should be tried.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Generate a completion and return the raw text of the first candidate.
    ///
    /// Calls `POST {api_url}/models/{model}:generateContent`.
    pub async fn generate(
        &self,
        model: &str,
        system: Option<&str>,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, ClientError> {
        let endpoint = format!("POST models/{model}:generateContent");
        let url = format!(
            "{}/models/{model}:generateContent",
            self.base_url.as_str().trim_end_matches('/')
        );
        let body = GenerateRequest {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![RequestPart { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature,
                response_mime_type: "application/json",
            },
        };

        let resp = retry_send(&self.retry, &endpoint, || {
            self.http
                .post(&url)
                .header(API_KEY_HEADER, self.api_key.as_str())
                .json(&body)
                .send()
        })
        .await
        .map_err(|e| ClientError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;
        let resp = check_status(&endpoint, resp).await?;

        let parsed: GenerateResponse =
            resp.json().await.map_err(|e| ClientError::Deserialization {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(ClientError::EmptyResponse { endpoint }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_api_shape() {
        let req = GenerateRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![RequestPart { text: "sys" }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                response_mime_type: "application/json",
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn first_text_skips_partless_candidates() {
        let resp: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"inlineData": {}}, {"text": "{}"}]}}]
        }))
        .unwrap();
        assert_eq!(resp.first_text(), Some("{}"));

        let empty: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
