use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ReportGenerator, ReportRequest};
use crate::config::{KeyPlacement, ReportConfig};
use crate::fetch::auth::{ApiKey, UrlParam};
use crate::fetch::{BasicClient, HttpClient, post_json};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
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

impl GenerateResponse {
    /// Text of the first part of the first candidate, if it has any content.
    pub(crate) fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// [`ReportGenerator`] backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiClient<C = Box<dyn HttpClient>> {
    http: C,
    endpoint: String,
}

impl GeminiClient {
    /// Builds a client with the key placement, timeout and model from `config`.
    pub fn from_config(config: &ReportConfig) -> Result<Self> {
        let key = config
            .api_key
            .as_deref()
            .context("GEMINI_API_KEY must be set to generate a report")?;
        let base = BasicClient::with_timeout(config.timeout)?;

        let http: Box<dyn HttpClient> = match config.key_placement {
            KeyPlacement::Query => Box::new(UrlParam::new(base, "key", key)),
            KeyPlacement::Header => Box::new(ApiKey::new(base, "x-goog-api-key", key)?),
        };

        Ok(Self::new(http, config.endpoint()))
    }
}

impl<C: HttpClient> GeminiClient<C> {
    pub fn new(http: C, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> ReportGenerator for GeminiClient<C> {
    #[tracing::instrument(skip_all, fields(days = request.recent.len()))]
    async fn generate(&self, request: &ReportRequest) -> Result<String> {
        let prompt = request.prompt()?;
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: &prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "Sending report request");
        let response = post_json(&self.http, &self.endpoint, &body)
            .await
            .context("report request failed")?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("failed to parse report response")?;

        parsed
            .into_text()
            .ok_or_else(|| anyhow::anyhow!("model returned no report text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_extracts_first_part_text() {
        let resp = parse(
            r####"{"candidates":[{"content":{"parts":[{"text":"### Trend\nok"},{"text":"ignored"}],"role":"model"},"finishReason":"STOP"}]}"####,
        );
        assert_eq!(resp.into_text().as_deref(), Some("### Trend\nok"));
    }

    #[test]
    fn test_missing_pieces_yield_none() {
        assert!(parse("{}").into_text().is_none());
        assert!(parse(r#"{"candidates":[]}"#).into_text().is_none());
        assert!(parse(r#"{"candidates":[{}]}"#).into_text().is_none());
        assert!(parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#).into_text().is_none());
        assert!(parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#).into_text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"contents":[{"parts":[{"text":"hi"}]}]}"#
        );
    }

    #[test]
    fn test_from_config_requires_key() {
        assert!(GeminiClient::from_config(&ReportConfig::default()).is_err());

        let config = ReportConfig {
            api_key: Some("k".to_string()),
            key_placement: KeyPlacement::Header,
            ..Default::default()
        };
        let client = GeminiClient::from_config(&config).unwrap();
        assert!(client.endpoint.ends_with(":generateContent"));
    }
}
