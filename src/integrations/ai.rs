//! 生成式 AI 文本客户端
//!
//! 调用 `POST {endpoint}/models/{model}:generateContent?key=...`，
//! 取第一个候选的文本作为 Markdown 报告。

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AiConfig;
use crate::errors::{PortalError, Result};

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// 未配置 API key 时为 false
    fn is_configured(&self) -> bool;
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

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
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .reduce(|mut acc, t| {
                acc.push_str(&t);
                acc
            })
            .filter(|t| !t.trim().is_empty())
    }
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let start = Instant::now();
        let response = self
            .client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("AI service returned HTTP {}: {}", status.as_u16(), body);
            return Err(PortalError::external_service(format!(
                "AI service returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        debug!(
            "AI generation finished in {} ms",
            start.elapsed().as_millis()
        );

        parsed
            .first_text()
            .ok_or_else(|| PortalError::external_service("AI service returned no text"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_first_candidate_text() {
        let parsed: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "# Báo cáo"}, {"text": "\nNội dung"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("# Báo cáo\nNội dung"));
    }

    #[test]
    fn test_empty_candidates() {
        let parsed: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {}})).unwrap();
        assert!(parsed.first_text().is_none());
    }

    #[test]
    fn test_url_building() {
        let client = GeminiClient::new(&AiConfig {
            endpoint: "http://localhost:9000/v1beta/".into(),
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9000/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert!(client.is_configured());
    }
}
