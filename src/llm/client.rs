use super::answer::normalize_answer;
use super::prompt::{SYSTEM_PROMPT, response_schema};
use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, warn};

const API_KEY_PLACEHOLDER: &str = "PASTE_YOUR_NEW_GEMINI_KEY_HERE";

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_answer(&self, topic: &str) -> Result<StructuredAnswer>;
}

/// Client for the Gemini `generateContent` endpoint with schema-constrained output.
pub struct GeminiClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    pub fn build_request(&self, topic: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(topic)],
            system_instruction: Content::text(SYSTEM_PROMPT),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_k: self.config.top_k,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }

    fn api_key(&self) -> Result<&str> {
        let key = self.config.api_key.trim();
        if key.is_empty() || key.contains(API_KEY_PLACEHOLDER) {
            error!("Missing LLM API key");
            return Err(Error::config(
                "API Key is not configured. Set GEMINI_API_KEY or llm.api_key.",
            ));
        }
        Ok(key)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_answer(&self, topic: &str) -> Result<StructuredAnswer> {
        let key = self.api_key()?;
        let request = self.build_request(topic);

        debug!(
            "Requesting answer from {} for topic of {} chars",
            self.config.model,
            topic.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", key)])
            .json(&request)
            .send()
            .await
            .map_err(Error::transport)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(Error::transport)?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|body| {
                    body.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            warn!("LLM API returned {}: {}", status, message);
            return Err(Error::llm(format!("API Error: {message}")));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => Ok(normalize_answer(&body)),
            Err(e) => {
                warn!("LLM API returned a non-JSON body: {}", e);
                Ok(StructuredAnswer::processing_failure())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_config() -> LlmConfig {
        LlmConfig {
            base_url: "https://generativelanguage.googleapis.com/v1beta/models/".to_string(),
            api_key: "test-api-key".to_string(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(create_test_config());
        assert_eq!(
            client.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-09-2025:generateContent"
        );
    }

    #[test]
    fn test_request_carries_persona_and_schema() {
        let client = GeminiClient::new(create_test_config());
        let request = client.build_request("How can I lower my risk?");

        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].parts[0].text, "How can I lower my risk?");
        assert!(request.system_instruction.parts[0].text.contains("Neuro-Sage"));
        assert_eq!(request.generation_config.temperature, 0.7);
        assert_eq!(request.generation_config.top_k, 40);
        assert_eq!(request.generation_config.response_mime_type, "application/json");
        assert_eq!(
            request.generation_config.response_schema["propertyOrdering"][2],
            "keyPoints"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        for key in ["", "   ", "PASTE_YOUR_NEW_GEMINI_KEY_HERE"] {
            let config = LlmConfig {
                api_key: key.to_string(),
                // Unroutable; a request attempt would surface as NoResponse instead.
                base_url: "http://127.0.0.1:9".to_string(),
                ..LlmConfig::default()
            };
            let err = GeminiClient::new(config)
                .generate_answer("hello")
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }
    }
}
