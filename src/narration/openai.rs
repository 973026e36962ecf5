// OpenAI-compatible chat completions implementation.
//
// Works against any endpoint that speaks the `/chat/completions` shape
// (OpenAI itself, or a local server exposing the same API). Replies are
// returned as plain text with markdown code fences stripped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::traits::{GenerationRequest, TextGenerator};
use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Chat-completions text generator.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f64,
    rate_limiter: RateLimiter,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, base_url: &str, model: &str, temperature: f64) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature,
            rate_limiter: RateLimiter::new(1.0),
        }
    }

    /// Build a generator from configuration. Call `Config::require_generator`
    /// first so a missing key fails with a helpful message.
    pub fn from_config(config: &Config) -> Self {
        let mut generator = Self::new(
            config.openai_api_key.clone(),
            &config.openai_base_url,
            &config.model,
            config.temperature,
        );
        generator.rate_limiter = RateLimiter::new(config.requests_per_second);
        generator
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.rate_limiter.acquire().await;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.instructions,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to call the text generation API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Text generation API returned {}: {}", status, body);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse text generation response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Text generation response contained no message")?;

        debug!(
            model = %self.model,
            prompt_chars = request.prompt.chars().count(),
            reply_chars = content.chars().count(),
            "Generated text"
        );

        Ok(strip_code_fences(&content))
    }
}

/// Remove markdown code fences from a reply.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}

// --- Chat completions request/response types ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f64,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```html\n<p>hi</p>\n```"), "<p>hi</p>");
        assert_eq!(strip_code_fences("plain reply"), "plain reply");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let generator = OpenAiGenerator::new("key".into(), "http://localhost:8080/v1/", "m", 0.5);
        assert_eq!(generator.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_response_without_content_parses() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"role": "assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
