use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::narration::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars (never hardcoded). The .env file is loaded
/// automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the text generation service (OPENAI_API_KEY).
    /// Only needed for narration; the analytics never read it.
    pub openai_api_key: String,
    /// Chat completions endpoint base (OPENAI_BASE_URL)
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f64,
    /// How many top posts to show and to hand to the generator
    pub top_n: usize,
    /// Pacing for text generation requests
    pub requests_per_second: f64,
    /// Display name for generated persona posts
    pub persona_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default except the API key, which is checked
    /// separately by `require_generator` when narration is requested.
    pub fn load() -> Result<Self> {
        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: env::var("RESONANCE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            temperature: parse_var("RESONANCE_TEMPERATURE", 1.0)?,
            top_n: parse_var("RESONANCE_TOP_N", 10)?,
            requests_per_second: parse_var("RESONANCE_REQUESTS_PER_SECOND", 1.0)?,
            persona_name: env::var("RESONANCE_PERSONA_NAME")
                .unwrap_or_else(|_| "AI Persona".to_string()),
        })
    }

    /// Check that the text generation API key is configured.
    /// Call this before any operation that narrates results.
    pub fn require_generator(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            anyhow::bail!(
                "OPENAI_API_KEY not set. Add it to your .env file.\n\
                 Narration (--summarize, --narrate, persona) needs a text generation API key."
            );
        }
        Ok(())
    }
}

/// Read `name` and parse it, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        _ => Ok(default),
    }
}
