// Text generator trait: the opaque capability the narration layer calls.
//
// The analytics engine never sees this trait. Narration functions take a
// generator explicitly, so the credential it carries stays out of the engine.

use anyhow::Result;
use async_trait::async_trait;

/// A single prompt for the text generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System-level instructions (tone, role)
    pub instructions: String,
    /// The user prompt
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(instructions: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            prompt: prompt.into(),
        }
    }
}

/// Trait for generating natural-language text from a prompt. Implementations
/// are async because providers are remote and may be slow or fail.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}
