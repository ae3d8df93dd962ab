//! Chronicle backend trait - seam between the chronicler and the provider
//!
//! The production implementation is [`GeminiBackend`]. Test doubles live
//! alongside the trait so unit tests can script provider behavior.
//!
//! [`GeminiBackend`]: super::gemini::GeminiBackend

use async_trait::async_trait;

use crate::error::FetchError;

/// Everything the provider needs for one detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    /// Rendered user prompt
    pub prompt: String,
    /// System instruction framing the model
    pub system_instruction: String,
}

/// Trait for content providers
#[async_trait]
pub trait ChronicleBackend: Send + Sync {
    /// Issue one request and return the provider's raw text payload
    ///
    /// Implementations make exactly one attempt. Parsing and validation of the
    /// text happen in the caller.
    async fn generate(&self, request: &DetailRequest) -> Result<String, FetchError>;

    /// Backend identifier for logging/debugging
    fn name(&self) -> &'static str;

    /// Override the model at runtime (e.g., from CLI --model flag)
    fn override_model(&mut self, model: String);
}
