//! Provider trait for chat completion backends.

use crate::{ApiError, CompletionRequest, CompletionResponse};
use std::future::Future;
use std::pin::Pin;

/// Trait for chat completion providers (OpenAI, Ollama, test fakes).
///
/// One request in, one response or typed failure out — no streaming and no
/// retries at this boundary. Dyn-compatible so callers can hold
/// `Arc<dyn CompletionProvider>`.
pub trait CompletionProvider: Send + Sync {
    /// Send a single completion request.
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, ApiError>> + Send + 'a>>;

    /// Provider name for logging/display (e.g., "openai").
    fn name(&self) -> &str;
}
