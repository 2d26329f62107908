//! `CompletionProvider` implementation over [`ChatClient`].

use crate::client::ChatClient;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use yak_types::{ApiError, CompletionProvider, CompletionRequest, CompletionResponse};

/// Provider for OpenAI-compatible endpoints.
///
/// The hosted API and a local Ollama server speak the same wire format, so
/// both are this one type with different base URLs and credentials.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: ChatClient,
    name: &'static str,
}

impl OpenAiProvider {
    /// Provider for the hosted OpenAI API.
    pub fn openai(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: ChatClient::new(api_key, base_url, timeout)?,
            name: "openai",
        })
    }

    /// Provider for a local Ollama server. Ollama ignores the key but the
    /// wire format requires one.
    pub fn ollama(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        Ok(Self {
            client: ChatClient::new("ollama", base_url, timeout)?,
            name: "ollama",
        })
    }
}

impl CompletionProvider for OpenAiProvider {
    fn complete<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, ApiError>> + Send + 'a>> {
        Box::pin(self.client.complete(request))
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openai_provider_name() {
        let provider =
            OpenAiProvider::openai("key", "https://api.openai.com/v1", Duration::from_secs(30))
                .unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn ollama_provider_name() {
        let provider =
            OpenAiProvider::ollama("http://localhost:11434/v1", Duration::from_secs(30)).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
