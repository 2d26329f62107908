//! One user/assistant turn against a completion provider.

use crate::types::Session;
use std::time::Instant;
use yak_types::{ApiError, CompletionProvider, CompletionRequest, Message};

/// Run a single turn: append the user message, call the provider once, and
/// append the reply on success.
///
/// On failure no assistant message is appended and the session is left with
/// exactly the user turn added — a failed call never partially mutates the
/// transcript beyond that. The provider is attempted exactly once; timeouts
/// are the client's concern and surface as ordinary [`ApiError`]s.
pub async fn exchange(
    provider: &dyn CompletionProvider,
    model: &str,
    session: &mut Session,
    user_input: &str,
) -> Result<String, ApiError> {
    session.push(Message::user(user_input));

    let request = CompletionRequest {
        model: model.to_string(),
        messages: session.messages.clone(),
    };

    let started = Instant::now();
    let response = provider.complete(&request).await?;
    let usage = response.usage;
    let content = response.into_first_content()?;

    tracing::info!(
        session_id = %session.short_id(),
        provider = provider.name(),
        model,
        elapsed_ms = started.elapsed().as_millis() as u64,
        total_tokens = usage.map(|u| u.total_tokens),
        "completion"
    );

    let reply = Message::assistant_or_placeholder(content);
    let text = reply.content.clone();
    session.push(reply);
    Ok(text)
}
