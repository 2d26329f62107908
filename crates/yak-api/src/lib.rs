//! OpenAI-compatible chat completions client for Yak.

mod client;
mod provider;

pub use client::ChatClient;
pub use provider::OpenAiProvider;
