//! Shared types and error hierarchy for Yak.

pub mod error;
pub mod message;
pub mod provider;
pub mod util;

pub use error::{ApiError, ConfigError, DatasetError};
pub use message::*;
pub use provider::CompletionProvider;
pub use util::truncate_str;
