//! Fine-tuning dataset tooling: JSONL loading, format validation, token
//! budget estimation, and document splitting.

pub mod jsonl;
pub mod split;
pub mod tokens;
pub mod validate;

pub use jsonl::{convert_json_to_jsonl, load_jsonl};
pub use split::split_text;
pub use tokens::{TrainingEstimate, estimate_training, num_tokens_from_messages};
pub use validate::{ValidationReport, validate};
