//! Token budget and training cost estimation for fine-tuning datasets.
//!
//! Token counts use the bytes/4 heuristic rather than a real tokenizer; the
//! result is a budget estimate, not a billing guarantee.

use serde_json::Value;

/// Fixed per-message token overhead (role, separators).
const TOKENS_PER_MESSAGE: u64 = 3;
/// Extra overhead when a message carries a `name` field.
const TOKENS_PER_NAME: u64 = 1;
/// Trailing overhead per conversation.
const TOKENS_PER_CONVERSATION: u64 = 3;

/// Tokens billed per example are capped at this.
const MAX_TOKENS_PER_EXAMPLE: u64 = 4096;
const TARGET_EPOCHS: u64 = 5;
const MIN_TARGET_EXAMPLES: u64 = 100;
const MAX_TARGET_EXAMPLES: u64 = 25_000;
const MIN_DEFAULT_EPOCHS: u64 = 1;
const MAX_DEFAULT_EPOCHS: u64 = 25;

/// Training price per 1k tokens, gpt-4o-mini fine-tuning rate.
const PRICE_PER_1K_TOKENS: f64 = 0.0080;

/// Estimated token and cost budget for a fine-tuning run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingEstimate {
    pub n_examples: usize,
    pub n_epochs: u64,
    /// Tokens charged per epoch, capped per example.
    pub billing_tokens: u64,
    /// Tokens charged across all epochs.
    pub total_training_tokens: u64,
    pub estimated_cost_usd: f64,
}

/// Estimate tokens for a text string (bytes / 4 heuristic).
fn estimate_text_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(4)
}

/// Estimate the token count of one example's message list.
pub fn num_tokens_from_messages(messages: &[Value]) -> u64 {
    let mut num_tokens = 0;
    for message in messages {
        num_tokens += TOKENS_PER_MESSAGE;
        let Some(obj) = message.as_object() else {
            continue;
        };
        for (key, value) in obj {
            match value {
                Value::String(s) => num_tokens += estimate_text_tokens(s),
                other => num_tokens += estimate_text_tokens(&other.to_string()),
            }
            if key == "name" {
                num_tokens += TOKENS_PER_NAME;
            }
        }
    }
    num_tokens + TOKENS_PER_CONVERSATION
}

/// Estimate epochs, billable tokens, and cost for the dataset.
///
/// Epochs start at the 5-epoch target and are adjusted so the run sees
/// between 100 and 25 000 examples overall, clamped to 1..=25 epochs.
pub fn estimate_training(dataset: &[Value]) -> TrainingEstimate {
    let n_examples = dataset.len();
    let n = n_examples as u64;

    let n_epochs = if n == 0 {
        TARGET_EPOCHS
    } else if n * TARGET_EPOCHS < MIN_TARGET_EXAMPLES {
        MAX_DEFAULT_EPOCHS.min(MIN_TARGET_EXAMPLES / n)
    } else if n * TARGET_EPOCHS > MAX_TARGET_EXAMPLES {
        MIN_DEFAULT_EPOCHS.max(MAX_TARGET_EXAMPLES / n)
    } else {
        TARGET_EPOCHS
    };

    let billing_tokens: u64 = dataset
        .iter()
        .map(|example| {
            let messages = example
                .get("messages")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            MAX_TOKENS_PER_EXAMPLE.min(num_tokens_from_messages(messages))
        })
        .sum();

    let total_training_tokens = n_epochs * billing_tokens;
    let estimated_cost_usd = (total_training_tokens as f64 / 1000.0) * PRICE_PER_1K_TOKENS;

    TrainingEstimate {
        n_examples,
        n_epochs,
        billing_tokens,
        total_training_tokens,
        estimated_cost_usd,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn example_with_content(content: &str) -> Value {
        json!({
            "messages": [
                {"role": "user", "content": content},
                {"role": "assistant", "content": "ok"}
            ]
        })
    }

    #[test]
    fn message_token_formula() {
        let messages = vec![json!({"role": "user", "content": "12345678"})];
        // 3 overhead + ceil(4/4) role + ceil(8/4) content + 3 trailing
        assert_eq!(num_tokens_from_messages(&messages), 3 + 1 + 2 + 3);
    }

    #[test]
    fn name_field_adds_one() {
        let without = vec![json!({"role": "user", "content": "hiya"})];
        let with = vec![json!({"role": "user", "content": "hiya", "name": "dave"})];
        assert_eq!(
            num_tokens_from_messages(&with),
            num_tokens_from_messages(&without) + estimate_text_tokens("dave") + 1
        );
    }

    #[test]
    fn small_dataset_gets_more_epochs() {
        // 10 examples * 5 target epochs = 50 < 100 -> 100/10 = 10 epochs
        let dataset: Vec<Value> = (0..10).map(|_| example_with_content("hello")).collect();
        let estimate = estimate_training(&dataset);
        assert_eq!(estimate.n_epochs, 10);
    }

    #[test]
    fn tiny_dataset_is_clamped_to_max_epochs() {
        let dataset = vec![example_with_content("hello")];
        let estimate = estimate_training(&dataset);
        assert_eq!(estimate.n_epochs, 25);
    }

    #[test]
    fn huge_dataset_gets_fewer_epochs() {
        // 10_000 examples * 5 = 50_000 > 25_000 -> 25_000/10_000 = 2 epochs
        let dataset: Vec<Value> = (0..10_000).map(|_| example_with_content("hi")).collect();
        let estimate = estimate_training(&dataset);
        assert_eq!(estimate.n_epochs, 2);
    }

    #[test]
    fn mid_sized_dataset_keeps_target_epochs() {
        let dataset: Vec<Value> = (0..200).map(|_| example_with_content("hi")).collect();
        let estimate = estimate_training(&dataset);
        assert_eq!(estimate.n_epochs, TARGET_EPOCHS);
    }

    #[test]
    fn billing_tokens_are_capped_per_example() {
        let long = "x".repeat(100_000);
        let dataset = vec![example_with_content(&long)];
        let estimate = estimate_training(&dataset);
        assert_eq!(estimate.billing_tokens, MAX_TOKENS_PER_EXAMPLE);
    }

    #[test]
    fn cost_follows_total_tokens() {
        let dataset: Vec<Value> = (0..200).map(|_| example_with_content("hello")).collect();
        let estimate = estimate_training(&dataset);
        assert_eq!(
            estimate.total_training_tokens,
            estimate.n_epochs * estimate.billing_tokens
        );
        let expected = (estimate.total_training_tokens as f64 / 1000.0) * 0.0080;
        assert!((estimate.estimated_cost_usd - expected).abs() < f64::EPSILON);
    }
}
