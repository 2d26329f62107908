//! Fine-tuning dataset format validation.
//!
//! Checks each example against the chat fine-tuning schema: an object with a
//! `messages` list of role/content entries, at least one of which is an
//! assistant message. Problems are counted per category rather than failing
//! fast, so one report covers the whole dataset.

use serde_json::Value;
use std::collections::BTreeMap;

const ALLOWED_KEYS: [&str; 4] = ["role", "content", "name", "function_call"];
const ALLOWED_ROLES: [&str; 4] = ["system", "user", "assistant", "function"];

/// Per-category counts of format problems found in a dataset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    counts: BTreeMap<&'static str, usize>,
}

impl ValidationReport {
    fn record(&mut self, category: &'static str) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    pub fn is_clean(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn counts(&self) -> &BTreeMap<&'static str, usize> {
        &self.counts
    }
}

impl std::fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "No errors found");
        }
        writeln!(f, "Found errors:")?;
        for (category, count) in &self.counts {
            writeln!(f, "  {category}: {count}")?;
        }
        Ok(())
    }
}

/// Validate every example in the dataset and return the aggregate report.
pub fn validate(dataset: &[Value]) -> ValidationReport {
    let mut report = ValidationReport::default();

    for example in dataset {
        let Some(obj) = example.as_object() else {
            report.record("data_type");
            continue;
        };

        let messages = match obj.get("messages").and_then(Value::as_array) {
            Some(messages) if !messages.is_empty() => messages,
            _ => {
                report.record("missing_messages_list");
                continue;
            }
        };

        for message in messages {
            let Some(msg) = message.as_object() else {
                report.record("message_missing_key");
                continue;
            };

            if !msg.contains_key("role") || !msg.contains_key("content") {
                report.record("message_missing_key");
            }

            if msg.keys().any(|k| !ALLOWED_KEYS.contains(&k.as_str())) {
                report.record("message_unrecognized_key");
            }

            let role = msg.get("role").and_then(Value::as_str);
            if !role.is_some_and(|r| ALLOWED_ROLES.contains(&r)) {
                report.record("unrecognized_role");
            }

            // A function_call stands in for empty content, but the content
            // field itself must still be present and a string.
            let content = msg.get("content");
            let has_function_call = msg.contains_key("function_call");
            let empty = content.and_then(Value::as_str).is_none_or(str::is_empty);
            let non_string = !matches!(content, Some(Value::String(_)));
            if (empty && !has_function_call) || non_string {
                report.record("missing_content");
            }
        }

        let has_assistant = messages
            .iter()
            .any(|m| m.get("role").and_then(Value::as_str) == Some("assistant"));
        if !has_assistant {
            report.record("example_missing_assistant_message");
        }
    }

    report
}
