//! Windowed conversation compaction.
//!
//! Replaces everything but the most recent messages with one synthetic system
//! message built from truncated snippets of the retained window. The seeded
//! system instruction gets no special treatment: once it falls outside the
//! trailing window it is gone.

use yak_types::{Message, Role};

/// Number of trailing raw messages preserved by compaction.
pub const DEFAULT_KEEP_RECENT: usize = 5;

/// Character budget for each content snippet in the summary.
const SNIPPET_BUDGET: usize = 50;

/// Label prefixed to the synthetic summary message.
const SUMMARY_PREFIX: &str = "Previous conversation summarized:";

/// Result of a compaction operation.
#[derive(Debug, Clone)]
pub struct CompactionResult {
    /// New transcript: summary message + the retained window.
    pub new_messages: Vec<Message>,
    /// How many messages fell out of the transcript.
    pub messages_removed: usize,
}

/// Compact a transcript down to a summary plus the last `keep_recent` messages.
///
/// Returns `None` when the transcript is short enough that compaction would
/// not shrink it (length <= keep_recent + 1). Compaction never increases
/// session length.
pub fn compact(messages: &[Message], keep_recent: usize) -> Option<CompactionResult> {
    if messages.len() <= keep_recent + 1 {
        return None;
    }

    let split = messages.len() - keep_recent;
    let retained = &messages[split..];

    let mut new_messages = vec![Message::system(summarize(retained))];
    new_messages.extend_from_slice(retained);

    Some(CompactionResult {
        new_messages,
        messages_removed: split,
    })
}

/// Build the summary content from snippets of the retained window.
///
/// System messages contribute no snippet.
fn summarize(retained: &[Message]) -> String {
    let snippets: Vec<String> = retained
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| {
            let snippet: String = m.content.chars().take(SNIPPET_BUDGET).collect();
            format!("{snippet}...")
        })
        .collect();
    format!("{SUMMARY_PREFIX} {}", snippets.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn_pair(i: usize) -> [Message; 2] {
        [
            Message::user(format!("Question {i}")),
            Message::assistant(format!("Answer {i}")),
        ]
    }

    fn long_transcript() -> Vec<Message> {
        let mut msgs = vec![Message::system("You are a helpful assistant.")];
        for i in 0..10 {
            msgs.extend(turn_pair(i));
        }
        msgs
    }

    #[test]
    fn short_transcript_is_left_alone() {
        let msgs = vec![
            Message::system("You are a helpful assistant."),
            Message::user("Hi"),
            Message::assistant("Hello"),
        ];
        assert!(compact(&msgs, DEFAULT_KEEP_RECENT).is_none());
    }

    #[test]
    fn boundary_length_is_not_compacted() {
        // Exactly keep_recent + 1 messages: still a no-op.
        let mut msgs = vec![Message::system("sys")];
        msgs.extend(turn_pair(0));
        msgs.extend(turn_pair(1));
        msgs.push(Message::user("one more"));
        assert_eq!(msgs.len(), DEFAULT_KEEP_RECENT + 1);
        assert!(compact(&msgs, DEFAULT_KEEP_RECENT).is_none());
    }

    #[test]
    fn compacted_length_is_keep_recent_plus_summary() {
        let msgs = long_transcript();
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        assert_eq!(result.new_messages.len(), DEFAULT_KEEP_RECENT + 1);
        assert_eq!(
            result.messages_removed,
            msgs.len() - DEFAULT_KEEP_RECENT
        );
    }

    #[test]
    fn summary_is_a_system_message_with_prefix() {
        let msgs = long_transcript();
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        let summary = &result.new_messages[0];
        assert_eq!(summary.role, Role::System);
        assert!(summary.content.starts_with("Previous conversation summarized:"));
    }

    #[test]
    fn retains_the_trailing_window_verbatim() {
        let msgs = long_transcript();
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        let tail = &msgs[msgs.len() - DEFAULT_KEEP_RECENT..];
        assert_eq!(&result.new_messages[1..], tail);
    }

    #[test]
    fn original_system_instruction_is_dropped() {
        // The seeded instruction sits at index 0 and falls outside the window.
        let msgs = long_transcript();
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        assert!(
            !result
                .new_messages
                .iter()
                .any(|m| m.content == "You are a helpful assistant.")
        );
    }

    #[test]
    fn snippets_are_truncated_with_ellipsis() {
        let mut msgs = long_transcript();
        msgs.push(Message::user("x".repeat(200)));
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        let snippet = format!("{}...", "x".repeat(50));
        assert!(result.new_messages[0].content.contains(&snippet));
        assert!(!result.new_messages[0].content.contains(&"x".repeat(51)));
    }

    #[test]
    fn snippet_budget_counts_characters_not_bytes() {
        let mut msgs = long_transcript();
        msgs.push(Message::user("é".repeat(60)));
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        let snippet = format!("{}...", "é".repeat(50));
        assert!(result.new_messages[0].content.contains(&snippet));
        assert!(!result.new_messages[0].content.contains(&"é".repeat(51)));
    }

    #[test]
    fn short_contents_still_get_ellipsis() {
        let msgs = long_transcript();
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        assert!(result.new_messages[0].content.contains("Answer 9..."));
    }

    #[test]
    fn system_messages_in_window_add_no_snippet() {
        let mut msgs = long_transcript();
        msgs.push(Message::system("mid-conversation instruction"));
        let result = compact(&msgs, DEFAULT_KEEP_RECENT).unwrap();
        // Retained raw, but absent from the summary text.
        assert!(
            result
                .new_messages
                .iter()
                .skip(1)
                .any(|m| m.content == "mid-conversation instruction")
        );
        assert!(
            !result.new_messages[0]
                .content
                .contains("mid-conversation instruction")
        );
    }

    #[test]
    fn fresh_turn_scenario_stays_unchanged() {
        // create -> user "Hi" -> assistant "Hello": 3 messages, no synthesis.
        let mut msgs = vec![Message::system("You are a helpful assistant.")];
        msgs.push(Message::user("Hi"));
        msgs.push(Message::assistant("Hello"));
        assert!(compact(&msgs, DEFAULT_KEEP_RECENT).is_none());
    }
}
