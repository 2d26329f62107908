//! Recursive character text splitting for document preparation.
//!
//! Splits on paragraph, then line, then word boundaries, falling back to raw
//! character chunks, and re-merges small pieces into chunks of at most
//! `chunk_size` bytes with `chunk_overlap` bytes carried between chunks.

use std::collections::VecDeque;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Split `text` into chunks of at most `chunk_size` bytes.
///
/// `chunk_overlap` is clamped below `chunk_size`. Chunks are measured in
/// bytes but never split inside a UTF-8 codepoint.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let chunk_size = chunk_size.max(1);
    let chunk_overlap = chunk_overlap.min(chunk_size.saturating_sub(1));
    split_recursive(text, &SEPARATORS, chunk_size, chunk_overlap)
}

fn split_recursive(
    text: &str,
    separators: &[&str],
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    // First separator present in the text; "" always matches.
    let sep_idx = separators
        .iter()
        .position(|s| s.is_empty() || text.contains(s))
        .unwrap_or(separators.len() - 1);
    let sep = separators[sep_idx];
    let rest = &separators[sep_idx + 1..];

    let pieces: Vec<String> = if sep.is_empty() {
        char_chunks(text, chunk_size)
    } else {
        text.split(sep).map(str::to_string).collect()
    };

    let mut final_chunks = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for piece in pieces {
        if piece.len() <= chunk_size {
            pending.push(piece);
        } else {
            final_chunks.extend(merge_pieces(
                std::mem::take(&mut pending),
                sep,
                chunk_size,
                chunk_overlap,
            ));
            if rest.is_empty() {
                // Nothing left to split on; emit oversized as-is.
                final_chunks.push(piece);
            } else {
                final_chunks.extend(split_recursive(&piece, rest, chunk_size, chunk_overlap));
            }
        }
    }
    final_chunks.extend(merge_pieces(pending, sep, chunk_size, chunk_overlap));
    final_chunks
}

/// Merge adjacent small pieces into chunks, carrying `chunk_overlap` bytes of
/// trailing pieces into the next chunk.
fn merge_pieces(
    pieces: Vec<String>,
    sep: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<String> = VecDeque::new();
    let mut total = 0usize;

    for piece in pieces {
        let added = piece.len() + if window.is_empty() { 0 } else { sep.len() };
        if total + added > chunk_size && !window.is_empty() {
            push_chunk(&mut chunks, &window, sep);
            while total > chunk_overlap
                || (total + piece.len() + if window.is_empty() { 0 } else { sep.len() }
                    > chunk_size
                    && total > 0)
            {
                let popped = window.pop_front().expect("window is non-empty");
                let removed = popped.len() + if window.is_empty() { 0 } else { sep.len() };
                total = total.saturating_sub(removed);
            }
        }
        total += piece.len() + if window.is_empty() { 0 } else { sep.len() };
        window.push_back(piece);
    }
    push_chunk(&mut chunks, &window, sep);
    chunks
}

fn push_chunk(chunks: &mut Vec<String>, window: &VecDeque<String>, sep: &str) {
    let joined = window
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(sep);
    if !joined.trim().is_empty() {
        chunks.push(joined);
    }
}

/// Split into raw chunks of at most `chunk_size` bytes on char boundaries.
fn char_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        if current.len() + ch.len_utf8() > chunk_size && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text("", 100, 20).is_empty());
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(split_text("hello world", 100, 20), vec!["hello world"]);
    }

    #[test]
    fn paragraphs_split_when_too_big() {
        let chunks = split_text("aaa\n\nbbb\n\nccc", 5, 0);
        assert_eq!(chunks, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn small_paragraphs_merge() {
        let chunks = split_text("aa\n\nbb", 10, 0);
        assert_eq!(chunks, vec!["aa\n\nbb"]);
    }

    #[test]
    fn overlap_carries_trailing_piece() {
        let chunks = split_text("aaa bbb ccc", 7, 3);
        assert_eq!(chunks, vec!["aaa bbb", "bbb ccc"]);
    }

    #[test]
    fn falls_back_to_word_then_char_splitting() {
        let chunks = split_text("aaaa bbbb\n\ncc", 6, 0);
        assert_eq!(chunks, vec!["aaaa", "bbbb", "cc"]);
    }

    #[test]
    fn unbroken_text_splits_at_char_level() {
        let chunks = split_text("abcdefghij", 4, 0);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn chunks_respect_size_limit() {
        let text = "I have a dream that one day this nation will rise up and live out \
                    the true meaning of its creed.\n\nWe hold these truths to be self-evident, \
                    that all men are created equal.";
        for chunk in split_text(text, 40, 10) {
            assert!(chunk.len() <= 40, "chunk too big: {chunk:?}");
        }
    }

    #[test]
    fn multibyte_text_never_panics() {
        let text = "\u{1F600}".repeat(30);
        let chunks = split_text(&text, 10, 0);
        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(chunk.len() <= 10);
        }
    }
}
