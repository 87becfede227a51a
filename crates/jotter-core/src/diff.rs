//! Word-level diff between two plain-text strings.
//!
//! Tokenizes both inputs into alternating word and whitespace runs,
//! computes the longest common subsequence over the token sequences with
//! a dynamic-programming table, and backtracks into a minimal edit
//! script of [`DiffSegment`]s. Whitespace runs are tokens in their own
//! right, so concatenating the old-side segments (`unchanged` +
//! `removed`) reconstructs the old text exactly and the new-side
//! segments (`unchanged` + `added`) reconstruct the new text.
//!
//! Table construction is O(m·n) time and space over the token counts,
//! which is acceptable for document-sized text.

use serde::{Deserialize, Serialize};

/// Classification of a diff segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present in both inputs.
    Unchanged,
    /// Present only in the new input.
    Added,
    /// Present only in the old input.
    Removed,
}

/// A labeled run of text produced by comparing two extractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    /// Whether the run is unchanged, added, or removed.
    #[serde(rename = "type")]
    pub kind: DiffKind,
    /// The run's text, whitespace included.
    pub text: String,
}

impl DiffSegment {
    fn new(kind: DiffKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Compute a word-level diff between two texts.
///
/// Consecutive segments of the same kind are coalesced, so the output
/// never contains two adjacent segments with equal `kind`. On ties
/// during backtracking, surplus content is marked `added` rather than
/// `removed`.
///
/// Identical inputs yield a single `unchanged` segment (or no segments
/// when both are empty); an empty old text makes everything `added` and
/// an empty new text makes everything `removed`.
#[must_use]
pub fn diff_texts(old_text: &str, new_text: &str) -> Vec<DiffSegment> {
    let old_tokens = tokenize(old_text);
    let new_tokens = tokenize(new_text);
    let m = old_tokens.len();
    let n = new_tokens.len();

    // LCS table: table[i][j] = LCS length of old[..i] and new[..j]
    let mut table = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if old_tokens[i - 1] == new_tokens[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    // Backtrack from (m, n) to (0, 0), collecting the edit script in
    // reverse. Ties prefer the added path.
    let mut edits: Vec<(DiffKind, &str)> = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && old_tokens[i - 1] == new_tokens[j - 1] {
            edits.push((DiffKind::Unchanged, old_tokens[i - 1]));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || table[i][j - 1] >= table[i - 1][j]) {
            edits.push((DiffKind::Added, new_tokens[j - 1]));
            j -= 1;
        } else {
            edits.push((DiffKind::Removed, old_tokens[i - 1]));
            i -= 1;
        }
    }
    edits.reverse();

    coalesce(edits)
}

/// Split text into maximal runs of whitespace / non-whitespace.
///
/// The runs partition the input: concatenating all tokens reproduces it
/// byte for byte. Empty input produces no tokens.
fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut run_is_whitespace: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_whitespace = ch.is_whitespace();
        match run_is_whitespace {
            None => run_is_whitespace = Some(is_whitespace),
            Some(current) if current != is_whitespace => {
                tokens.push(&text[start..idx]);
                start = idx;
                run_is_whitespace = Some(is_whitespace);
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Merge consecutive segments of identical kind into one.
fn coalesce(edits: Vec<(DiffKind, &str)>) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();
    for (kind, text) in edits {
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => segments.push(DiffSegment::new(kind, text)),
        }
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Concatenation of the segments contributing to the old text.
    fn old_side(segments: &[DiffSegment]) -> String {
        segments
            .iter()
            .filter(|s| s.kind != DiffKind::Added)
            .map(|s| s.text.as_str())
            .collect()
    }

    /// Concatenation of the segments contributing to the new text.
    fn new_side(segments: &[DiffSegment]) -> String {
        segments
            .iter()
            .filter(|s| s.kind != DiffKind::Removed)
            .map(|s| s.text.as_str())
            .collect()
    }

    fn assert_round_trip(old_text: &str, new_text: &str) {
        let segments = diff_texts(old_text, new_text);
        assert_eq!(old_side(&segments), old_text, "old side must reconstruct");
        assert_eq!(new_side(&segments), new_text, "new side must reconstruct");
        // Coalescing must leave no adjacent same-kind segments
        for pair in segments.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_tokenize_alternates_runs() {
        assert_eq!(tokenize("hello  world"), vec!["hello", "  ", "world"]);
        assert_eq!(tokenize(" lead"), vec![" ", "lead"]);
        assert_eq!(tokenize("trail\n"), vec!["trail", "\n"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_partitions_input() {
        let text = "  a\tb\n\nc  ";
        let joined: String = tokenize(text).concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_identity_yields_single_unchanged() {
        let segments = diff_texts("hello world", "hello world");
        assert_eq!(
            segments,
            vec![DiffSegment::new(DiffKind::Unchanged, "hello world")]
        );
    }

    #[test]
    fn test_both_empty_yields_no_segments() {
        assert!(diff_texts("", "").is_empty());
    }

    #[test]
    fn test_empty_old_is_all_added() {
        let segments = diff_texts("", "hello world");
        assert_eq!(segments, vec![DiffSegment::new(DiffKind::Added, "hello world")]);
    }

    #[test]
    fn test_empty_new_is_all_removed() {
        let segments = diff_texts("hello world", "");
        assert_eq!(
            segments,
            vec![DiffSegment::new(DiffKind::Removed, "hello world")]
        );
    }

    #[test]
    fn test_insertion_in_middle() {
        let segments = diff_texts("hello world", "hello there world");
        assert_eq!(
            segments,
            vec![
                DiffSegment::new(DiffKind::Unchanged, "hello"),
                DiffSegment::new(DiffKind::Added, " there"),
                DiffSegment::new(DiffKind::Unchanged, " world"),
            ]
        );
    }

    #[test]
    fn test_word_replacement() {
        let segments = diff_texts("the quick brown fox", "the slow brown fox");
        assert_eq!(
            segments,
            vec![
                DiffSegment::new(DiffKind::Unchanged, "the "),
                DiffSegment::new(DiffKind::Removed, "quick"),
                DiffSegment::new(DiffKind::Added, "slow"),
                DiffSegment::new(DiffKind::Unchanged, " brown fox"),
            ]
        );
    }

    #[test]
    fn test_round_trip_mixed_edits() {
        assert_round_trip("a b c d", "a x c y");
        assert_round_trip("one\ntwo\nthree", "one\nthree\nfour");
        assert_round_trip("  padded  ", "padded");
        assert_round_trip("", "a");
        assert_round_trip("a", "");
        assert_round_trip("tabs\tand spaces", "tabs and\tspaces");
    }

    #[test]
    fn test_whitespace_changes_are_visible() {
        // A doubled space is a real edit, not noise
        let segments = diff_texts("a b", "a  b");
        assert_eq!(old_side(&segments), "a b");
        assert_eq!(new_side(&segments), "a  b");
        assert!(segments.iter().any(|s| s.kind != DiffKind::Unchanged));
    }

    #[test]
    fn test_serde_shape() {
        let segment = DiffSegment::new(DiffKind::Added, "new");
        let json = serde_json::to_string(&segment).unwrap();
        assert_eq!(json, r#"{"type":"added","text":"new"}"#);
    }
}
