//! Structural preview projection over the content tree.
//!
//! Unlike full text extraction, the projector preserves element *types*
//! so compact UI surfaces (card thumbnails, hover previews) can render a
//! miniature of the document: headings keep their level, paragraphs keep
//! a bold flag, images keep their source, lists and blockquotes collapse
//! to bare markers. Traversal is bounded by `max_elements` and stops
//! entirely once the bound is reached.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::content::{ContentNode, parse_content};

/// Character budget for heading text in a preview.
pub const HEADING_PREVIEW_CHARS: usize = 60;

/// Character budget for paragraph text in a preview.
pub const PARAGRAPH_PREVIEW_CHARS: usize = 100;

/// A classified top-level block in a document preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreviewElement {
    /// A heading with its level and truncated text.
    Heading {
        text: String,
        level: u8,
    },
    /// A paragraph with truncated text and a flag for any bold run.
    Paragraph {
        text: String,
        #[serde(rename = "isBold")]
        is_bold: bool,
    },
    /// An image, identified by its source reference.
    Image { src: String },
    /// A bulleted or ordered list, collapsed to a marker.
    List,
    /// A blockquote, collapsed to a marker.
    Blockquote,
}

/// Project a content tree onto a bounded sequence of preview elements.
///
/// Traversal is depth-first pre-order, matching document order; once
/// `max_elements` elements have been collected no further nodes are
/// visited. Nodes of unrecognized type contribute nothing themselves but
/// their children are still considered. Malformed or absent content
/// yields an empty sequence, never an error.
#[must_use]
pub fn extract_structural_elements(
    content: Option<&Value>,
    max_elements: usize,
) -> Vec<PreviewElement> {
    let Some(value) = content else {
        return Vec::new();
    };
    let Some(root) = parse_content(value) else {
        return Vec::new();
    };

    let mut elements = Vec::new();
    collect_elements(&root, max_elements, &mut elements);
    elements
}

fn collect_elements(node: &ContentNode, max_elements: usize, out: &mut Vec<PreviewElement>) {
    if out.len() >= max_elements {
        return;
    }

    match (node.kind.as_deref(), &node.content) {
        (Some("heading"), Some(children)) => {
            let text = inline_text(children);
            if !text.trim().is_empty() {
                out.push(PreviewElement::Heading {
                    text: slice_chars(&text, HEADING_PREVIEW_CHARS),
                    level: node.attrs.as_ref().and_then(|attrs| attrs.level).unwrap_or(1),
                });
            }
        }
        (Some("paragraph"), Some(children)) => {
            let text = inline_text(children);
            let is_bold = children.iter().any(|child| child.has_mark("bold"));
            if !text.trim().is_empty() {
                out.push(PreviewElement::Paragraph {
                    text: slice_chars(&text, PARAGRAPH_PREVIEW_CHARS),
                    is_bold,
                });
            }
        }
        (Some("image"), _) => {
            let src = node.attrs.as_ref().and_then(|attrs| attrs.src.clone());
            if let Some(src) = src.filter(|src| !src.is_empty()) {
                out.push(PreviewElement::Image { src });
            }
        }
        (Some("bulletList") | Some("orderedList"), _) => out.push(PreviewElement::List),
        (Some("blockquote"), _) => out.push(PreviewElement::Blockquote),
        _ => {}
    }

    if let Some(children) = &node.content {
        for child in children {
            if out.len() >= max_elements {
                break;
            }
            collect_elements(child, max_elements, out);
        }
    }
}

/// Join the immediate children's text runs into one string.
fn inline_text(children: &[ContentNode]) -> String {
    children
        .iter()
        .filter_map(|child| child.text.as_deref())
        .collect()
}

/// Slice to at most `max_chars` characters, without an ellipsis.
fn slice_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(children: Value) -> Value {
        json!({ "type": "doc", "content": children })
    }

    #[test]
    fn test_none_and_malformed_yield_empty() {
        assert!(extract_structural_elements(None, 8).is_empty());
        let bad = json!("{broken");
        assert!(extract_structural_elements(Some(&bad), 8).is_empty());
    }

    #[test]
    fn test_classifies_block_kinds() {
        let value = doc(json!([
            { "type": "heading", "attrs": { "level": 2 },
              "content": [{ "type": "text", "text": "Title" }] },
            { "type": "paragraph", "content": [
                { "type": "text", "text": "Plain and " },
                { "type": "text", "text": "strong", "marks": [{ "type": "bold" }] }
            ] },
            { "type": "image", "attrs": { "src": "https://cdn.example/cat.png" } },
            { "type": "bulletList", "content": [] },
            { "type": "blockquote", "content": [] }
        ]));

        let elements = extract_structural_elements(Some(&value), 8);
        assert_eq!(
            elements,
            vec![
                PreviewElement::Heading { text: "Title".to_string(), level: 2 },
                PreviewElement::Paragraph {
                    text: "Plain and strong".to_string(),
                    is_bold: true,
                },
                PreviewElement::Image { src: "https://cdn.example/cat.png".to_string() },
                PreviewElement::List,
                PreviewElement::Blockquote,
            ]
        );
    }

    #[test]
    fn test_heading_level_defaults_to_one() {
        let value = doc(json!([
            { "type": "heading", "content": [{ "type": "text", "text": "H" }] }
        ]));
        let elements = extract_structural_elements(Some(&value), 8);
        assert_eq!(
            elements,
            vec![PreviewElement::Heading { text: "H".to_string(), level: 1 }]
        );
    }

    #[test]
    fn test_blank_blocks_are_skipped() {
        let value = doc(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "   " }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "real" }] }
        ]));
        let elements = extract_structural_elements(Some(&value), 8);
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn test_image_without_src_is_skipped() {
        let value = doc(json!([
            { "type": "image", "attrs": { "alt": "no source" } },
            { "type": "image", "attrs": { "src": "" } }
        ]));
        assert!(extract_structural_elements(Some(&value), 8).is_empty());
    }

    #[test]
    fn test_max_elements_stops_traversal() {
        let value = doc(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "one" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "two" }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": "three" }] }
        ]));
        let elements = extract_structural_elements(Some(&value), 2);
        assert_eq!(elements.len(), 2);
        assert_eq!(
            elements[1],
            PreviewElement::Paragraph { text: "two".to_string(), is_bold: false }
        );
    }

    #[test]
    fn test_zero_budget_collects_nothing() {
        let value = doc(json!([
            { "type": "paragraph", "content": [{ "type": "text", "text": "x" }] }
        ]));
        assert!(extract_structural_elements(Some(&value), 0).is_empty());
    }

    #[test]
    fn test_truncation_lengths() {
        let long = "x".repeat(200);
        let value = doc(json!([
            { "type": "heading", "content": [{ "type": "text", "text": long }] },
            { "type": "paragraph", "content": [{ "type": "text", "text": long }] }
        ]));
        let elements = extract_structural_elements(Some(&value), 8);
        match &elements[0] {
            PreviewElement::Heading { text, .. } => {
                assert_eq!(text.chars().count(), HEADING_PREVIEW_CHARS)
            }
            other => panic!("expected heading, got {other:?}"),
        }
        match &elements[1] {
            PreviewElement::Paragraph { text, .. } => {
                assert_eq!(text.chars().count(), PARAGRAPH_PREVIEW_CHARS)
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_list_children_still_counted_after_marker() {
        // A list pushes its marker, then its item paragraphs surface too
        let value = doc(json!([
            { "type": "bulletList", "content": [
                { "type": "listItem", "content": [
                    { "type": "paragraph", "content": [{ "type": "text", "text": "item" }] }
                ] }
            ] }
        ]));
        let elements = extract_structural_elements(Some(&value), 8);
        assert_eq!(
            elements,
            vec![
                PreviewElement::List,
                PreviewElement::Paragraph { text: "item".to_string(), is_bold: false },
            ]
        );
    }

    #[test]
    fn test_serde_tagging() {
        let element = PreviewElement::Paragraph { text: "p".to_string(), is_bold: true };
        let json = serde_json::to_string(&element).unwrap();
        assert_eq!(json, r#"{"type":"paragraph","text":"p","isBold":true}"#);

        let heading = PreviewElement::Heading { text: "h".to_string(), level: 3 };
        assert_eq!(
            serde_json::to_string(&heading).unwrap(),
            r#"{"type":"heading","text":"h","level":3}"#
        );
    }
}
