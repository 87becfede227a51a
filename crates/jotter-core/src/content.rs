//! Rich-text content tree model and plain-text extraction.
//!
//! Documents are stored as a recursive JSON tree of [`ContentNode`]s
//! (paragraphs, headings, lists, images, inline text runs with marks).
//! The tree crosses the wire as JSONB and may arrive either pre-parsed
//! or as a JSON-encoded string; both are accepted transparently.
//!
//! Conversion from JSON is best-effort per node: non-object nodes are
//! skipped, wrong-typed fields read as absent, and unknown `type` values
//! are opaque — traversed but never an error. Extraction is a pure
//! function of the tree and never fails; malformed input degrades to an
//! empty string because previews and diffs are rendering aids that must
//! not break the surrounding page.

use serde_json::Value;

/// Node types that terminate a block; extraction appends a newline after
/// their children so block boundaries survive linearization.
const BLOCK_TYPES: &[&str] = &["paragraph", "heading", "blockquote", "listItem"];

/// A single node in the rich-text content tree.
///
/// Leaf nodes carry `text`; internal nodes carry `content`. The `kind`
/// discriminant (the `type` field on the wire) is open-ended: unknown
/// kinds are traversed like any other internal node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentNode {
    /// Node type discriminant (`paragraph`, `heading`, `image`, ...).
    pub kind: Option<String>,
    /// Inline text carried by leaf runs.
    pub text: Option<String>,
    /// Ordered child nodes of an internal node.
    pub content: Option<Vec<ContentNode>>,
    /// Structural metadata (heading level, image source).
    pub attrs: Option<NodeAttrs>,
    /// Inline style marks on a text run.
    pub marks: Option<Vec<Mark>>,
}

/// Structural metadata attached to a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttrs {
    /// Heading level (1-6).
    pub level: Option<u8>,
    /// Image source reference.
    pub src: Option<String>,
    /// Image alt text.
    pub alt: Option<String>,
}

/// An inline style mark, e.g. `bold` or `italic`.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Mark type discriminant.
    pub kind: String,
}

impl ContentNode {
    /// Best-effort conversion from a JSON value.
    ///
    /// Returns `None` for non-object values. Fields of unexpected shape
    /// are read as absent rather than failing the whole node; malformed
    /// children are dropped individually.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            kind: obj.get("type").and_then(Value::as_str).map(str::to_owned),
            text: obj.get("text").and_then(Value::as_str).map(str::to_owned),
            content: obj.get("content").and_then(Value::as_array).map(|children| {
                children.iter().filter_map(Self::from_json).collect()
            }),
            attrs: obj.get("attrs").and_then(NodeAttrs::from_json),
            marks: obj.get("marks").and_then(Value::as_array).map(|marks| {
                marks.iter().filter_map(Mark::from_json).collect()
            }),
        })
    }

    /// Whether this node is a block-level element that demarcates a line.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|kind| BLOCK_TYPES.contains(&kind))
    }

    /// Whether any mark of the given kind is attached to this node.
    #[must_use]
    pub fn has_mark(&self, kind: &str) -> bool {
        self.marks
            .as_ref()
            .is_some_and(|marks| marks.iter().any(|mark| mark.kind == kind))
    }
}

impl NodeAttrs {
    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            level: obj
                .get("level")
                .and_then(Value::as_u64)
                .and_then(|level| u8::try_from(level).ok()),
            src: obj.get("src").and_then(Value::as_str).map(str::to_owned),
            alt: obj.get("alt").and_then(Value::as_str).map(str::to_owned),
        })
    }
}

impl Mark {
    fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            kind: obj.get("type").and_then(Value::as_str)?.to_owned(),
        })
    }
}

/// Parse a content value into a tree, accepting both a pre-parsed JSON
/// object and a JSON-encoded string.
///
/// Returns `None` when the value is a string that fails to parse or when
/// the root is not an object.
#[must_use]
pub fn parse_content(value: &Value) -> Option<ContentNode> {
    match value {
        Value::String(raw) => {
            let parsed: Value = serde_json::from_str(raw).ok()?;
            ContentNode::from_json(&parsed)
        }
        other => ContentNode::from_json(other),
    }
}

/// Extract plain text from a content tree.
///
/// Depth-first pre-order: leaf text is appended verbatim, and a single
/// newline follows the children of each block-level node so paragraphs
/// and list items stay on separate lines without doubling whitespace
/// inside inline runs. The result is trimmed. `None` and malformed
/// input yield an empty string.
#[must_use]
pub fn extract_text(content: Option<&Value>) -> String {
    let Some(value) = content else {
        return String::new();
    };
    let Some(root) = parse_content(value) else {
        return String::new();
    };

    let mut out = String::new();
    collect_text(&root, &mut out);
    out.trim().to_string()
}

fn collect_text(node: &ContentNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    if let Some(children) = &node.content {
        for child in children {
            collect_text(child, out);
        }
        if node.is_block() {
            out.push('\n');
        }
    }
}

/// Truncate text to a maximum number of characters, appending an
/// ellipsis when the input was cut.
#[must_use]
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    format!("{}...", truncated.trim())
}
