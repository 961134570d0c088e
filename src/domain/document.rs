//! Document tree model for the publishing API's rich-text format.
//!
//! A document arrives as one flat map of nodes keyed by id. The node keyed
//! `body` lists the top-level blocks in order; inline marks (links, strong,
//! emphasis, ...) are ordinary nodes whose `start`/`end` span points anchor
//! them to offsets inside a block's content string.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A position inside a block's raw content string. `path[0]` names the block
/// that owns the content the offset points into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpanPoint {
    pub path: Vec<String>,
    pub offset: usize,
}

impl SpanPoint {
    /// The id of the block this point anchors to, when the path is non-empty.
    pub fn block_id(&self) -> Option<&str> {
        self.path.first().map(String::as_str)
    }
}

/// Known node kinds, matched exactly against the wire `type` string.
/// Anything else falls through to `Unknown` and contributes nothing to the
/// rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Body,
    Paragraph,
    Blockquote,
    Heading,
    Video,
    CodeBlock,
    List,
    ListItem,
    Link,
    Image,
    ImageFile,
    Strong,
    Emphasis,
    Subscript,
    Superscript,
    InlineCode,
    Unknown,
}

impl NodeKind {
    pub fn from_type(value: &str) -> Self {
        match value {
            "body" => NodeKind::Body,
            "paragraph" => NodeKind::Paragraph,
            "blockquote" => NodeKind::Blockquote,
            "heading" => NodeKind::Heading,
            "video" => NodeKind::Video,
            "script" => NodeKind::CodeBlock,
            "list" => NodeKind::List,
            "list-item" => NodeKind::ListItem,
            "link" => NodeKind::Link,
            "image" => NodeKind::Image,
            "image-file" => NodeKind::ImageFile,
            "strong" => NodeKind::Strong,
            "emphasis" => NodeKind::Emphasis,
            "subscript" => NodeKind::Subscript,
            "superscript" => NodeKind::Superscript,
            "code" => NodeKind::InlineCode,
            _ => NodeKind::Unknown,
        }
    }
}

/// A single node of the document tree. Attributes vary by kind; absent
/// attributes stay `None` so a sparse or partially malformed node degrades
/// instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    pub content: Option<String>,
    pub level: Option<u8>,
    pub url: Option<String>,
    pub language: Option<String>,
    pub source: Option<String>,
    pub ordered: Option<bool>,
    pub items: Option<Vec<String>>,
    #[serde(rename = "textAlign")]
    pub text_align: Option<String>,
    pub float: Option<String>,
    pub hidpi: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(rename = "imageFile")]
    pub image_file: Option<String>,
    pub start: Option<SpanPoint>,
    pub end: Option<SpanPoint>,
    /// Ordered child ids; carried by the `body` node.
    pub nodes: Option<Vec<String>>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn align(&self) -> &str {
        self.text_align.as_deref().unwrap_or("left")
    }

    /// Heading depth clamped into the range HTML defines.
    pub fn heading_level(&self) -> u8 {
        self.level.unwrap_or(1).clamp(1, 6)
    }
}

/// A parsed document: the flat node map. Map order (lexicographic by id) is
/// the scan order everywhere a "first discovered" rule applies, so a given
/// document renders identically on every run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub nodes: BTreeMap<String, Node>,
}

impl Document {
    pub const BODY_ID: &'static str = "body";

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Top-level block ids in document order; empty when the body is absent.
    pub fn body_blocks(&self) -> &[String] {
        self.nodes
            .get(Self::BODY_ID)
            .and_then(|body| body.nodes.as_deref())
            .unwrap_or(&[])
    }

    /// Marks anchored to `block_id` from either endpoint, in scan order. A
    /// mark opened in another block still matches through its `end` point.
    pub fn marks_for<'a>(&'a self, block_id: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.values().filter(move |node| {
            node.start.as_ref().and_then(SpanPoint::block_id) == Some(block_id)
                || node.end.as_ref().and_then(SpanPoint::block_id) == Some(block_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_exactly() {
        assert_eq!(NodeKind::from_type("paragraph"), NodeKind::Paragraph);
        assert_eq!(NodeKind::from_type("script"), NodeKind::CodeBlock);
        assert_eq!(NodeKind::from_type("code"), NodeKind::InlineCode);
        assert_eq!(NodeKind::from_type("list-item"), NodeKind::ListItem);
        // exact matching: a longer type name containing "paragraph" is not a paragraph
        assert_eq!(NodeKind::from_type("my-paragraph-variant"), NodeKind::Unknown);
        assert_eq!(NodeKind::from_type(""), NodeKind::Unknown);
    }

    #[test]
    fn body_blocks_empty_without_body() {
        let document = Document::default();
        assert!(document.body_blocks().is_empty());
    }

    #[test]
    fn marks_match_either_endpoint() {
        let raw = r#"{
            "nodes": {
                "p1": { "type": "paragraph", "content": "hello" },
                "m1": { "type": "strong", "start": { "path": ["p1"], "offset": 0 } },
                "m2": { "type": "link", "end": { "path": ["p1"], "offset": 2 } },
                "m3": { "type": "emphasis", "start": { "path": ["p2"], "offset": 0 } }
            }
        }"#;
        let document: Document = serde_json::from_str(raw).expect("parse");
        let matched: Vec<&str> = document
            .marks_for("p1")
            .map(|node| node.node_type.as_str())
            .collect();
        assert_eq!(matched, vec!["strong", "link"]);
    }

    #[test]
    fn sparse_nodes_parse() {
        let raw = r#"{ "nodes": { "x": { "type": "heading" } } }"#;
        let document: Document = serde_json::from_str(raw).expect("parse");
        let node = document.node("x").expect("node");
        assert_eq!(node.heading_level(), 1);
        assert_eq!(node.content(), "");
        assert_eq!(node.align(), "left");
    }
}
