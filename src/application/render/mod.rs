//! Document rendering: walks the body's block list and emits one HTML
//! string per document. Rendering is pure and total; unknown kinds and
//! dangling references degrade to empty contributions.

pub mod code;
pub mod escape;
pub mod inline;
pub mod links;

use crate::domain::document::{Document, Node, NodeKind};

use self::code::{CodeFormatter, PlainFormatter};
use self::inline::render_inline;

/// Counters surfaced alongside the rendered HTML.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    /// Blocks (including list items) that produced output.
    pub blocks: u32,
    /// Blocks skipped because their kind is unknown or their id dangles.
    pub skipped_blocks: u32,
    /// Cross-references that resolved to nothing (image files, list items).
    pub dangling_references: u32,
}

/// Deterministic rendering result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutput {
    pub html: String,
    pub stats: RenderStats,
}

/// Implementations must be pure and deterministic: the same document yields
/// identical output on every call.
pub trait RenderService: Send + Sync {
    fn render(&self, document: &Document) -> RenderOutput;
}

/// Default renderer. Code blocks pass through a pluggable [`CodeFormatter`].
pub struct HtmlRenderService {
    formatter: Box<dyn CodeFormatter>,
}

impl HtmlRenderService {
    pub fn new() -> Self {
        Self {
            formatter: Box::new(PlainFormatter),
        }
    }

    pub fn with_formatter(formatter: Box<dyn CodeFormatter>) -> Self {
        Self { formatter }
    }

    fn block_html(&self, document: &Document, block_id: &str, stats: &mut RenderStats) -> String {
        let Some(node) = document.node(block_id) else {
            stats.skipped_blocks += 1;
            return String::new();
        };

        match node.kind() {
            NodeKind::Paragraph => {
                stats.blocks += 1;
                let inner = render_inline(document, block_id, node.content(), stats);
                format!(
                    "<p class=\"sc-text-block sm-align-{align} sc-paragraph prose-paragraph\"><span class=\"sc-text-property\" style=\"white-space: pre-wrap;\">{inner}</span></p>",
                    align = node.align()
                )
            }
            NodeKind::Blockquote => {
                stats.blocks += 1;
                let inner = render_inline(document, block_id, node.content(), stats);
                format!(
                    "<div class=\"sc-text-block sm-align-{align} sc-blockquote\"><span class=\"sc-text-property\" style=\"white-space: pre-wrap;\">{inner}</span></div>",
                    align = node.align()
                )
            }
            NodeKind::Heading => {
                stats.blocks += 1;
                let level = node.heading_level();
                let inner = render_inline(document, block_id, node.content(), stats);
                format!(
                    "<h{level} class=\"sc-text-block sm-align-{align} sc-heading sm-level-{level}\">{inner}</h{level}>",
                    align = node.align()
                )
            }
            NodeKind::Video => {
                stats.blocks += 1;
                format!(
                    "<sc-video src=\"{src}\"{align}></sc-video>",
                    src = node.url.as_deref().unwrap_or(""),
                    align = video_align_class(node)
                )
            }
            NodeKind::CodeBlock => {
                stats.blocks += 1;
                let language = node.language.as_deref().unwrap_or("");
                let body = self
                    .formatter
                    .format(node.source.as_deref().unwrap_or(""), language);
                format!(
                    "<pre class=\"language-{language}\"><code class=\"language-{language}\">{body}</code></pre>"
                )
            }
            NodeKind::List => self.list_html(document, node, stats),
            _ => {
                stats.skipped_blocks += 1;
                String::new()
            }
        }
    }

    fn list_html(&self, document: &Document, node: &Node, stats: &mut RenderStats) -> String {
        stats.blocks += 1;
        let (open, close) = if node.ordered.unwrap_or(false) {
            ("<ol>", "</ol>")
        } else {
            ("<ul>", "</ul>")
        };

        let mut html = String::from(open);
        for item_id in node.items.as_deref().unwrap_or(&[]) {
            let inner = match document.node(item_id) {
                Some(item) => {
                    stats.blocks += 1;
                    render_inline(document, item_id, item.content(), stats)
                }
                None => {
                    stats.dangling_references += 1;
                    String::new()
                }
            };
            html.push_str("<li>");
            html.push_str(&inner);
            html.push_str("</li>");
        }
        html.push_str(close);
        html
    }
}

/// Videos take an alignment class for center and right only; left and
/// unspecified alignment emit no class attribute.
fn video_align_class(node: &Node) -> &'static str {
    match node.text_align.as_deref() {
        Some("center") => " class=\"sc-video-center-align\"",
        Some("right") => " class=\"sc-video-right-align\"",
        _ => "",
    }
}

impl Default for HtmlRenderService {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderService for HtmlRenderService {
    fn render(&self, document: &Document) -> RenderOutput {
        let mut stats = RenderStats::default();
        let mut html = String::new();
        for block_id in document.body_blocks() {
            html.push_str(&self.block_html(document, block_id, &mut stats));
        }
        RenderOutput { html, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Document {
        serde_json::from_str(raw).expect("document parses")
    }

    fn render(raw: &str) -> RenderOutput {
        HtmlRenderService::new().render(&parse(raw))
    }

    #[test]
    fn paragraph_wraps_escaped_content() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["p1"] },
                "p1": { "type": "paragraph", "content": "Hi <b>" }
            } }"#,
        );
        assert_eq!(
            output.html,
            "<p class=\"sc-text-block sm-align-left sc-paragraph prose-paragraph\"><span class=\"sc-text-property\" style=\"white-space: pre-wrap;\">Hi &lt;b&gt;</span></p>"
        );
        assert!(!output.html.contains("<b>"));
        assert_eq!(output.stats.blocks, 1);
    }

    #[test]
    fn blockquote_uses_div_wrapper_and_alignment() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["q1"] },
                "q1": { "type": "blockquote", "textAlign": "right", "content": "quoted" }
            } }"#,
        );
        assert_eq!(
            output.html,
            "<div class=\"sc-text-block sm-align-right sc-blockquote\"><span class=\"sc-text-property\" style=\"white-space: pre-wrap;\">quoted</span></div>"
        );
    }

    #[test]
    fn heading_tag_follows_level() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["h1"] },
                "h1": { "type": "heading", "level": 3, "textAlign": "center", "content": "Title" }
            } }"#,
        );
        assert_eq!(
            output.html,
            "<h3 class=\"sc-text-block sm-align-center sc-heading sm-level-3\">Title</h3>"
        );
    }

    #[test]
    fn heading_level_clamps_when_absent_or_wild() {
        let missing = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["h1"] },
                "h1": { "type": "heading", "content": "t" }
            } }"#,
        );
        assert!(missing.html.starts_with("<h1 "));

        let wild = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["h1"] },
                "h1": { "type": "heading", "level": 9, "content": "t" }
            } }"#,
        );
        assert!(wild.html.starts_with("<h6 "));
    }

    #[test]
    fn video_alignment_class_is_center_or_right_only() {
        let centered = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["v1"] },
                "v1": { "type": "video", "url": "https://example.com/clip.mp4", "textAlign": "center" }
            } }"#,
        );
        assert_eq!(
            centered.html,
            "<sc-video src=\"https://example.com/clip.mp4\" class=\"sc-video-center-align\"></sc-video>"
        );

        let plain = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["v1"] },
                "v1": { "type": "video", "url": "https://example.com/clip.mp4", "textAlign": "left" }
            } }"#,
        );
        assert_eq!(
            plain.html,
            "<sc-video src=\"https://example.com/clip.mp4\"></sc-video>"
        );
    }

    #[test]
    fn code_block_passes_source_through() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["s1"] },
                "s1": { "type": "script", "language": "rust", "source": "fn main() {}" }
            } }"#,
        );
        assert_eq!(
            output.html,
            "<pre class=\"language-rust\"><code class=\"language-rust\">fn main() {}</code></pre>"
        );
    }

    #[test]
    fn code_formatter_seam_is_applied() {
        struct Upper;
        impl code::CodeFormatter for Upper {
            fn format(&self, source: &str, language: &str) -> String {
                format!("[{language}]{}", source.to_uppercase())
            }
        }

        let document = parse(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["s1"] },
                "s1": { "type": "script", "language": "sh", "source": "ls" }
            } }"#,
        );
        let output = HtmlRenderService::with_formatter(Box::new(Upper)).render(&document);
        assert!(output.html.contains("[sh]LS"));
    }

    #[test]
    fn ordered_list_renders_items_in_order() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["l1"] },
                "l1": { "type": "list", "ordered": true, "items": ["i1", "i2"] },
                "i1": { "type": "list-item", "content": "A" },
                "i2": { "type": "list-item", "content": "B" }
            } }"#,
        );
        assert_eq!(output.html, "<ol><li>A</li><li>B</li></ol>");
    }

    #[test]
    fn unordered_list_uses_ul() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["l1"] },
                "l1": { "type": "list", "items": ["i1"] },
                "i1": { "type": "list-item", "content": "A" }
            } }"#,
        );
        assert_eq!(output.html, "<ul><li>A</li></ul>");
    }

    #[test]
    fn list_item_marks_are_scoped_to_the_item() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["l1"] },
                "l1": { "type": "list", "items": ["i1", "i2"] },
                "i1": { "type": "list-item", "content": "plain" },
                "i2": { "type": "list-item", "content": "bold" },
                "m1": { "type": "strong", "start": { "path": ["i2"], "offset": 0 }, "end": { "path": ["i2"], "offset": 4 } }
            } }"#,
        );
        assert_eq!(
            output.html,
            "<ul><li>plain</li><li><strong>bold</strong></li></ul>"
        );
    }

    #[test]
    fn dangling_list_item_renders_empty() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["l1"] },
                "l1": { "type": "list", "items": ["gone"] }
            } }"#,
        );
        assert_eq!(output.html, "<ul><li></li></ul>");
        assert_eq!(output.stats.dangling_references, 1);
    }

    #[test]
    fn unknown_block_kind_is_skipped_silently() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["x1", "p1"] },
                "x1": { "type": "sidebar-widget", "content": "ignored" },
                "p1": { "type": "paragraph", "content": "kept" }
            } }"#,
        );
        assert!(output.html.contains("kept"));
        assert!(!output.html.contains("ignored"));
        assert_eq!(output.stats.skipped_blocks, 1);
        assert_eq!(output.stats.blocks, 1);
    }

    #[test]
    fn dangling_block_id_is_skipped_silently() {
        let output = render(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["gone"] }
            } }"#,
        );
        assert_eq!(output.html, "");
        assert_eq!(output.stats.skipped_blocks, 1);
    }

    #[test]
    fn missing_body_renders_empty() {
        let output = render(r#"{ "nodes": {} }"#);
        assert_eq!(output.html, "");
    }

    #[test]
    fn rendering_is_deterministic() {
        let document = parse(
            r#"{ "nodes": {
                "body": { "type": "body", "nodes": ["p1", "l1"] },
                "p1": { "type": "paragraph", "content": "hello world" },
                "a": { "type": "strong", "start": { "path": ["p1"], "offset": 0 }, "end": { "path": ["p1"], "offset": 5 } },
                "b": { "type": "emphasis", "start": { "path": ["p1"], "offset": 0 }, "end": { "path": ["p1"], "offset": 5 } },
                "l1": { "type": "list", "items": ["i1"] },
                "i1": { "type": "list-item", "content": "x" }
            } }"#,
        );
        let service = HtmlRenderService::new();
        let first = service.render(&document);
        let second = service.render(&document);
        assert_eq!(first, second);
        assert!(first.html.contains("<em><strong>hello</strong></em>"));
    }
}
