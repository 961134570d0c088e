//! Inline mark resolution: span annotations anchored to character offsets
//! become open/close tags stitched into an escaped copy of the block's raw
//! content string.

use std::collections::BTreeMap;

use crate::domain::document::{Document, Node, NodeKind};

use super::RenderStats;
use super::escape::escape_html;
use super::links::anchor_open;

/// Pending tag fragments grouped by offset. Opening fragments are prepended,
/// so at a shared offset the most recently discovered opener is emitted
/// first (outermost); closing fragments are appended and keep discovery
/// order. Fragments at one offset are emitted in list order, before the text
/// that follows the offset.
#[derive(Debug, Default)]
struct Insertions {
    by_offset: BTreeMap<usize, Vec<String>>,
}

impl Insertions {
    fn open(&mut self, offset: usize, fragment: String) {
        self.by_offset.entry(offset).or_default().insert(0, fragment);
    }

    fn close(&mut self, offset: usize, fragment: String) {
        self.by_offset.entry(offset).or_default().push(fragment);
    }

    fn is_empty(&self) -> bool {
        self.by_offset.is_empty()
    }
}

/// Renders `content` with every mark anchored to `block_id` applied and all
/// remaining text HTML-escaped. Total: malformed marks degrade to no
/// contribution, never an error.
pub(crate) fn render_inline(
    document: &Document,
    block_id: &str,
    content: &str,
    stats: &mut RenderStats,
) -> String {
    let mut insertions = Insertions::default();

    for mark in document.marks_for(block_id) {
        match mark.kind() {
            NodeKind::Link => {
                if let Some(start) = &mark.start {
                    insertions.open(start.offset, anchor_open(mark.url.as_deref().unwrap_or("")));
                }
                if let Some(end) = &mark.end {
                    insertions.close(end.offset, "</a>".to_string());
                }
            }
            NodeKind::Image => {
                if let Some(start) = &mark.start {
                    match image_fragment(mark, document) {
                        Some(fragment) => insertions.open(start.offset, fragment),
                        None => stats.dangling_references += 1,
                    }
                }
            }
            NodeKind::Strong => span_pair(&mut insertions, mark, "<strong>", "</strong>"),
            NodeKind::Emphasis => span_pair(&mut insertions, mark, "<em>", "</em>"),
            NodeKind::Subscript => span_pair(&mut insertions, mark, "<sub>", "</sub>"),
            NodeKind::Superscript => span_pair(&mut insertions, mark, "<sup>", "</sup>"),
            NodeKind::InlineCode => {
                span_pair(&mut insertions, mark, "<span class=\"sc-code\">", "</span>");
            }
            _ => {}
        }
    }

    insert_fragments(content, &insertions)
}

fn span_pair(insertions: &mut Insertions, mark: &Node, open: &str, close: &str) {
    if let Some(start) = &mark.start {
        insertions.open(start.offset, open.to_string());
    }
    if let Some(end) = &mark.end {
        insertions.close(end.offset, close.to_string());
    }
}

/// The self-closing `<img>` fragment for an image mark, built from the
/// referenced image-file node. A dangling reference yields `None`.
fn image_fragment(mark: &Node, document: &Document) -> Option<String> {
    let file = mark.image_file.as_deref().and_then(|id| document.node(id))?;
    let src = file.url.as_deref()?;

    let mut classes = String::new();
    match mark.float.as_deref() {
        Some("left") => classes.push_str("sc-inline-image-float-left "),
        Some("right") => classes.push_str("sc-inline-image-float-right "),
        _ => {}
    }
    let hidpi = mark.hidpi.as_deref() == Some("2x");
    if hidpi {
        classes.push_str("sc-inline-image-hidpi");
    }

    let mut fragment = format!("<img src=\"{src}\" class=\"{}\"", classes.trim_end());
    if hidpi {
        if let (Some(width), Some(height)) = (mark.width, mark.height) {
            fragment.push_str(&format!(" width=\"{width}\" height=\"{height}\""));
        }
    }
    fragment.push('>');
    Some(fragment)
}

/// Stitches escaped text slices and tag fragments back together. Offsets are
/// character positions; anything past the end of the content clamps to it.
fn insert_fragments(content: &str, insertions: &Insertions) -> String {
    if insertions.is_empty() {
        return escape_html(content);
    }

    let boundaries: Vec<usize> = content.char_indices().map(|(index, _)| index).collect();
    let byte_at = |offset: usize| boundaries.get(offset).copied().unwrap_or(content.len());

    let mut html = String::new();
    let mut cursor = 0usize;
    for (&offset, fragments) in &insertions.by_offset {
        let at = byte_at(offset);
        html.push_str(&escape_html(&content[cursor..at]));
        for fragment in fragments {
            html.push_str(fragment);
        }
        cursor = at;
    }
    html.push_str(&escape_html(&content[cursor..]));
    html
}
