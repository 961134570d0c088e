//! Formatting seam for code blocks. A syntax highlighter plugs in here; the
//! default implementation passes source through untouched.

/// Formats code block source for embedding into the rendered output. The
/// returned markup is inserted as-is, so implementations own their escaping.
pub trait CodeFormatter: Send + Sync {
    fn format(&self, source: &str, language: &str) -> String;
}

/// Pass-through formatter.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainFormatter;

impl CodeFormatter for PlainFormatter {
    fn format(&self, source: &str, _language: &str) -> String {
        source.to_string()
    }
}
