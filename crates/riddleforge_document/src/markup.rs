//! Prose-to-markup seam.
//!
//! Rendering prose to client markup is an external collaborator; the
//! pipeline only needs a pure text-to-markup function. [`ParagraphRenderer`]
//! is the minimal default used by tests and preview tooling.

/// Pure prose-to-markup conversion.
pub trait MarkupRenderer {
    /// Renders prose text to markup.
    fn render(&self, prose: &str) -> String;
}

/// Minimal renderer: blank-line-separated paragraphs wrapped in `<p>` tags,
/// inline content passed through untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParagraphRenderer;

impl MarkupRenderer for ParagraphRenderer {
    fn render(&self, prose: &str) -> String {
        let mut out = String::new();
        for paragraph in prose.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }
            out.push_str("<p>");
            out.push_str(paragraph);
            out.push_str("</p>");
        }
        out
    }
}

impl<R: MarkupRenderer + ?Sized> MarkupRenderer for &R {
    fn render(&self, prose: &str) -> String {
        (**self).render(prose)
    }
}
