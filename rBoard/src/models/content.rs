//! Rich-text post content and span models.

use serde::{Deserialize, Serialize};

/// Parsed post content with structured spans.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostContent {
    /// Structured content spans.
    pub spans: Vec<Span>,
    /// Raw HTML as stored by the board.
    pub raw: String,
}

impl PostContent {
    /// Create empty content.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create content from plain text.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            spans: vec![Span::plain(&text)],
            raw: text,
        }
    }

    /// Check if content is empty.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.raw.is_empty()
    }

    /// Extract plain text from all spans.
    ///
    /// Consecutive blank lines are collapsed and the result is trimmed.
    pub fn to_plain_text(&self) -> String {
        let text: String = self.spans.iter().map(|s| s.to_plain_text()).collect();
        let mut out = String::with_capacity(text.len());
        let mut blank_run = 0;
        for line in text.trim().lines() {
            if line.trim().is_empty() {
                blank_run += 1;
                if blank_run > 1 {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(line.trim_end());
        }
        out
    }

    /// Concatenated text nodes, without line breaks or image markers.
    ///
    /// This is what length limits and emptiness checks are measured on.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            span.collect_text(&mut out);
        }
        out
    }

    /// Number of text characters.
    pub fn char_count(&self) -> usize {
        self.text_content().chars().count()
    }

    /// Check if the content has no text.
    pub fn is_blank(&self) -> bool {
        self.text_content().trim().is_empty()
    }

    /// All image sources embedded in the content.
    pub fn images(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for span in &self.spans {
            span.collect_images(&mut out);
        }
        out
    }
}

/// A span of content with specific formatting or type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The kind of span with its data.
    pub kind: SpanKind,
}

/// Different kinds of content spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpanKind {
    /// Plain text.
    Plain { text: String },
    /// Line break.
    LineBreak,
    /// Hyperlink.
    Link { href: String, spans: Vec<Span> },
    /// Inline image.
    Image { src: String },
    /// List item.
    ListItem { spans: Vec<Span> },
    /// Formatting tag such as `strong`, `em` or `h2`.
    Tagged { tag: String, spans: Vec<Span> },
}

impl Span {
    /// Create a plain text span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Plain { text: text.into() },
        }
    }

    /// Create a line break span.
    pub fn line_break() -> Self {
        Self {
            kind: SpanKind::LineBreak,
        }
    }

    /// Create a link span.
    pub fn link(href: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            kind: SpanKind::Link {
                href: href.into(),
                spans,
            },
        }
    }

    /// Create an image span.
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: SpanKind::Image { src: src.into() },
        }
    }

    /// Create a list item span.
    pub fn list_item(spans: Vec<Span>) -> Self {
        Self {
            kind: SpanKind::ListItem { spans },
        }
    }

    /// Create a tagged span.
    pub fn tagged(tag: impl Into<String>, spans: Vec<Span>) -> Self {
        Self {
            kind: SpanKind::Tagged {
                tag: tag.into(),
                spans,
            },
        }
    }

    /// Extract plain text from this span.
    pub fn to_plain_text(&self) -> String {
        match &self.kind {
            SpanKind::Plain { text } => text.clone(),
            SpanKind::LineBreak => "\n".to_owned(),
            SpanKind::Link { href, spans } => {
                let text: String = spans.iter().map(|s| s.to_plain_text()).collect();
                if text.is_empty() || text == *href {
                    href.clone()
                } else {
                    format!("{} ({})", text, href)
                }
            }
            SpanKind::Image { src } => format!("[image: {}]", src),
            SpanKind::ListItem { spans } => {
                let text: String = spans.iter().map(|s| s.to_plain_text()).collect();
                format!("- {}\n", text.trim())
            }
            SpanKind::Tagged { spans, .. } => spans.iter().map(|s| s.to_plain_text()).collect(),
        }
    }

    /// Check if this is a plain text span.
    pub fn is_plain(&self) -> bool {
        matches!(self.kind, SpanKind::Plain { .. })
    }

    /// Check if this is a tagged span with the given tag.
    pub fn is_tag(&self, tag: &str) -> bool {
        matches!(&self.kind, SpanKind::Tagged { tag: t, .. } if t == tag)
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            SpanKind::Plain { text } => out.push_str(text),
            SpanKind::Link { spans, .. }
            | SpanKind::ListItem { spans }
            | SpanKind::Tagged { spans, .. } => {
                for span in spans {
                    span.collect_text(out);
                }
            }
            SpanKind::LineBreak | SpanKind::Image { .. } => {}
        }
    }

    fn collect_images<'a>(&'a self, out: &mut Vec<&'a str>) {
        match &self.kind {
            SpanKind::Image { src } => out.push(src),
            SpanKind::Link { spans, .. }
            | SpanKind::ListItem { spans }
            | SpanKind::Tagged { spans, .. } => {
                for span in spans {
                    span.collect_images(out);
                }
            }
            SpanKind::Plain { .. } | SpanKind::LineBreak => {}
        }
    }
}
