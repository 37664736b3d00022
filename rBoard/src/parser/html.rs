//! HTML parser for rich-text post content.
//!
//! Handles the subset of HTML a rich-text editor produces. Anything
//! unrecognized is kept as a tagged span so its text survives.

use std::collections::HashMap;

use crate::models::{PostContent, Span};

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "ul", "ol",
];
const VOID_TAGS: &[&str] = &["br", "img", "hr", "input", "meta", "link", "source", "wbr"];
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Deepest element nesting kept as spans. Tags opened below this depth are
/// dropped and their content joins the enclosing element.
const MAX_DEPTH: usize = 256;

/// Parse HTML content into structured spans.
pub fn parse_content(html: &str) -> PostContent {
    let spans = Parser::new(html).parse();
    PostContent {
        spans,
        raw: html.to_owned(),
    }
}

/// Convert HTML to plain text.
pub fn html_to_text(html: &str) -> String {
    parse_content(html).to_plain_text()
}

/// Decode HTML entities.
fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

/// An opening tag.
#[derive(Debug)]
struct Tag {
    name: String,
    attrs: HashMap<String, String>,
    self_closing: bool,
}

/// HTML parser state machine.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
    open: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            open: Vec::new(),
        }
    }

    fn parse(&mut self) -> Vec<Span> {
        self.parse_spans(None)
    }

    fn parse_spans(&mut self, close_tag: Option<&str>) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut text_start = self.pos;

        while self.pos < self.input.len() {
            if self.current_char() != Some('<') {
                self.advance();
                continue;
            }

            let start_pos = self.pos;

            if self.rest().starts_with("<!--") {
                self.flush_text(&mut spans, text_start, start_pos);
                self.skip_comment();
                text_start = self.pos;
                continue;
            }

            if let Some(name) = self.peek_close_tag() {
                self.flush_text(&mut spans, text_start, start_pos);

                if close_tag == Some(name.as_str()) {
                    self.skip_past('>');
                    return spans;
                }
                if self.open.iter().any(|t| *t == name) {
                    // Closes an ancestor; let it unwind.
                    return spans;
                }
                self.skip_past('>');
                text_start = self.pos;
                continue;
            }

            if let Some(tag) = self.try_parse_open_tag() {
                self.flush_text(&mut spans, text_start, start_pos);
                self.handle_tag(tag, &mut spans);
                text_start = self.pos;
                continue;
            }

            // A bare '<' is text.
            self.advance();
        }

        self.flush_text(&mut spans, text_start, self.pos);
        spans
    }

    fn handle_tag(&mut self, tag: Tag, spans: &mut Vec<Span>) {
        let name = tag.name.as_str();

        if RAW_TEXT_TAGS.contains(&name) {
            self.skip_raw_text(name);
            return;
        }

        if VOID_TAGS.contains(&name) || tag.self_closing {
            match name {
                "br" | "hr" => spans.push(Span::line_break()),
                "img" => {
                    if let Some(src) = tag.attrs.get("src").filter(|s| !s.is_empty()) {
                        spans.push(Span::image(src.clone()));
                    }
                }
                _ => {}
            }
            return;
        }

        if self.open.len() >= MAX_DEPTH {
            return;
        }

        let children = self.parse_children(name);

        match name {
            "a" => {
                let href = tag.attrs.get("href").cloned().unwrap_or_default();
                if href.is_empty() {
                    spans.extend(children);
                } else {
                    spans.push(Span::link(href, children));
                }
            }
            "li" => spans.push(Span::list_item(children)),
            "ul" | "ol" => {
                spans.push(Span::tagged(name, children));
            }
            _ if BLOCK_TAGS.contains(&name) => {
                spans.push(Span::tagged(name, children));
                spans.push(Span::line_break());
            }
            _ => spans.push(Span::tagged(name, children)),
        }
    }

    fn parse_children(&mut self, name: &str) -> Vec<Span> {
        self.open.push(name.to_owned());
        let children = self.parse_spans(Some(name));
        self.open.pop();
        children
    }

    fn flush_text(&self, spans: &mut Vec<Span>, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let raw = &self.input[start..end];
        if raw.trim().is_empty() && raw.contains('\n') {
            return;
        }
        let text = unescape_html(&raw.replace(['\r', '\n'], " "));
        if !text.is_empty() {
            spans.push(Span::plain(text));
        }
    }

    fn try_parse_open_tag(&mut self) -> Option<Tag> {
        let rest = self.rest();
        let body = rest.strip_prefix('<')?;
        if !body.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let end = find_tag_end(body)?;
        let inner = &body[..end];

        let self_closing = inner.trim_end().ends_with('/');
        let inner = inner.trim_end().trim_end_matches('/');

        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        let name = inner[..name_end].to_ascii_lowercase();
        let attrs = parse_attrs(&inner[name_end..]);

        self.pos += 1 + end + 1;

        Some(Tag {
            name,
            attrs,
            self_closing,
        })
    }

    fn peek_close_tag(&self) -> Option<String> {
        let body = self.rest().strip_prefix("</")?;
        let end = body.find('>')?;
        let name = body[..end].trim().to_ascii_lowercase();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(name)
    }

    fn skip_comment(&mut self) {
        match self.rest().find("-->") {
            Some(end) => self.pos += end + 3,
            None => self.pos = self.input.len(),
        }
    }

    fn skip_raw_text(&mut self, name: &str) {
        let close = format!("</{}", name);
        let lower = self.rest().to_ascii_lowercase();
        match lower.find(&close) {
            Some(idx) => {
                self.pos += idx;
                self.skip_past('>');
            }
            None => self.pos = self.input.len(),
        }
    }

    fn skip_past(&mut self, c: char) {
        match self.rest().find(c) {
            Some(idx) => self.pos += idx + c.len_utf8(),
            None => self.pos = self.input.len(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
        }
    }
}

/// Find the closing `>` of a tag body, skipping quoted attribute values.
fn find_tag_end(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

/// Parse `name="value"` style attributes.
fn parse_attrs(text: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let inner = &after_eq[1..];
                    let end = inner.find(q).unwrap_or(inner.len());
                    rest = inner.get(end + 1..).unwrap_or("");
                    inner[..end].to_owned()
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    after_eq[..end].to_owned()
                }
            }
        } else {
            String::new()
        };

        if !name.is_empty() {
            attrs.insert(name, unescape_html(&value));
        }
        rest = rest.trim_start();
    }

    attrs
}
