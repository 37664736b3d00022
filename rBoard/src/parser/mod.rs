//! Parsers for board content.

pub mod html;

pub use html::{html_to_text, parse_content};
