//! Structured JSON export.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::export::format_timestamp;
use crate::strip::strip;

static BLOCK_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*\n").expect("separator pattern is valid"));

/// Stripped text of the whole document plus one entry per blank-line
/// delimited block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredDocument {
    pub title: String,
    pub export_timestamp: String,
    pub content: String,
    pub structured_content: Vec<String>,
}

impl StructuredDocument {
    pub fn new(markdown: &str, title: &str, at: DateTime<Utc>) -> Self {
        let normalized = markdown.replace("\r\n", "\n");
        let structured_content = BLOCK_SEPARATOR
            .split(&normalized)
            .map(strip)
            .filter(|block| !block.is_empty())
            .collect();

        Self {
            title: title.to_string(),
            export_timestamp: format_timestamp(at),
            content: strip(&normalized),
            structured_content,
        }
    }
}

/// Pretty-printed JSON for `markdown`.
pub fn render(markdown: &str, title: &str, at: DateTime<Utc>) -> Result<String> {
    let document = StructuredDocument::new(markdown, title, at);
    serde_json::to_string_pretty(&document).map_err(|e| ConvertError::Render {
        format: "json",
        message: e.to_string(),
    })
}
