//! Exporters built on the table extractor and the plain-text stripper rather
//! than on the block renderers.

pub mod csv;
pub mod json;
pub mod xml;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::block::Block;
use crate::config::Config;
use crate::parser::parse;
use crate::strip::strip;

/// The title for a document: `explicit` when non-blank, else the first
/// heading with its formatting removed, else the configured default.
pub fn resolve_title(markdown: &str, explicit: Option<&str>, config: &Config) -> String {
    if let Some(title) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    parse(markdown)
        .into_iter()
        .find_map(|block| match block {
            Block::Heading { text, .. } => Some(strip(&text)),
            _ => None,
        })
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| config.export.default_title.clone())
}

/// RFC 3339 in UTC with whole seconds, e.g. `2024-05-01T12:00:00Z`.
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
