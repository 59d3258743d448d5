//! Line-oriented block segmenter.
//!
//! Each line is classified by [`classify_line`] in a fixed priority order with
//! one line of lookahead (for setext headings). Fences and tables pull in the
//! lines they own; everything else is one block per line. Nothing here can
//! fail: a line that matches no construct is a paragraph.

use crate::block::{Block, ListMarker};

/// What a single line starts, given the line after it.
enum LineKind {
    Rule,
    FenceOpen { language: Option<String> },
    Setext { level: u8 },
    TableStart,
    Blank,
    Heading { level: u8, text: String },
    Blockquote { depth: usize, text: String },
    ListItem { marker: ListMarker, text: String },
    Paragraph { text: String, hard_break: bool },
}

/// Parse markdown text into a list of blocks
pub fn parse(markdown: &str) -> Vec<Block> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let next = lines.get(i + 1).copied();

        match classify_line(line, next) {
            LineKind::Rule => {
                blocks.push(Block::Rule);
                i += 1;
            }
            LineKind::FenceOpen { language } => {
                let mut content = Vec::new();
                i += 1;
                while i < lines.len() && !is_fence(lines[i]) {
                    content.push(lines[i].to_string());
                    i += 1;
                }
                // Skip the closing fence; an unterminated fence ends at EOF.
                i += 1;
                blocks.push(Block::CodeFence {
                    language,
                    lines: content,
                });
            }
            LineKind::Setext { level } => {
                blocks.push(Block::Heading {
                    level,
                    text: line.trim().to_string(),
                });
                i += 2;
            }
            LineKind::TableStart => {
                let mut rows = vec![line.trim().to_string()];
                i += 1;
                while i < lines.len() && lines[i].contains('|') {
                    rows.push(lines[i].trim().to_string());
                    i += 1;
                }
                blocks.push(Block::TableRows { lines: rows });
            }
            LineKind::Blank => {
                blocks.push(Block::Blank);
                i += 1;
            }
            LineKind::Heading { level, text } => {
                blocks.push(Block::Heading { level, text });
                i += 1;
            }
            LineKind::Blockquote { depth, text } => {
                blocks.push(Block::Blockquote { depth, text });
                i += 1;
            }
            LineKind::ListItem { marker, text } => {
                blocks.push(Block::ListItem { marker, text });
                i += 1;
            }
            LineKind::Paragraph { text, hard_break } => {
                blocks.push(Block::Paragraph { text, hard_break });
                i += 1;
            }
        }
    }

    tracing::debug!(lines = lines.len(), blocks = blocks.len(), "segmented document");
    blocks
}

fn classify_line(line: &str, next: Option<&str>) -> LineKind {
    let trimmed = line.trim();

    if is_rule(trimmed) {
        return LineKind::Rule;
    }
    if is_fence(line) {
        let info = trimmed.trim_start_matches('`').trim();
        return LineKind::FenceOpen {
            language: (!info.is_empty()).then(|| info.to_string()),
        };
    }
    if !trimmed.is_empty() {
        if let Some(level) = next.and_then(setext_level) {
            return LineKind::Setext { level };
        }
    }
    if trimmed.starts_with('|') {
        return LineKind::TableStart;
    }
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some((level, text)) = atx_heading(trimmed) {
        return LineKind::Heading { level, text };
    }
    if let Some((depth, text)) = blockquote(trimmed) {
        return LineKind::Blockquote { depth, text };
    }
    if let Some((marker, text)) = list_item(line) {
        return LineKind::ListItem { marker, text };
    }

    LineKind::Paragraph {
        text: trimmed.to_string(),
        hard_break: line.ends_with("  "),
    }
}

/// Three or more of the same `*`, `-` or `_`, spaces allowed between them.
pub(crate) fn is_rule(trimmed: &str) -> bool {
    let mut marks = trimmed.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '*' | '-' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

fn setext_level(underline: &str) -> Option<u8> {
    let trimmed = underline.trim();
    if trimmed.len() < 3 {
        return None;
    }
    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn atx_heading(trimmed: &str) -> Option<(u8, String)> {
    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if !(1..=4).contains(&hashes) {
        return None;
    }
    let rest = trimmed[hashes..].strip_prefix(' ')?;
    let mut text = rest.trim();

    // Optional closing sequence: `## Title ##`
    let without_closing = text.trim_end_matches('#');
    if without_closing.len() < text.len() && without_closing.ends_with(' ') {
        text = without_closing.trim_end();
    }

    Some((hashes as u8, text.to_string()))
}

fn blockquote(trimmed: &str) -> Option<(usize, String)> {
    if !trimmed.starts_with('>') {
        return None;
    }
    let mut depth = 0;
    let mut rest = trimmed;
    while let Some(after) = rest.strip_prefix('>') {
        depth += 1;
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    Some((depth, rest.trim_end().to_string()))
}

fn list_item(line: &str) -> Option<(ListMarker, String)> {
    let body = line.trim_start();
    let leading = &line[..line.len() - body.len()];
    let columns: usize = leading
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();
    let indent = columns / 4;

    let (ordered, ordinal, text) = if let Some(text) = body
        .strip_prefix("- ")
        .or_else(|| body.strip_prefix("* "))
        .or_else(|| body.strip_prefix("+ "))
    {
        (false, None, text)
    } else {
        let digits = body.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return None;
        }
        let text = body[digits..].strip_prefix(". ")?;
        (true, Some(format!("{}.", &body[..digits])), text)
    };

    Some((
        ListMarker {
            ordered,
            indent,
            ordinal,
        },
        text.trim().to_string(),
    ))
}
