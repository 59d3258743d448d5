//! Plain-text stripper.
//!
//! Removes Markdown syntax in a fixed order of passes, block-level first:
//! fence delimiters, table separators, rules and setext underlines, quote and
//! heading markers; then inline emphasis (three rounds, so up to three nested
//! levels per round), math, links and images, code spans, HTML tags,
//! escapes, pipes, and finally newline runs.
//!
//! Backslash escapes are swapped for placeholders before any other pass so
//! an escaped `\*` or `\_` is never read as a delimiter, then restored as the
//! bare character at the end.
//!
//! Every pass either shortens the text or turns a `|` into a space, so
//! repeating the whole pipeline until nothing changes terminates, and the
//! result is a fixed point: `strip(strip(x)) == strip(x)`. A restored
//! character that reads as syntax on the next run (`\*a\*` becomes `*a*`)
//! is removed by that run.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::is_rule;
use crate::table::{is_separator_row, split_cells};

/// Rounds of emphasis removal inside one pipeline run.
const EMPHASIS_PASSES: usize = 3;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("strip pattern is valid")
}

static EMPHASIS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\*\*\*([^*\n]+)\*\*\*",
        r"\b___([^_\n]+)___\b",
        r"\*\*([^*\n]+)\*\*",
        r"\b__([^_\n]+)__\b",
        r"\*([^*\n]+)\*",
        r"\b_([^_\n]+)_\b",
        r"~~([^~\n]+)~~",
    ]
    .into_iter()
    .map(regex)
    .collect()
});

/// Inline unwrapping passes in order. Each keeps only the first group (or
/// nothing when the pattern has no group).
static UNWRAP: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // math
        r"\$\$([^$]+)\$\$",
        r"\$([^$\n]+)\$",
        // images before links so the `!` goes too
        r"!\[([^\]\n]*)\]\([^)\n]*\)",
        r"\[([^\]\n]*)\]\([^)\n]*\)",
        r"\[([^\]\n]+)\]\[[^\]\n]*\]",
        // footnote definitions, then references
        r"(?m)^\[\^[^\]\n]+\]:[ \t]*",
        r"\[\^[^\]\n]+\]",
        // task checkboxes keep their list marker
        r"(?m)^([ \t]*(?:[-*+]|\d+\.)[ \t]+)\[[ xX]\][ \t]*",
        // heading anchors `{#id}`
        r"[ \t]*\{#[^}\s]*\}",
        r"`([^`\n]+)`",
        // autolinks keep their target; other tags vanish
        r"<((?:https?|mailto):[^>\s]+)>",
        r"</?[A-Za-z][^>\n]*>",
    ]
    .into_iter()
    .map(regex)
    .collect()
});

/// Punctuation that a backslash escapes. Position `i` is stood in for by
/// `PLACEHOLDER_BASE + i` while the passes run.
const ESCAPABLE: &str = "\\`*_{}[]()#+-.!|~>$";

/// First of the 32 Unicode noncharacters U+FDD0..=U+FDEF, reserved for
/// internal use and dropped from input.
const PLACEHOLDER_BASE: u32 = 0xFDD0;

static ESCAPED: Lazy<Regex> = Lazy::new(|| regex(r"\\([\\`*_{}\[\]()#+\-.!|~>$])"));
static ATX_MARKER: Lazy<Regex> = Lazy::new(|| regex(r"^#{1,6}[ \t]+"));
static ATX_CLOSING: Lazy<Regex> = Lazy::new(|| regex(r"[ \t]+#+[ \t]*$"));
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| regex(r"(?m)[ \t]+$"));
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| regex(r"\n{3,}"));

/// Strip all Markdown syntax from `text`, leaving readable plain text.
pub fn strip(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = strip_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn strip_once(text: &str) -> String {
    let text = protect_escapes(&text.replace("\r\n", "\n"));
    let mut text = strip_block_markers(&text);

    for _ in 0..EMPHASIS_PASSES {
        for pattern in EMPHASIS.iter() {
            text = pattern.replace_all(&text, "${1}").into_owned();
        }
    }

    for pattern in UNWRAP.iter() {
        let replacement = if pattern.captures_len() > 1 { "${1}" } else { "" };
        text = pattern.replace_all(&text, replacement).into_owned();
    }

    let text = restore_escapes(&text).replace('|', " ");
    let text = TRAILING_WS.replace_all(&text, "");
    let text = NEWLINE_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

fn placeholder(ch: char) -> Option<char> {
    let index = ESCAPABLE.chars().position(|c| c == ch)?;
    char::from_u32(PLACEHOLDER_BASE + index as u32)
}

fn is_placeholder_range(ch: char) -> bool {
    (PLACEHOLDER_BASE..PLACEHOLDER_BASE + 32).contains(&(ch as u32))
}

/// Replace every `\<punct>` with its placeholder. Noncharacters already in
/// the input are dropped so they can't be mistaken for one.
fn protect_escapes(text: &str) -> String {
    let text: String = text.chars().filter(|&c| !is_placeholder_range(c)).collect();
    ESCAPED
        .replace_all(&text, |caps: &regex::Captures<'_>| {
            caps[1]
                .chars()
                .next()
                .and_then(placeholder)
                .map(String::from)
                .unwrap_or_else(|| caps[1].to_string())
        })
        .into_owned()
}

fn restore_escapes(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_placeholder_range(c) {
                let index = (c as u32 - PLACEHOLDER_BASE) as usize;
                ESCAPABLE.chars().nth(index).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Line-level removals. Dropped lines take their newline with them.
fn strip_block_markers(text: &str) -> String {
    let mut kept: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            continue;
        }
        if trimmed.contains('|') && is_separator_row(trimmed) {
            continue;
        }
        if is_rule(trimmed) || is_setext_underline(trimmed) {
            continue;
        }
        if trimmed.starts_with('|') {
            kept.push(split_cells(trimmed).join(" "));
            continue;
        }

        let unquoted = strip_quote_markers(line);
        if ATX_MARKER.is_match(unquoted) {
            let heading = ATX_MARKER.replace(unquoted, "");
            kept.push(ATX_CLOSING.replace(&heading, "").into_owned());
        } else {
            kept.push(unquoted.to_string());
        }
    }

    kept.join("\n")
}

fn is_setext_underline(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '=')
}

fn strip_quote_markers(line: &str) -> &str {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('>') {
        return line;
    }
    let mut rest = trimmed;
    while let Some(after) = rest.strip_prefix('>') {
        rest = after.trim_start();
    }
    rest
}
