/// Inline spans produced by the tokenizer. Each variant carries the text
/// between its delimiters; the delimiters themselves are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    Bold(String),
    Italic(String),
    BoldItalic(String),
    Strikethrough(String),
    Code(String),
    InlineMath(String),
    BlockMath(String),
    LineBreak,
}

impl Token {
    /// The literal content of the token, without delimiters.
    pub fn content(&self) -> &str {
        match self {
            Token::Text(text)
            | Token::Bold(text)
            | Token::Italic(text)
            | Token::BoldItalic(text)
            | Token::Strikethrough(text)
            | Token::Code(text)
            | Token::InlineMath(text)
            | Token::BlockMath(text) => text,
            Token::LineBreak => "",
        }
    }
}

/// Marker of a list item line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// Nesting depth: leading columns / 4
    pub indent: usize,
    /// The original ordinal (`"3."`) for numbered items
    pub ordinal: Option<String>,
}

/// Block-level records, one per source line except for fences, tables and
/// setext headings which span several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Rule,
    CodeFence {
        language: Option<String>,
        lines: Vec<String>,
    },
    Blockquote {
        depth: usize,
        text: String,
    },
    ListItem {
        marker: ListMarker,
        text: String,
    },
    TableRows {
        lines: Vec<String>,
    },
    Paragraph {
        text: String,
        hard_break: bool,
    },
    Blank,
}
