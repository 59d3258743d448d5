//! Word-processor document tree.
//!
//! Produces a [`Document`] of paragraph and table nodes with character and
//! paragraph properties. The tree is what a `.docx` packer consumes; here it
//! is serialized to JSON.

use serde::Serialize;

use crate::block::{ListMarker, Token};
use crate::config::{Config, NumberingMode};
use crate::render::{Join, Renderer, TableCells};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    /// Numbering definitions referenced by numbered list paragraphs.
    pub numbering: Vec<NumberingDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberingDefinition {
    pub id: u32,
    pub start: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Paragraph(Paragraph),
    Table(TableNode),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParagraphStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<u8>,
    /// Left indent in twips.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_before: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space_after: Option<u32>,
    #[serde(skip_serializing_if = "is_false")]
    pub border_bottom: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListRef {
    Bullet { level: usize },
    Numbered { num_id: u32, level: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Run {
    Text(TextRun),
    Break,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Half-points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableNode {
    pub columns: usize,
    pub rows: Vec<TableRowNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRowNode {
    #[serde(skip_serializing_if = "is_false")]
    pub header: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shading: Option<String>,
    pub cells: Vec<Vec<Run>>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Which numbering definition ordered list items attach to.
///
/// In [`NumberingMode::Shared`] one definition serves the whole document, so
/// separate numbered lists continue each other's count. In
/// [`NumberingMode::PerList`] each list with no parent list gets a fresh
/// definition, whatever its indent.
#[derive(Debug, Clone)]
pub struct NumberingScope {
    mode: NumberingMode,
    definitions: Vec<NumberingDefinition>,
    current: Option<u32>,
}

impl NumberingScope {
    pub fn new(mode: NumberingMode) -> Self {
        Self {
            mode,
            definitions: Vec::new(),
            current: None,
        }
    }

    /// A list with no parent list starts.
    pub fn begin_list(&mut self) {
        if self.mode == NumberingMode::PerList {
            self.current = None;
        }
    }

    /// The definition the next numbered item belongs to, allocated on first use.
    pub fn current_id(&mut self) -> u32 {
        if let Some(id) = self.current {
            return id;
        }
        let id = self.definitions.len() as u32 + 1;
        self.definitions.push(NumberingDefinition { id, start: 1 });
        self.current = Some(id);
        id
    }

    pub fn into_definitions(self) -> Vec<NumberingDefinition> {
        self.definitions
    }
}

pub struct DocumentRenderer<'a> {
    config: &'a Config,
    nodes: Vec<Node>,
    numbering: NumberingScope,
    open_lists: usize,
    paragraph: Option<Paragraph>,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            numbering: NumberingScope::new(config.document.numbering),
            open_lists: 0,
            paragraph: None,
        }
    }

    fn push(&mut self, style: ParagraphStyle, runs: Vec<Run>) {
        self.nodes.push(Node::Paragraph(Paragraph { style, runs }));
    }

    fn runs(&self, tokens: &[Token], base: &TextRun) -> Vec<Run> {
        let style = &self.config.style;
        let mut runs = Vec::new();
        for token in tokens {
            let mut run = TextRun {
                text: token.content().to_string(),
                ..base.clone()
            };
            match token {
                Token::Text(_) => {}
                Token::Bold(_) => run.bold = true,
                Token::Italic(_) => run.italic = true,
                Token::BoldItalic(_) => {
                    run.bold = true;
                    run.italic = true;
                }
                Token::Strikethrough(_) => run.strike = true,
                Token::Code(_) => {
                    run.font = Some(style.monospace_font.clone());
                    run.shading = Some(style.shading_color.clone());
                }
                Token::InlineMath(_) | Token::BlockMath(_) => {
                    run.italic = true;
                    run.font = Some(style.math_font.clone());
                    run.color = Some(style.math_color.clone());
                }
                Token::LineBreak => {
                    runs.push(Run::Break);
                    continue;
                }
            }
            if matches!(token, Token::BlockMath(_)) {
                runs.push(Run::Break);
                runs.push(Run::Text(run));
                runs.push(Run::Break);
            } else {
                runs.push(Run::Text(run));
            }
        }
        runs
    }

    fn row(&self, cells: &[Vec<Token>], columns: usize, header: bool) -> TableRowNode {
        let base = TextRun {
            bold: header,
            ..TextRun::default()
        };
        let cells = (0..columns)
            .map(|column| {
                cells
                    .get(column)
                    .map(|tokens| self.runs(tokens, &base))
                    .unwrap_or_default()
            })
            .collect();
        TableRowNode {
            header,
            shading: header.then(|| self.config.style.header_shading.clone()),
            cells,
        }
    }
}

impl Renderer for DocumentRenderer<'_> {
    type Output = Document;

    fn heading(&mut self, level: u8, tokens: &[Token]) {
        let style = &self.config.style;
        let (before, after) = style.heading_spacing(level);
        let base = TextRun {
            bold: true,
            size: Some(style.heading_size(level)),
            ..TextRun::default()
        };
        let runs = self.runs(tokens, &base);
        self.push(
            ParagraphStyle {
                heading: Some(level),
                space_before: Some(before),
                space_after: Some(after),
                ..ParagraphStyle::default()
            },
            runs,
        );
    }

    fn rule(&mut self) {
        self.push(
            ParagraphStyle {
                border_bottom: true,
                ..ParagraphStyle::default()
            },
            Vec::new(),
        );
    }

    fn code_block(&mut self, _language: Option<&str>, lines: &[String]) {
        let font = Some(self.config.style.monospace_font.clone());
        let mut runs = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                runs.push(Run::Break);
            }
            runs.push(Run::Text(TextRun {
                text: line.clone(),
                font: font.clone(),
                ..TextRun::default()
            }));
        }
        self.push(
            ParagraphStyle {
                shading: Some(self.config.style.shading_color.clone()),
                space_after: Some(self.config.rtf.paragraph_space_after),
                ..ParagraphStyle::default()
            },
            runs,
        );
    }

    fn blockquote(&mut self, depth: usize, tokens: &[Token]) {
        let base = TextRun {
            italic: true,
            color: Some(self.config.style.muted_color.clone()),
            ..TextRun::default()
        };
        let runs = self.runs(tokens, &base);
        self.push(
            ParagraphStyle {
                indent: Some(depth as u32 * self.config.style.quote_indent),
                space_after: Some(self.config.rtf.paragraph_space_after),
                ..ParagraphStyle::default()
            },
            runs,
        );
    }

    fn open_list(&mut self, _ordered: bool, _indent: usize) {
        if self.open_lists == 0 {
            self.numbering.begin_list();
        }
        self.open_lists += 1;
    }

    fn close_list(&mut self, _ordered: bool, _indent: usize) {
        self.open_lists = self.open_lists.saturating_sub(1);
    }

    fn list_item(&mut self, marker: &ListMarker, tokens: &[Token]) {
        let list = if marker.ordered {
            ListRef::Numbered {
                num_id: self.numbering.current_id(),
                level: marker.indent,
            }
        } else {
            ListRef::Bullet {
                level: marker.indent,
            }
        };
        let runs = self.runs(tokens, &TextRun::default());
        self.push(
            ParagraphStyle {
                indent: Some((marker.indent as u32 + 1) * self.config.style.list_indent),
                list: Some(list),
                ..ParagraphStyle::default()
            },
            runs,
        );
    }

    fn table(&mut self, table: &TableCells) {
        if table.columns == 0 {
            return;
        }
        let mut rows = Vec::new();
        if let Some(header) = &table.header {
            rows.push(self.row(header, table.columns, true));
        }
        for row in &table.rows {
            rows.push(self.row(row, table.columns, false));
        }
        self.nodes.push(Node::Table(TableNode {
            columns: table.columns,
            rows,
        }));
    }

    fn paragraph_line(&mut self, join: Join, tokens: &[Token]) {
        let runs = self.runs(tokens, &TextRun::default());
        let space_after = self.config.rtf.paragraph_space_after;
        let paragraph = self.paragraph.get_or_insert_with(|| Paragraph {
            style: ParagraphStyle {
                space_after: Some(space_after),
                ..ParagraphStyle::default()
            },
            runs: Vec::new(),
        });
        match join {
            Join::Start => {}
            Join::Soft => paragraph.runs.push(Run::Text(TextRun {
                text: " ".to_string(),
                ..TextRun::default()
            })),
            Join::Hard => paragraph.runs.push(Run::Break),
        }
        paragraph.runs.extend(runs);
    }

    fn end_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            self.nodes.push(Node::Paragraph(paragraph));
        }
    }

    fn finish(self) -> Document {
        Document {
            nodes: self.nodes,
            numbering: self.numbering.into_definitions(),
        }
    }
}
