//! Block traversal shared by every target format.
//!
//! [`walk`] owns the decisions that do not depend on the target: tokenizing
//! block text, joining consecutive paragraph lines, grouping list items into
//! (possibly nested) lists, and splitting table lines into header and body
//! cells. A [`Renderer`] only decides what each piece looks like.

pub mod document;
pub mod html;
pub mod latex;
pub mod rtf;

use crate::block::{Block, ListMarker, Token};
use crate::inline::tokenize;
use crate::table::{is_separator_row, split_cells};

/// How a paragraph line attaches to what came before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    /// First line of a paragraph.
    Start,
    /// Continuation of a soft-wrapped paragraph.
    Soft,
    /// The previous line ended with a hard break.
    Hard,
}

/// Tokenized cells of one pipe table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableCells {
    pub header: Option<Vec<Vec<Token>>>,
    pub rows: Vec<Vec<Vec<Token>>>,
    /// Widest row, header included.
    pub columns: usize,
}

impl TableCells {
    fn from_lines(lines: &[String]) -> Self {
        let has_header = lines.len() >= 2 && is_separator_row(&lines[1]);
        let mut rows: Vec<Vec<Vec<Token>>> = lines
            .iter()
            .filter(|line| !is_separator_row(line))
            .map(|line| split_cells(line).iter().map(|cell| tokenize(cell)).collect())
            .collect();

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let header = if has_header && !rows.is_empty() {
            Some(rows.remove(0))
        } else {
            None
        };

        TableCells {
            header,
            rows,
            columns,
        }
    }
}

/// Leaf emission for one target format.
pub trait Renderer {
    type Output;

    fn heading(&mut self, level: u8, tokens: &[Token]);

    fn rule(&mut self);

    /// Fenced code, never tokenized.
    fn code_block(&mut self, language: Option<&str>, lines: &[String]);

    fn blockquote(&mut self, depth: usize, tokens: &[Token]);

    /// A list starts at `indent`. Called before its first item.
    fn open_list(&mut self, _ordered: bool, _indent: usize) {}

    /// The list opened at `indent` is over.
    fn close_list(&mut self, _ordered: bool, _indent: usize) {}

    fn list_item(&mut self, marker: &ListMarker, tokens: &[Token]);

    fn table(&mut self, table: &TableCells);

    fn paragraph_line(&mut self, join: Join, tokens: &[Token]);

    /// Closes the paragraph started by the last `Join::Start` line.
    fn end_paragraph(&mut self);

    fn finish(self) -> Self::Output;
}

/// Drive `renderer` over `blocks` in source order.
pub fn walk<R: Renderer>(blocks: &[Block], mut renderer: R) -> R::Output {
    // Some(hard_break of the previous line) while a paragraph is open.
    let mut paragraph: Option<bool> = None;
    let mut lists: Vec<(bool, usize)> = Vec::new();

    for block in blocks {
        if !matches!(block, Block::Paragraph { .. }) && paragraph.take().is_some() {
            renderer.end_paragraph();
        }
        if !matches!(block, Block::ListItem { .. }) {
            close_lists(&mut renderer, &mut lists, None);
        }

        match block {
            Block::Heading { level, text } => renderer.heading(*level, &tokenize(text)),
            Block::Rule => renderer.rule(),
            Block::CodeFence { language, lines } => {
                renderer.code_block(language.as_deref(), lines)
            }
            Block::Blockquote { depth, text } => renderer.blockquote(*depth, &tokenize(text)),
            Block::ListItem { marker, text } => {
                close_lists(&mut renderer, &mut lists, Some(marker));
                let nested = lists
                    .last()
                    .is_none_or(|&(_, indent)| indent < marker.indent);
                if nested {
                    renderer.open_list(marker.ordered, marker.indent);
                    lists.push((marker.ordered, marker.indent));
                }
                renderer.list_item(marker, &tokenize(text));
            }
            Block::TableRows { lines } => renderer.table(&TableCells::from_lines(lines)),
            Block::Paragraph { text, hard_break } => {
                let join = match paragraph {
                    None => Join::Start,
                    Some(true) => Join::Hard,
                    Some(false) => Join::Soft,
                };
                renderer.paragraph_line(join, &tokenize(text));
                paragraph = Some(*hard_break);
            }
            Block::Blank => {}
        }
    }

    if paragraph.is_some() {
        renderer.end_paragraph();
    }
    close_lists(&mut renderer, &mut lists, None);

    renderer.finish()
}

/// Pop lists that cannot hold `next`: deeper ones, and a same-depth list of the
/// other kind. With no `next` every open list is closed.
fn close_lists<R: Renderer>(
    renderer: &mut R,
    lists: &mut Vec<(bool, usize)>,
    next: Option<&ListMarker>,
) {
    while let Some(&(ordered, indent)) = lists.last() {
        let keep = next.is_some_and(|marker| {
            indent < marker.indent || (indent == marker.indent && ordered == marker.ordered)
        });
        if keep {
            break;
        }
        renderer.close_list(ordered, indent);
        lists.pop();
    }
}
