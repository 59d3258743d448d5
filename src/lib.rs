mod block;
mod config;
mod convert;
mod error;
mod export;
mod format;
mod inline;
mod parser;
pub mod render;
mod strip;
mod table;

pub use block::{Block, ListMarker, Token};
pub use config::{Config, NumberingMode};
pub use convert::{ConvertRequest, ConvertResponse, SaveReceipt, convert};
pub use error::{ConvertError, Result};
pub use export::json::StructuredDocument;
pub use export::resolve_title;
pub use format::Format;
pub use render::document::Document;
pub use table::{Table, extract_sheet, extract_tables};

use render::document::DocumentRenderer;
use render::latex::LatexRenderer;
use render::rtf::RtfRenderer;

/// Parse markdown text into a vector of blocks.
pub fn parse(markdown: &str) -> Vec<Block> {
    parser::parse(markdown)
}

/// Split one line of text into inline tokens.
pub fn tokenize(text: &str) -> Vec<Token> {
    inline::tokenize(text)
}

/// Convert markdown to an RTF body fragment with the compiled-in style.
pub fn markdown_to_rtf(markdown: &str) -> String {
    markdown_to_rtf_with_config(markdown, &Config::compiled_default())
}

pub fn markdown_to_rtf_with_config(markdown: &str, config: &Config) -> String {
    render::walk(&parse(markdown), RtfRenderer::new(config))
}

/// Convert markdown to a LaTeX body fragment.
pub fn markdown_to_latex(markdown: &str) -> String {
    render::walk(&parse(markdown), LatexRenderer::new())
}

/// Convert markdown to a word-processor document tree.
pub fn markdown_to_document(markdown: &str) -> Document {
    markdown_to_document_with_config(markdown, &Config::compiled_default())
}

pub fn markdown_to_document_with_config(markdown: &str, config: &Config) -> Document {
    render::walk(&parse(markdown), DocumentRenderer::new(config))
}

/// Remove all Markdown syntax, leaving plain text.
pub fn markdown_to_text(markdown: &str) -> String {
    strip::strip(markdown)
}

/// Every table in the text as quoted CSV.
pub fn markdown_to_csv(markdown: &str) -> Result<String> {
    export::csv::render(markdown)
}

/// Convert markdown to an HTML fragment.
pub fn markdown_to_html(markdown: &str) -> String {
    render::html::render(markdown)
}
