//! CSV of every table cell. Prose is left out.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{ConvertError, Result};
use crate::table::extract_tables;

/// Render all tables in `markdown` as CSV: header row then body rows for each
/// table in document order. Every cell is quoted and rows may differ in width.
pub fn render(markdown: &str) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for table in extract_tables(markdown) {
        writer.write_record(&table.headers).map_err(csv_error)?;
        for row in &table.rows {
            writer.write_record(row).map_err(csv_error)?;
        }
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn csv_error(e: impl std::fmt::Display) -> ConvertError {
    ConvertError::Render {
        format: "csv",
        message: e.to_string(),
    }
}
