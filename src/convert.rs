//! Request-level conversion: validate, render, then hand the buffer back or
//! write it to disk.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;

use crate::config::Config;
use crate::error::{ConvertError, Result};
use crate::export::{self, resolve_title};
use crate::format::Format;
use crate::render::{html, latex, rtf};
use crate::strip::strip;
use crate::table::extract_sheet;

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub text: Option<String>,
    pub format: Format,
    pub title: Option<String>,
    /// Persist to this path instead of returning the buffer.
    pub output: Option<PathBuf>,
    /// Wrap RTF, LaTeX and HTML in a complete document.
    pub standalone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertResponse {
    Inline { format: Format, content: String },
    Saved(SaveReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub path: PathBuf,
    pub bytes: usize,
    pub format: String,
}

impl fmt::Display for SaveReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Saved {} output to {} ({} bytes)",
            self.format,
            self.path.display(),
            self.bytes
        )
    }
}

/// Run one conversion request.
pub fn convert(request: ConvertRequest, config: &Config) -> Result<ConvertResponse> {
    let text = request.text.ok_or(ConvertError::MissingText)?;
    let content = render(
        &text,
        request.format,
        request.title.as_deref(),
        request.standalone,
        config,
    )?;

    let Some(path) = request.output else {
        return Ok(ConvertResponse::Inline {
            format: request.format,
            content,
        });
    };

    fs::write(&path, &content).map_err(|source| ConvertError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        format = %request.format,
        path = %path.display(),
        bytes = content.len(),
        "saved output"
    );

    Ok(ConvertResponse::Saved(SaveReceipt {
        path,
        bytes: content.len(),
        format: request.format.name().to_string(),
    }))
}

/// Render `markdown` into `format`.
pub fn render(
    markdown: &str,
    format: Format,
    title: Option<&str>,
    standalone: bool,
    config: &Config,
) -> Result<String> {
    tracing::debug!(%format, standalone, chars = markdown.len(), "rendering");

    let output = match format {
        Format::Rtf => {
            let body = crate::markdown_to_rtf_with_config(markdown, config);
            if standalone {
                rtf::wrap_document(&body, config)
            } else {
                body
            }
        }
        Format::Latex => {
            let body = crate::markdown_to_latex(markdown);
            if standalone {
                latex::wrap_document(&body, &resolve_title(markdown, title, config), config)
            } else {
                body
            }
        }
        Format::Html => {
            let body = html::render(markdown);
            if standalone {
                html::wrap_document(&body, &resolve_title(markdown, title, config))
            } else {
                body
            }
        }
        Format::Text => strip(markdown),
        Format::Csv => export::csv::render(markdown)?,
        Format::Sheet => to_json("sheet", &extract_sheet(markdown))?,
        Format::Document => to_json(
            "document",
            &crate::markdown_to_document_with_config(markdown, config),
        )?,
        Format::Json => {
            export::json::render(markdown, &resolve_title(markdown, title, config), Utc::now())?
        }
        Format::Xml => {
            export::xml::render(markdown, &resolve_title(markdown, title, config), Utc::now())?
        }
    };

    Ok(output)
}

fn to_json<T: Serialize>(format: &'static str, value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ConvertError::Render {
        format,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn request(text: Option<&str>, format: Format) -> ConvertRequest {
        ConvertRequest {
            text: text.map(str::to_string),
            format,
            title: None,
            output: None,
            standalone: false,
        }
    }

    #[test]
    fn missing_text_is_rejected() {
        let err = convert(request(None, Format::Text), &Config::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingText));
    }

    #[test]
    fn inline_response_without_output() {
        let response =
            convert(request(Some("**hi**"), Format::Text), &Config::default()).unwrap();
        assert_eq!(
            response,
            ConvertResponse::Inline {
                format: Format::Text,
                content: "hi".to_string(),
            }
        );
    }

    #[test]
    fn saves_to_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut req = request(Some("| A |\n|---|\n| 1 |"), Format::Csv);
        req.output = Some(path.clone());

        let response = convert(req, &Config::default()).unwrap();
        let ConvertResponse::Saved(receipt) = response else {
            panic!("expected a save receipt");
        };
        assert_eq!(receipt.bytes, 8);
        assert_eq!(fs::read_to_string(&path).unwrap(), "\"A\"\n\"1\"\n");
        assert_eq!(
            receipt.to_string(),
            format!("Saved csv output to {} (8 bytes)", path.display())
        );
    }

    #[test]
    fn unwritable_output_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut req = request(Some("x"), Format::Text);
        req.output = Some(dir.path().join("missing").join("out.txt"));

        let err = convert(req, &Config::default()).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }

    #[test]
    fn standalone_wraps_rtf_and_latex() {
        let config = Config::default();
        let rtf = render("text", Format::Rtf, None, true, &config).unwrap();
        assert!(rtf.starts_with("{\\rtf1"));

        let latex = render("# My Doc\n\nbody", Format::Latex, None, true, &config).unwrap();
        assert!(latex.contains("\\title{My Doc}"));
        assert!(latex.ends_with("\\end{document}\n"));
    }

    #[test]
    fn sheet_and_document_are_json() {
        let config = Config::default();
        let sheet = render("para\n\n| A |\n|---|\n| 1 |", Format::Sheet, None, false, &config)
            .unwrap();
        let grid: Vec<Vec<String>> = serde_json::from_str(&sheet).unwrap();
        assert_eq!(grid, vec![vec!["para"], vec!["A"], vec!["1"]]);

        let doc = render("# H", Format::Document, None, false, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["nodes"][0]["style"]["heading"], 1);
    }

    #[test]
    fn json_export_uses_resolved_title() {
        let json =
            render("# Found\n\ntext", Format::Json, None, false, &Config::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["title"], "Found");
    }
}
