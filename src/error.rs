//! Error types for conversion requests.
//!
//! Malformed Markdown is never an error: every construct degrades to a
//! paragraph or plain text. Errors only describe bad requests and failures at
//! the edges (reading input, writing output, delegated writers).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// No source text was supplied with the request.
    #[error("no Markdown text supplied; pass an input file, `-` for stdin, or --text")]
    MissingText,

    /// The requested output format is not registered.
    #[error("unknown output format '{0}'")]
    UnknownFormat(String),

    /// Reading input or persisting output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A delegated writer (XML, JSON) failed.
    #[error("{format} rendering failed: {message}")]
    Render {
        format: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, ConvertError>;
