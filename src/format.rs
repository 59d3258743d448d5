use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;

/// Every output target the converter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Rtf,
    Latex,
    Text,
    Csv,
    Sheet,
    Json,
    Xml,
    Html,
    Document,
}

impl Format {
    pub const ALL: [Format; 9] = [
        Format::Rtf,
        Format::Latex,
        Format::Text,
        Format::Csv,
        Format::Sheet,
        Format::Json,
        Format::Xml,
        Format::Html,
        Format::Document,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Rtf => "rtf",
            Format::Latex => "latex",
            Format::Text => "text",
            Format::Csv => "csv",
            Format::Sheet => "sheet",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Html => "html",
            Format::Document => "document",
        }
    }

    /// File extension used when saving, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Rtf => "rtf",
            Format::Latex => "tex",
            Format::Text => "txt",
            Format::Csv => "csv",
            Format::Sheet => "sheet.json",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Html => "html",
            Format::Document => "document.json",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Format::Rtf => "Rich Text Format",
            Format::Latex => "LaTeX source",
            Format::Text => "plain text with all Markdown removed",
            Format::Csv => "every table cell as CSV",
            Format::Sheet => "spreadsheet grid of tables and prose, as JSON",
            Format::Json => "structured JSON with title, content and blocks",
            Format::Xml => "structured XML with title, content and metadata",
            Format::Html => "HTML",
            Format::Document => "word-processor document tree, as JSON",
        }
    }
}

impl FromStr for Format {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "tex" => "latex",
            "txt" | "plain" => "text",
            "docx" => "document",
            "xlsx" => "sheet",
            other => other,
        };
        Format::ALL
            .into_iter()
            .find(|format| format.name() == alias)
            .ok_or_else(|| ConvertError::UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("rtf", Format::Rtf)]
    #[case("LaTeX", Format::Latex)]
    #[case("tex", Format::Latex)]
    #[case("txt", Format::Text)]
    #[case(" csv ", Format::Csv)]
    #[case("docx", Format::Document)]
    #[case("xlsx", Format::Sheet)]
    fn parses_names_and_aliases(#[case] input: &str, #[case] expected: Format) {
        assert_eq!(input.parse::<Format>().unwrap(), expected);
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = "pdf".parse::<Format>().unwrap_err();
        assert!(matches!(err, ConvertError::UnknownFormat(ref name) if name == "pdf"));
        assert_eq!(err.to_string(), "unknown output format 'pdf'");
    }

    #[test]
    fn every_name_round_trips() {
        for format in Format::ALL {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
    }
}
