use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub style: StyleConfig,
    pub rtf: RtfConfig,
    pub document: DocumentConfig,
    pub latex: LatexConfig,
    pub export: ExportConfig,
}

/// Sizes, indents and colors shared by the RTF and document-tree renderers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub heading_sizes: [u32; 4],
    pub heading_space_before: [u32; 4],
    pub heading_space_after: [u32; 4],
    pub list_indent: u32,
    pub quote_indent: u32,
    pub monospace_font: String,
    pub math_font: String,
    pub math_color: String,
    pub muted_color: String,
    pub shading_color: String,
    pub header_shading: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            heading_sizes: [36, 32, 28, 24],
            heading_space_before: [360, 280, 240, 200],
            heading_space_after: [180, 140, 120, 100],
            list_indent: 720,
            quote_indent: 360,
            monospace_font: "Courier New".to_string(),
            math_font: "Cambria Math".to_string(),
            math_color: "1F4E79".to_string(),
            muted_color: "666666".to_string(),
            shading_color: "F2F2F2".to_string(),
            header_shading: "D9D9D9".to_string(),
        }
    }
}

impl StyleConfig {
    /// Index into the per-level heading tables. Levels past 4 reuse the last slot.
    fn heading_slot(level: u8) -> usize {
        (level.clamp(1, 4) - 1) as usize
    }

    pub fn heading_size(&self, level: u8) -> u32 {
        self.heading_sizes[Self::heading_slot(level)]
    }

    pub fn heading_spacing(&self, level: u8) -> (u32, u32) {
        let slot = Self::heading_slot(level);
        (
            self.heading_space_before[slot],
            self.heading_space_after[slot],
        )
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RtfConfig {
    pub body_font: String,
    pub body_size: u32,
    pub paragraph_space_after: u32,
    pub table_width: u32,
}

impl Default for RtfConfig {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            body_size: 22,
            paragraph_space_after: 120,
            table_width: 9000,
        }
    }
}

/// How ordered list items map onto numbering definitions in the document tree.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum NumberingMode {
    /// One definition for the whole document; separate lists continue each other.
    #[default]
    Shared,
    /// A fresh definition for every top-level numbered list.
    PerList,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DocumentConfig {
    pub numbering: NumberingMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LatexConfig {
    pub document_class: String,
    pub packages: Vec<String>,
}

impl Default for LatexConfig {
    fn default() -> Self {
        Self {
            document_class: "article".to_string(),
            packages: vec!["amsmath".to_string(), "hyperref".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub default_title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_title: "Document".to_string(),
        }
    }
}

impl Config {
    /// The configuration compiled into the binary from `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs already rejected a malformed file.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file. Keys the file leaves out keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConvertError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn compiled_default_matches_default_impls() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn heading_sizes_clamp_to_level_four() {
        let style = StyleConfig::default();
        assert_eq!(style.heading_size(1), 36);
        assert_eq!(style.heading_size(4), 24);
        assert_eq!(style.heading_size(6), 24);
        assert_eq!(style.heading_spacing(2), (280, 140));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[document]\nnumbering = \"per-list\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.document.numbering, NumberingMode::PerList);
        assert_eq!(config.style.header_shading, "D9D9D9");
        assert_eq!(config.rtf, RtfConfig::default());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rtf\nbody_size = ").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Config { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::from_file(Path::new("/nonexistent/mdconvert.toml")).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
