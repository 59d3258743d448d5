//! RTF body renderer.
//!
//! The output is a body fragment. It assumes the font and color tables laid
//! out by [`wrap_document`]:
//!
//! | index | font        | color          |
//! |-------|-------------|----------------|
//! | 0     | body        | auto           |
//! | 1     | monospace   | math           |
//! | 2     | math        | muted (quotes) |
//! | 3     |             | code shading   |
//! | 4     |             | header shading |

use crate::block::{ListMarker, Token};
use crate::config::Config;
use crate::render::{Join, Renderer, TableCells};

pub struct RtfRenderer<'a> {
    out: String,
    config: &'a Config,
}

impl<'a> RtfRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            out: String::new(),
            config,
        }
    }
}

impl Renderer for RtfRenderer<'_> {
    type Output = String;

    fn heading(&mut self, level: u8, tokens: &[Token]) {
        let style = &self.config.style;
        let (before, after) = style.heading_spacing(level);
        self.out.push_str(&format!(
            "{{\\pard\\sb{before}\\sa{after}\\b\\fs{} {}\\par}}\n",
            style.heading_size(level),
            inline(tokens)
        ));
    }

    fn rule(&mut self) {
        self.out
            .push_str("{\\pard\\brdrb\\brdrs\\brdrw10\\brsp20 \\par}\n");
    }

    fn code_block(&mut self, _language: Option<&str>, lines: &[String]) {
        let body: Vec<String> = lines.iter().map(|line| escape(line)).collect();
        self.out.push_str(&format!(
            "{{\\pard\\sa{}\\f1\\fs20\\cbpat3 {}\\par}}\n",
            self.config.rtf.paragraph_space_after,
            body.join("\\line ")
        ));
    }

    fn blockquote(&mut self, depth: usize, tokens: &[Token]) {
        self.out.push_str(&format!(
            "{{\\pard\\li{}\\sa{}\\i\\cf2 {}\\par}}\n",
            depth as u32 * self.config.style.quote_indent,
            self.config.rtf.paragraph_space_after,
            inline(tokens)
        ));
    }

    fn list_item(&mut self, marker: &ListMarker, tokens: &[Token]) {
        let indent = (marker.indent as u32 + 1) * self.config.style.list_indent;
        let glyph = match &marker.ordinal {
            Some(ordinal) => escape(ordinal),
            None => "\\u8226?".to_string(),
        };
        self.out.push_str(&format!(
            "{{\\pard\\li{indent}\\fi-360\\tx{indent}\\sa60 {glyph}\\tab {}\\par}}\n",
            inline(tokens)
        ));
    }

    fn table(&mut self, table: &TableCells) {
        if table.columns == 0 {
            return;
        }
        let width = self.config.rtf.table_width / table.columns as u32;

        if let Some(header) = &table.header {
            self.table_row(header, table.columns, width, true);
        }
        for row in &table.rows {
            self.table_row(row, table.columns, width, false);
        }
        self.out.push_str("\\pard\n");
    }

    fn paragraph_line(&mut self, join: Join, tokens: &[Token]) {
        match join {
            Join::Start => {
                let space = self.config.rtf.paragraph_space_after;
                self.out.push_str(&format!("{{\\pard\\sa{space} "));
            }
            Join::Soft => self.out.push(' '),
            Join::Hard => self.out.push_str("\\line "),
        }
        self.out.push_str(&inline(tokens));
    }

    fn end_paragraph(&mut self) {
        self.out.push_str("\\par}\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

impl RtfRenderer<'_> {
    fn table_row(&mut self, cells: &[Vec<Token>], columns: usize, width: u32, header: bool) {
        self.out.push_str("\\trowd\\trgaph108");
        for column in 1..=columns {
            if header {
                self.out.push_str("\\clcbpat4");
            }
            self.out
                .push_str(&format!("\\cellx{}", column as u32 * width));
        }
        self.out.push('\n');

        for column in 0..columns {
            let content = cells.get(column).map(|c| inline(c)).unwrap_or_default();
            if header {
                self.out
                    .push_str(&format!("\\pard\\intbl{{\\b {content}}}\\cell "));
            } else {
                self.out
                    .push_str(&format!("\\pard\\intbl {content}\\cell "));
            }
        }
        self.out.push_str("\\row\n");
    }
}

/// Render inline tokens as RTF groups.
fn inline(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => out.push_str(&escape(text)),
            Token::Bold(text) => wrap(&mut out, "\\b", text),
            Token::Italic(text) => wrap(&mut out, "\\i", text),
            Token::BoldItalic(text) => wrap(&mut out, "\\b\\i", text),
            Token::Strikethrough(text) => wrap(&mut out, "\\strike", text),
            Token::Code(text) => wrap(&mut out, "\\f1\\cb3", text),
            Token::InlineMath(text) => wrap(&mut out, "\\i\\f2\\cf1", text),
            Token::BlockMath(text) => {
                out.push_str("\\line ");
                wrap(&mut out, "\\i\\f2\\cf1", text);
                out.push_str("\\line ");
            }
            Token::LineBreak => out.push_str("\\line "),
        }
    }
    out
}

fn wrap(out: &mut String, controls: &str, text: &str) {
    out.push_str(&format!("{{{controls} {}}}", escape(text)));
}

/// Escape RTF specials; everything outside ASCII becomes `\uN?` with N the
/// signed UTF-16 code unit.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\t' => out.push_str("\\tab "),
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

/// Wrap a body fragment in an RTF document: character set, font table and the
/// color table the body's indexes refer to.
pub fn wrap_document(body: &str, config: &Config) -> String {
    let style = &config.style;
    let colors: String = [
        &style.math_color,
        &style.muted_color,
        &style.shading_color,
        &style.header_shading,
    ]
    .iter()
    .map(|hex| {
        let (r, g, b) = hex_rgb(hex);
        format!("\\red{r}\\green{g}\\blue{b};")
    })
    .collect();

    format!(
        "{{\\rtf1\\ansi\\ansicpg1252\\deff0\\uc1\n\
         {{\\fonttbl{{\\f0\\fswiss {};}}{{\\f1\\fmodern {};}}{{\\f2\\froman {};}}}}\n\
         {{\\colortbl;{colors}}}\n\
         \\fs{}\n\
         {body}}}\n",
        escape(&config.rtf.body_font),
        escape(&style.monospace_font),
        escape(&style.math_font),
        config.rtf.body_size,
    )
}

/// `"1F4E79"` to `(31, 78, 121)`. Malformed channels read as 0.
fn hex_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
            .unwrap_or(0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::markdown_to_rtf;
    use pretty_assertions::assert_eq;

    use super::{escape, hex_rgb, wrap_document};

    #[test]
    fn headings_use_decreasing_sizes() {
        assert_eq!(
            markdown_to_rtf("# One\n## Two\n#### Four"),
            "{\\pard\\sb360\\sa180\\b\\fs36 One\\par}\n\
             {\\pard\\sb280\\sa140\\b\\fs32 Two\\par}\n\
             {\\pard\\sb200\\sa100\\b\\fs24 Four\\par}\n"
        );
    }

    #[test]
    fn paragraph_with_inline_formatting() {
        assert_eq!(
            markdown_to_rtf("**bold** and *it* `x` $m$"),
            "{\\pard\\sa120 {\\b bold} and {\\i it} {\\f1\\cb3 x} {\\i\\f2\\cf1 m}\\par}\n"
        );
    }

    #[test]
    fn paragraph_lines_join_soft_and_hard() {
        assert_eq!(
            markdown_to_rtf("one\ntwo  \nthree"),
            "{\\pard\\sa120 one two\\line three\\par}\n"
        );
    }

    #[test]
    fn escapes_specials_and_unicode() {
        assert_eq!(escape("a\\b{c}"), "a\\\\b\\{c\\}");
        assert_eq!(escape("café"), "caf\\u233?");
        assert_eq!(escape("€"), "\\u8364?");
        // Outside the BMP: a surrogate pair, each unit signed.
        assert_eq!(escape("😀"), "\\u-10179?\\u-8704?");
    }

    #[test]
    fn blockquote_depth_sets_indent() {
        assert_eq!(
            markdown_to_rtf(">> quoted"),
            "{\\pard\\li720\\sa120\\i\\cf2 quoted\\par}\n"
        );
    }

    #[test]
    fn list_items_keep_ordinals() {
        assert_eq!(
            markdown_to_rtf("- a\n    7. b"),
            "{\\pard\\li720\\fi-360\\tx720\\sa60 \\u8226?\\tab a\\par}\n\
             {\\pard\\li1440\\fi-360\\tx1440\\sa60 7.\\tab b\\par}\n"
        );
    }

    #[test]
    fn code_block_is_verbatim_and_escaped() {
        assert_eq!(
            markdown_to_rtf("```\nfn x() {}\n**no**\n```"),
            "{\\pard\\sa120\\f1\\fs20\\cbpat3 fn x() \\{\\}\\line **no**\\par}\n"
        );
    }

    #[test]
    fn rule_is_bottom_border() {
        assert_eq!(
            markdown_to_rtf("***"),
            "{\\pard\\brdrb\\brdrs\\brdrw10\\brsp20 \\par}\n"
        );
    }

    #[test]
    fn table_rows_share_cell_width() {
        assert_eq!(
            markdown_to_rtf("| A | B |\n|---|---|\n| 1 | 2 |"),
            "\\trowd\\trgaph108\\clcbpat4\\cellx4500\\clcbpat4\\cellx9000\n\
             \\pard\\intbl{\\b A}\\cell \\pard\\intbl{\\b B}\\cell \\row\n\
             \\trowd\\trgaph108\\cellx4500\\cellx9000\n\
             \\pard\\intbl 1\\cell \\pard\\intbl 2\\cell \\row\n\
             \\pard\n"
        );
    }

    #[test]
    fn document_wrapper_declares_tables() {
        let doc = wrap_document("BODY", &Config::default());
        assert!(doc.starts_with("{\\rtf1\\ansi\\ansicpg1252\\deff0\\uc1\n"));
        assert!(doc.contains("{\\f1\\fmodern Courier New;}"));
        assert!(doc.contains("{\\colortbl;\\red31\\green78\\blue121;\\red102\\green102\\blue102;"));
        assert!(doc.ends_with("BODY}\n"));
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex_rgb("F2F2F2"), (242, 242, 242));
        assert_eq!(hex_rgb("#000080"), (0, 0, 128));
        assert_eq!(hex_rgb("zz"), (0, 0, 0));
    }
}
