//! LaTeX body renderer.
//!
//! Commands are emitted around escaped token text, never substituted into
//! it, so a `#` or `_` in the source can't break an emitted `\section`.

use crate::block::{ListMarker, Token};
use crate::config::Config;
use crate::render::{Join, Renderer, TableCells};

#[derive(Default)]
pub struct LatexRenderer {
    out: String,
}

impl LatexRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for LatexRenderer {
    type Output = String;

    fn heading(&mut self, level: u8, tokens: &[Token]) {
        let command = match level {
            1 => "section",
            2 => "subsection",
            3 => "subsubsection",
            // No sectioning command below subsubsection: plain paragraph.
            _ => {
                self.out.push_str(&format!("{}\n\n", inline(tokens)));
                return;
            }
        };
        self.out
            .push_str(&format!("\\{command}{{{}}}\n\n", inline(tokens)));
    }

    fn rule(&mut self) {
        self.out.push_str("\\noindent\\rule{\\linewidth}{0.4pt}\n\n");
    }

    fn code_block(&mut self, _language: Option<&str>, lines: &[String]) {
        self.out.push_str("\\begin{verbatim}\n");
        for line in lines {
            self.out.push_str(line);
            self.out.push('\n');
        }
        self.out.push_str("\\end{verbatim}\n\n");
    }

    fn blockquote(&mut self, depth: usize, tokens: &[Token]) {
        let depth = depth.max(1);
        self.out.push_str(&format!(
            "{}\n{}\n{}\n\n",
            "\\begin{quote}".repeat(depth),
            inline(tokens),
            "\\end{quote}".repeat(depth)
        ));
    }

    fn open_list(&mut self, ordered: bool, indent: usize) {
        self.out.push_str(&format!(
            "{}\\begin{{{}}}\n",
            "  ".repeat(indent),
            environment(ordered)
        ));
    }

    fn close_list(&mut self, ordered: bool, indent: usize) {
        self.out.push_str(&format!(
            "{}\\end{{{}}}\n",
            "  ".repeat(indent),
            environment(ordered)
        ));
        if indent == 0 {
            self.out.push('\n');
        }
    }

    fn list_item(&mut self, marker: &ListMarker, tokens: &[Token]) {
        self.out.push_str(&format!(
            "{}\\item {}\n",
            "  ".repeat(marker.indent + 1),
            inline(tokens)
        ));
    }

    fn table(&mut self, table: &TableCells) {
        if table.columns == 0 {
            return;
        }
        self.out.push_str(&format!(
            "\\begin{{tabular}}{{{}}}\n",
            "l".repeat(table.columns)
        ));
        if let Some(header) = &table.header {
            let cells: Vec<String> = (0..table.columns)
                .map(|column| {
                    let content = header.get(column).map(|c| inline(c)).unwrap_or_default();
                    format!("\\textbf{{{content}}}")
                })
                .collect();
            self.out.push_str(&format!("{} \\\\\n", cells.join(" & ")));
            self.out.push_str("\\hline\n");
        }
        for row in &table.rows {
            let cells: Vec<String> = (0..table.columns)
                .map(|column| row.get(column).map(|c| inline(c)).unwrap_or_default())
                .collect();
            self.out.push_str(&format!("{} \\\\\n", cells.join(" & ")));
        }
        self.out.push_str("\\end{tabular}\n\n");
    }

    fn paragraph_line(&mut self, join: Join, tokens: &[Token]) {
        match join {
            Join::Start => {}
            Join::Soft => self.out.push('\n'),
            Join::Hard => self.out.push_str(" \\\\\n"),
        }
        self.out.push_str(&inline(tokens));
    }

    fn end_paragraph(&mut self) {
        self.out.push_str("\n\n");
    }

    fn finish(self) -> String {
        self.out
    }
}

fn environment(ordered: bool) -> &'static str {
    if ordered { "enumerate" } else { "itemize" }
}

fn inline(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Text(text) | Token::Strikethrough(text) => out.push_str(&text_content(text)),
            Token::Bold(text) => {
                out.push_str(&format!("\\textbf{{{}}}", text_content(text)));
            }
            Token::Italic(text) => {
                out.push_str(&format!("\\textit{{{}}}", text_content(text)));
            }
            Token::BoldItalic(text) => {
                out.push_str(&format!("\\textbf{{\\textit{{{}}}}}", text_content(text)));
            }
            Token::Code(text) => out.push_str(&format!("\\texttt{{{}}}", escape(text))),
            Token::InlineMath(math) => out.push_str(&format!("\\({math}\\)")),
            Token::BlockMath(math) => out.push_str(&format!(
                "\n\\begin{{equation}}\n{}\n\\end{{equation}}\n",
                math.trim()
            )),
            Token::LineBreak => out.push_str(" \\\\\n"),
        }
    }
    out
}

/// Leftover Markdown punctuation is dropped before escaping.
fn text_content(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '*' | '#' | '`' | '|'))
        .collect();
    escape(&cleaned)
}

/// Escape LaTeX special characters.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '\\' => out.push_str("\\textbackslash{}"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap a body fragment in a standalone document with a title block.
pub fn wrap_document(body: &str, title: &str, config: &Config) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\\documentclass{{{}}}\n",
        config.latex.document_class
    ));
    for package in &config.latex.packages {
        out.push_str(&format!("\\usepackage{{{package}}}\n"));
    }
    out.push_str(&format!("\\title{{{}}}\n", escape(title)));
    out.push_str("\\begin{document}\n\\maketitle\n\n");
    out.push_str(body);
    out.push_str("\\end{document}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown_to_latex;
    use pretty_assertions::assert_eq;

    #[test]
    fn heading_and_italic() {
        let latex = markdown_to_latex("# Title\n\nSome *text*.");
        assert_eq!(latex, "\\section{Title}\n\nSome \\textit{text}.\n\n");
        assert!(!latex.contains('#'));
        assert!(!latex.contains('*'));
    }

    #[test]
    fn heading_levels() {
        assert_eq!(
            markdown_to_latex("## Two\n### Three\n#### Four"),
            "\\subsection{Two}\n\n\\subsubsection{Three}\n\nFour\n\n"
        );
    }

    #[test]
    fn specials_are_escaped_outside_commands() {
        assert_eq!(
            markdown_to_latex("**50% of R&D** costs $5 ~ a_b"),
            "\\textbf{50\\% of R\\&D} costs \\$5 \\textasciitilde{} a\\_b\n\n"
        );
    }

    #[test]
    fn inline_and_block_math_are_verbatim() {
        assert_eq!(
            markdown_to_latex("where $x_1^2$ holds"),
            "where \\(x_1^2\\) holds\n\n"
        );
        assert!(markdown_to_latex("$$a_b$$").contains("\\begin{equation}\na_b\n\\end{equation}"));
    }

    #[test]
    fn code_span_is_escaped_not_cleaned() {
        assert_eq!(markdown_to_latex("`a*b_c`"), "\\texttt{a*b\\_c}\n\n");
        assert_eq!(markdown_to_latex("`a#b|c`"), "\\texttt{a\\#b|c}\n\n");
    }

    #[test]
    fn nested_lists() {
        assert_eq!(
            markdown_to_latex("- a\n    1. b\n- c"),
            concat!(
                "\\begin{itemize}\n",
                "  \\item a\n",
                "  \\begin{enumerate}\n",
                "    \\item b\n",
                "  \\end{enumerate}\n",
                "  \\item c\n",
                "\\end{itemize}\n\n",
            )
        );
    }

    #[test]
    fn blockquote_nests_by_depth() {
        assert_eq!(
            markdown_to_latex(">> deep"),
            "\\begin{quote}\\begin{quote}\ndeep\n\\end{quote}\\end{quote}\n\n"
        );
    }

    #[test]
    fn code_fence_is_verbatim() {
        assert_eq!(
            markdown_to_latex("```\n# not a heading\n```"),
            "\\begin{verbatim}\n# not a heading\n\\end{verbatim}\n\n"
        );
    }

    #[test]
    fn table_with_header_rule() {
        assert_eq!(
            markdown_to_latex("| A | B |\n|---|---|\n| 1 | 2 |"),
            concat!(
                "\\begin{tabular}{ll}\n",
                "\\textbf{A} & \\textbf{B} \\\\\n",
                "\\hline\n",
                "1 & 2 \\\\\n",
                "\\end{tabular}\n\n",
            )
        );
    }

    #[test]
    fn hard_break_and_rule() {
        assert_eq!(
            markdown_to_latex("one  \ntwo\n\n***"),
            "one \\\\\ntwo\n\n\\noindent\\rule{\\linewidth}{0.4pt}\n\n"
        );
    }

    #[test]
    fn wrapper_has_preamble_and_title() {
        let doc = wrap_document("body\n", "R&D", &Config::default());
        assert_eq!(
            doc,
            concat!(
                "\\documentclass{article}\n",
                "\\usepackage{amsmath}\n",
                "\\usepackage{hyperref}\n",
                "\\title{R\\&D}\n",
                "\\begin{document}\n",
                "\\maketitle\n\n",
                "body\n",
                "\\end{document}\n",
            )
        );
    }
}
