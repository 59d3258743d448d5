//! HTML output through pulldown-cmark.

use pulldown_cmark::{Options, Parser, html};

/// Render `markdown` as an HTML fragment.
pub fn render(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Wrap a fragment in a minimal standalone page.
pub fn wrap_document(body: &str, title: &str) -> String {
    let escaped_title = quick_xml::escape::escape(title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{escaped_title}</title>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}
