//! Inline span tokenizer.
//!
//! A single alternation is tried at each position in a fixed priority order:
//! block math, inline math, bold-italic, bold, italic, strikethrough, code,
//! explicit line break. Longer delimiters come before their prefixes so
//! `***x***` is one bold-italic span rather than `*` + `**x**` + `*`.
//! Anything the alternation does not claim is plain text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::block::Token;

static INLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
          \$\$(?P<block_math>.+?)\$\$
        | \$(?P<inline_math>[^$]+?)\$
        | \*\*\*(?P<bold_italic>.+?)\*\*\*
        | \b___(?P<bold_italic_u>.+?)___\b
        | \*\*(?P<bold>.+?)\*\*
        | \b__(?P<bold_u>.+?)__\b
        | \*(?P<italic>[^*]+?)\*
        | \b_(?P<italic_u>[^_]+?)_\b
        | ~~(?P<strike>.+?)~~
        | `(?P<code>[^`]+?)`
        | (?P<line_break><br\s*/?>)
        ",
    )
    .expect("inline pattern is valid")
});

/// Split a line of text into inline tokens.
///
/// Adjacent unmatched text is merged into a single `Text` token and empty
/// text tokens are never produced.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            tokens.push(Token::Text(text[last..whole.start()].to_string()));
        }
        tokens.push(token_from(&caps));
        last = whole.end();
    }

    if last < text.len() {
        tokens.push(Token::Text(text[last..].to_string()));
    }

    tokens
}

fn token_from(caps: &Captures<'_>) -> Token {
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());

    if let Some(math) = group("block_math") {
        Token::BlockMath(math)
    } else if let Some(math) = group("inline_math") {
        Token::InlineMath(math)
    } else if let Some(text) = group("bold_italic").or_else(|| group("bold_italic_u")) {
        Token::BoldItalic(text)
    } else if let Some(text) = group("bold").or_else(|| group("bold_u")) {
        Token::Bold(text)
    } else if let Some(text) = group("italic").or_else(|| group("italic_u")) {
        Token::Italic(text)
    } else if let Some(text) = group("strike") {
        Token::Strikethrough(text)
    } else if let Some(code) = group("code") {
        Token::Code(code)
    } else {
        Token::LineBreak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn text(s: &str) -> Token {
        Token::Text(s.to_string())
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(tokenize("just words"), vec![text("just words")]);
    }

    #[test]
    fn bold_and_italic() {
        assert_eq!(
            tokenize("**bold** and *italic*"),
            vec![
                Token::Bold("bold".to_string()),
                text(" and "),
                Token::Italic("italic".to_string()),
            ]
        );
    }

    #[test]
    fn triple_stars_are_bold_italic() {
        assert_eq!(
            tokenize("***both***"),
            vec![Token::BoldItalic("both".to_string())]
        );
        assert_eq!(
            tokenize("___both___"),
            vec![Token::BoldItalic("both".to_string())]
        );
    }

    #[test]
    fn underscore_variants() {
        assert_eq!(
            tokenize("__strong__ _soft_"),
            vec![
                Token::Bold("strong".to_string()),
                text(" "),
                Token::Italic("soft".to_string()),
            ]
        );
    }

    #[test]
    fn underscores_inside_words_stay_text() {
        assert_eq!(tokenize("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn math_takes_priority_over_emphasis() {
        assert_eq!(
            tokenize("$$a*b*c$$ and $x_1$"),
            vec![
                Token::BlockMath("a*b*c".to_string()),
                text(" and "),
                Token::InlineMath("x_1".to_string()),
            ]
        );
    }

    #[test]
    fn strikethrough_code_and_breaks() {
        assert_eq!(
            tokenize("~~gone~~ `let x` <br> end<br/>"),
            vec![
                Token::Strikethrough("gone".to_string()),
                text(" "),
                Token::Code("let x".to_string()),
                text(" "),
                Token::LineBreak,
                text(" end"),
                Token::LineBreak,
            ]
        );
    }

    #[test]
    fn unmatched_delimiters_are_text() {
        assert_eq!(tokenize("a * b"), vec![text("a * b")]);
        assert_eq!(tokenize("****"), vec![text("****")]);
        assert_eq!(tokenize("`open"), vec![text("`open")]);
    }

    #[test]
    fn nested_emphasis_is_not_resolved() {
        assert_eq!(
            tokenize("**a *b* c**"),
            vec![Token::Bold("a *b* c".to_string())]
        );
    }

    /// Put the delimiters back around a token. Only valid for inputs without
    /// underscores or `<`, where each token kind has one possible spelling.
    fn respell(token: &Token) -> String {
        match token {
            Token::Text(t) => t.clone(),
            Token::Bold(t) => format!("**{t}**"),
            Token::Italic(t) => format!("*{t}*"),
            Token::BoldItalic(t) => format!("***{t}***"),
            Token::Strikethrough(t) => format!("~~{t}~~"),
            Token::Code(t) => format!("`{t}`"),
            Token::InlineMath(t) => format!("${t}$"),
            Token::BlockMath(t) => format!("$${t}$$"),
            Token::LineBreak => unreachable!("no `<` in the strategy"),
        }
    }

    proptest! {
        #[test]
        fn tokens_partition_the_input(input in "[ab *~`$]{0,40}") {
            let tokens = tokenize(&input);
            let rebuilt: String = tokens.iter().map(respell).collect();
            prop_assert_eq!(rebuilt, input);
        }

        #[test]
        fn no_empty_text_tokens(input in "[ab *_~`$]{0,40}") {
            for token in tokenize(&input) {
                if let Token::Text(t) = token {
                    prop_assert!(!t.is_empty());
                }
            }
        }
    }
}
