//! Markup tokenizer.
//!
//! Converts a markup string into an ordered sequence of typed tokens. The
//! format is a lightweight inline-tag language: `<span class="x">`, `</span>`,
//! `<br>`, and self-closing `<hr/>`-style tags. Tokenization is pure, total
//! and deterministic; malformed input degrades to literal text rather than
//! failing. No HTML entity decoding is performed, and tag names are
//! case-sensitive as given.

/// Tag name recognized as a dedicated line break.
pub const LINE_BREAK_TAG: &str = "br";

/// One unit of parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A verbatim run of text between tags. Never pure whitespace.
    Text(String),
    /// `<name class="x">` — opens a styled scope.
    TagOpen { name: String, class: Option<String> },
    /// `</name>` — closes the current scope (attributes ignored).
    TagClose { name: String },
    /// `<br>` — a dedicated line break.
    LineBreak,
    /// `<name/>` — zero-width tag, no scope push.
    SelfClosing { name: String },
}

/// Tokenize a markup string.
///
/// Scans left to right. A `<` with no matching `>` is treated as literal
/// text. Text runs that are entirely whitespace are dropped: they carry no
/// visible content and would otherwise render as a no-op step.
pub fn tokenize(markup: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = markup;

    while let Some(lt) = rest.find('<') {
        let (before, from_lt) = rest.split_at(lt);
        text.push_str(before);
        match from_lt.find('>') {
            Some(gt) => {
                flush_text(&mut tokens, &mut text);
                tokens.push(classify_tag(&from_lt[1..gt]));
                rest = &from_lt[gt + 1..];
            }
            None => {
                // Unterminated tag: fall back to literal text.
                text.push('<');
                rest = &from_lt[1..];
            }
        }
    }
    text.push_str(rest);
    flush_text(&mut tokens, &mut text);
    tokens
}

fn flush_text(tokens: &mut Vec<Token>, text: &mut String) {
    if !text.is_empty() {
        if !text.chars().all(char::is_whitespace) {
            tokens.push(Token::Text(std::mem::take(text)));
        } else {
            text.clear();
        }
    }
}

fn classify_tag(body: &str) -> Token {
    if let Some(close) = body.strip_prefix('/') {
        let name = first_word(close);
        return Token::TagClose { name };
    }
    if let Some(inner) = body.strip_suffix('/') {
        let name = first_word(inner);
        return Token::SelfClosing { name };
    }
    let name = first_word(body);
    if name == LINE_BREAK_TAG {
        return Token::LineBreak;
    }
    Token::TagOpen {
        class: extract_class(body),
        name,
    }
}

fn first_word(s: &str) -> String {
    s.split_whitespace().next().unwrap_or("").to_string()
}

/// Extract the value of a `class="..."` or `class='...'` fragment, quotes
/// stripped. Returns `None` when the attribute is absent or unterminated.
fn extract_class(body: &str) -> Option<String> {
    let at = body.find("class=")?;
    let value = &body[at + "class=".len()..];
    let quote = value.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let inner = &value[1..];
    let end = inner.find(quote)?;
    Some(inner[..end].to_string())
}

/// Concatenation of all text payloads, in order. Useful for asserting that
/// tokenization preserves visible content.
pub fn flatten_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_and_spans() {
        let tokens = tokenize("a<span class='x'>b</span>c");
        assert_eq!(
            tokens,
            vec![
                Token::Text("a".into()),
                Token::TagOpen {
                    name: "span".into(),
                    class: Some("x".into())
                },
                Token::Text("b".into()),
                Token::TagClose { name: "span".into() },
                Token::Text("c".into()),
            ]
        );
        assert_eq!(flatten_text(&tokens), "abc");
    }

    #[test]
    fn double_quoted_class() {
        let tokens = tokenize("<span class=\"error\">!</span>");
        assert_eq!(
            tokens[0],
            Token::TagOpen {
                name: "span".into(),
                class: Some("error".into())
            }
        );
    }

    #[test]
    fn open_tag_without_class() {
        assert_eq!(
            tokenize("<strong>hi</strong>")[0],
            Token::TagOpen {
                name: "strong".into(),
                class: None
            }
        );
    }

    #[test]
    fn line_break_and_self_closing() {
        assert_eq!(tokenize("a<br>b")[1], Token::LineBreak);
        assert_eq!(
            tokenize("a<br/>b")[1],
            Token::SelfClosing { name: "br".into() }
        );
    }

    #[test]
    fn unterminated_tag_is_literal_text() {
        let tokens = tokenize("a < b");
        assert_eq!(tokens, vec![Token::Text("a < b".into())]);
    }

    #[test]
    fn trailing_unterminated_tag() {
        assert_eq!(tokenize("oops<span"), vec![Token::Text("oops<span".into())]);
    }

    #[test]
    fn whitespace_only_runs_are_dropped() {
        let tokens = tokenize("<span class='a'>x</span>\n   <span class='b'>y</span>");
        assert!(!tokens.iter().any(|t| matches!(t, Token::Text(s) if s.trim().is_empty())));
        assert_eq!(flatten_text(&tokens), "xy");
    }

    #[test]
    fn interior_whitespace_is_verbatim() {
        let tokens = tokenize("hello  world<br>next  line");
        assert_eq!(tokens[0], Token::Text("hello  world".into()));
        assert_eq!(tokens[2], Token::Text("next  line".into()));
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn close_tag_attributes_ignored() {
        assert_eq!(
            tokenize("</span class='x'>")[0],
            Token::TagClose { name: "span".into() }
        );
    }
}
