//! Template lexing.
//!
//! Splits template source into literal text and `{{ }}` actions, applying the
//! `{{-` / `-}}` whitespace trim markers and dropping `{{/* */}}` comments. Action
//! bodies are then split into words by [`split_words`].

use super::ParseError;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A lexed piece of template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, already trimmed by neighbouring markers.
    Text(String),
    /// An action body with its starting line.
    Action {
        /// 1-based line of the opening delimiter.
        line: usize,
        /// Body between the delimiters, markers removed and whitespace trimmed.
        body: String,
    },
}

/// Lexes template source into text and action tokens.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut rest = source;
    let mut line = 1;
    let mut trim_next = false;

    while let Some(start) = rest.find(OPEN) {
        let action_line = line + rest[..start].matches('\n').count();
        let after_open = &rest[start + OPEN.len()..];
        let trim_left = has_trim_marker(after_open);

        let mut text = &rest[..start];
        if trim_next {
            text = text.trim_start();
        }
        if trim_left {
            text = text.trim_end();
        }
        if !text.is_empty() {
            tokens.push(Token::Text(text.to_string()));
        }

        let body_src = if trim_left { &after_open[1..] } else { after_open };
        let close = find_close(body_src).ok_or_else(|| ParseError {
            line: action_line,
            message: "unclosed action".to_string(),
        })?;
        let mut body = &body_src[..close];
        trim_next = false;
        if let Some(stripped) = body.strip_suffix('-') {
            if stripped.ends_with(char::is_whitespace) {
                body = stripped;
                trim_next = true;
            }
        }

        let next = &body_src[close + CLOSE.len()..];
        line += rest[..rest.len() - next.len()].matches('\n').count();
        rest = next;

        let body = body.trim();
        if body.starts_with("/*") {
            if !body.ends_with("*/") {
                return Err(ParseError {
                    line: action_line,
                    message: "unclosed comment".to_string(),
                });
            }
            continue;
        }
        tokens.push(Token::Action {
            line: action_line,
            body: body.to_string(),
        });
    }

    let text = if trim_next { rest.trim_start() } else { rest };
    if !text.is_empty() {
        tokens.push(Token::Text(text.to_string()));
    }
    Ok(tokens)
}

// `{{- ` trims only when the dash is followed by whitespace, so `{{-1}}` stays a number.
fn has_trim_marker(after_open: &str) -> bool {
    let mut chars = after_open.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn find_close(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in body.char_indices() {
        match quote {
            Some('"') if escaped => escaped = false,
            Some('"') if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '`' => quote = Some(c),
            None if body[i..].starts_with(CLOSE) => return Some(i),
            None => {}
        }
    }
    None
}

/// A word inside an action body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    /// Unquoted word: keyword, identifier, field chain, variable, or number.
    Bare(String),
    /// Quoted string literal, escapes resolved.
    Str(String),
    /// `|` pipe separator.
    Pipe,
    /// `,` between range variables.
    Comma,
    /// `:=` variable declaration.
    Declare,
}

/// Splits an action body into words.
pub fn split_words(body: &str, line: usize) -> Result<Vec<Word>, ParseError> {
    let err = |message: &str| ParseError {
        line,
        message: message.to_string(),
    };
    let mut words = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                let _ = chars.next();
            }
            '|' => {
                let _ = chars.next();
                words.push(Word::Pipe);
            }
            ',' => {
                let _ = chars.next();
                words.push(Word::Comma);
            }
            ':' => {
                let _ = chars.next();
                if chars.next() != Some('=') {
                    return Err(err("expected ':='"));
                }
                words.push(Word::Declare);
            }
            '"' => {
                let _ = chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other @ ('\\' | '"')) => s.push(other),
                            _ => return Err(err("invalid escape in string literal")),
                        },
                        Some(other) => s.push(other),
                        None => return Err(err("unterminated string literal")),
                    }
                }
                words.push(Word::Str(s));
            }
            '`' => {
                let _ = chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('`') => break,
                        Some(other) => s.push(other),
                        None => return Err(err("unterminated raw string literal")),
                    }
                }
                words.push(Word::Str(s));
            }
            _ => {
                let mut s = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '|' | ',' | ':' | '"' | '`') {
                        break;
                    }
                    s.push(c);
                    let _ = chars.next();
                }
                words.push(Word::Bare(s));
            }
        }
    }
    Ok(words)
}
