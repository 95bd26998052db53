//! Lexer for Mustache templates
//!
//! Tag boundaries depend on the live delimiter pair, so the scan for open and
//! close markers is done by hand. The sigil that classifies a tag body is
//! lexed with logos.

use logos::Logos;

use super::ast::{Span, Spanned};
use crate::error::LexError;

const DEFAULT_OPEN: &str = "{{";
const DEFAULT_CLOSE: &str = "}}";

/// Open and close tag markers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN.to_string(),
            close: DEFAULT_CLOSE.to_string(),
        }
    }
}

impl Delimiters {
    /// Create a delimiter pair
    ///
    /// Returns `None` if either marker is empty or contains whitespace.
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Option<Self> {
        let open = open.into();
        let close = close.into();
        if is_marker(&open) && is_marker(&close) {
            Some(Self { open, close })
        } else {
            None
        }
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl std::fmt::Display for Delimiters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.open, self.close)
    }
}

fn is_marker(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

/// A lexed template token. Text tokens carry no payload; their span is the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text,
    Variable { name: String, escaped: bool },
    SectionStart(String),
    InvertedSectionStart(String),
    SectionEnd(String),
    Partial(String),
    Comment,
    SetDelimiters(Delimiters),
}

/// Leading character of a trimmed tag body
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Sigil {
    #[token("!")]
    Bang,
    #[token("=")]
    Equals,
    #[token("#")]
    Hash,
    #[token("^")]
    Caret,
    #[token("/")]
    Slash,
    #[token(">")]
    Angle,
    #[token("{")]
    Brace,
    #[token("&")]
    Ampersand,
}

/// Lex a template into tokens, starting with the given delimiters
///
/// A set-delimiters tag switches the markers for everything after it.
pub fn lex(source: &str, delimiters: &Delimiters) -> Result<Vec<Spanned<Token>>, LexError> {
    let mut tokens = Vec::new();
    let mut delimiters = delimiters.clone();
    let mut pos = 0;

    while pos < source.len() {
        let Some(found) = source[pos..].find(delimiters.open()) else {
            tokens.push(Spanned::new(Token::Text, pos..source.len()));
            break;
        };
        let start = pos + found;
        if start > pos {
            tokens.push(Spanned::new(Token::Text, pos..start));
        }

        if delimiters.open() == DEFAULT_OPEN && source[start..].starts_with("{{{") {
            let body_start = start + 3;
            let close = source[body_start..]
                .find("}}}")
                .ok_or(LexError::UnclosedTripleMustache {
                    span: start..body_start,
                })?;
            let end = body_start + close + 3;
            let name = source[body_start..body_start + close].trim().to_string();
            tokens.push(Spanned::new(
                Token::Variable {
                    name,
                    escaped: false,
                },
                start..end,
            ));
            pos = end;
            continue;
        }

        let body_start = start + delimiters.open().len();
        let close = source[body_start..]
            .find(delimiters.close())
            .ok_or(LexError::UnclosedTag {
                span: start..body_start,
            })?;
        let end = body_start + close + delimiters.close().len();
        let body = source[body_start..body_start + close].trim();
        pos = end;

        if body.is_empty() {
            continue;
        }

        let token = classify(body, start..end)?;
        if let Token::SetDelimiters(next) = &token {
            delimiters = next.clone();
        }
        tokens.push(Spanned::new(token, start..end));
    }

    Ok(tokens)
}

/// Classify a trimmed, non-empty tag body
fn classify(body: &str, span: Span) -> Result<Token, LexError> {
    let mut sigils = Sigil::lexer(body);
    let sigil = match sigils.next() {
        Some(Ok(sigil)) => Some(sigil),
        _ => None,
    };
    let rest = sigils.remainder();

    let token = match sigil {
        Some(Sigil::Bang) => Token::Comment,
        Some(Sigil::Equals) if body.ends_with('=') => {
            let inner = rest.strip_suffix('=').unwrap_or("");
            let markers: Vec<&str> = inner.split_whitespace().collect();
            match markers.as_slice() {
                [open, close] => Token::SetDelimiters(Delimiters {
                    open: open.to_string(),
                    close: close.to_string(),
                }),
                _ => {
                    return Err(LexError::InvalidDelimiters {
                        body: body.to_string(),
                        span,
                    })
                }
            }
        }
        Some(Sigil::Hash) => Token::SectionStart(rest.trim().to_string()),
        Some(Sigil::Caret) => Token::InvertedSectionStart(rest.trim().to_string()),
        Some(Sigil::Slash) => Token::SectionEnd(rest.trim().to_string()),
        Some(Sigil::Angle) => Token::Partial(rest.trim().to_string()),
        Some(Sigil::Brace) if body.len() > 1 && body.ends_with('}') => Token::Variable {
            name: rest[..rest.len() - 1].trim().to_string(),
            escaped: false,
        },
        Some(Sigil::Ampersand) => Token::Variable {
            name: rest.trim().to_string(),
            escaped: false,
        },
        _ => Token::Variable {
            name: body.to_string(),
            escaped: true,
        },
    };
    Ok(token)
}
