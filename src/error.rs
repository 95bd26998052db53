//! Error types for lexing and parsing templates

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::parser::ast::Span;

/// Errors raised while scanning template text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unclosed tag at byte {}", .span.start)]
    UnclosedTag { span: Span },

    #[error("unclosed triple mustache at byte {}", .span.start)]
    UnclosedTripleMustache { span: Span },

    #[error("invalid set delimiters tag '{body}': expected exactly two delimiters")]
    InvalidDelimiters { body: String, span: Span },
}

/// Errors raised while building the template tree
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("section end '{name}' has no matching start")]
    UnmatchedSectionEnd { name: String, span: Span },

    #[error("section '{expected}' closed by '{found}'")]
    SectionMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("unclosed section '{name}'")]
    UnclosedSection { name: String, span: Span },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            LexError::UnclosedTag { span }
            | LexError::UnclosedTripleMustache { span }
            | LexError::InvalidDelimiters { span, .. } => span,
        }
    }
}

impl ParseError {
    /// Byte range of the offending tag
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::UnmatchedSectionEnd { span, .. }
            | ParseError::SectionMismatch { span, .. }
            | ParseError::UnclosedSection { span, .. } => span,
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::Lex(LexError::UnclosedTag { .. }) => "tag opened here".to_string(),
            ParseError::Lex(LexError::UnclosedTripleMustache { .. }) => {
                "expected '}}}' after this".to_string()
            }
            ParseError::Lex(LexError::InvalidDelimiters { .. }) => {
                "use {{=OPEN CLOSE=}}".to_string()
            }
            ParseError::UnmatchedSectionEnd { .. } => "nothing to close".to_string(),
            ParseError::SectionMismatch { expected, .. } => {
                format!("expected end of '{}'", expected)
            }
            ParseError::UnclosedSection { .. } => "section opened here".to_string(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let span = char_span(source, self.span());
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// ariadne counts characters, spans count bytes
fn char_span(source: &str, span: &Span) -> Span {
    let clamp = |offset: usize| {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        source[..offset].chars().count()
    };
    clamp(span.start)..clamp(span.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ParseError::SectionMismatch {
            expected: "a".to_string(),
            found: "b".to_string(),
            span: 0..5,
        };
        assert_eq!(err.to_string(), "section 'a' closed by 'b'");

        let err: ParseError = LexError::UnclosedTag { span: 3..5 }.into();
        assert_eq!(err.to_string(), "unclosed tag at byte 3");
        assert_eq!(err.span(), &(3..5));
    }

    #[test]
    fn test_format_includes_context() {
        let source = "Hello {{#people}}\n{{name}}";
        let err = ParseError::UnclosedSection {
            name: "people".to_string(),
            span: 6..17,
        };
        let report = err.format(source, "greeting.mustache");
        assert!(report.contains("unclosed section 'people'"));
        assert!(report.contains("greeting.mustache"));
        assert!(report.contains("section opened here"));
    }

    #[test]
    fn test_char_span_multibyte() {
        let source = "héllo {{x";
        // 'é' is two bytes
        assert_eq!(char_span(source, &(7..9)), 6..8);
    }
}
