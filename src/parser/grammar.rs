//! Tree builder: turns the token stream into nested nodes
//!
//! Standalone tags (alone on their line apart from whitespace) remove their
//! whole line from the output. The decision is made here, once, from the
//! template source.

use crate::error::ParseError;
use crate::parser::ast::{Node, Section, Span, Spanned};
use crate::parser::lexer::{lex, Delimiters, Token};

/// Parse a template with the default `{{ }}` delimiters
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    parse_with(source, &Delimiters::default())
}

/// Parse a template starting from the given delimiters
pub fn parse_with(source: &str, delimiters: &Delimiters) -> Result<Vec<Node>, ParseError> {
    let tokens = lex(source, delimiters)?;
    parse_tokens(source, tokens, delimiters)
}

/// Build the node tree from tokens lexed out of `source`
///
/// `delimiters` must be the pair the tokens were lexed with; it is tracked
/// through set-delimiter tokens so every section records the pair in effect
/// at its opening tag.
pub fn parse_tokens(
    source: &str,
    tokens: Vec<Spanned<Token>>,
    delimiters: &Delimiters,
) -> Result<Vec<Node>, ParseError> {
    let mut builder = TreeBuilder::new(source, delimiters.clone());

    for Spanned { node: token, span } in tokens {
        match token {
            Token::Text => builder.text(&span),
            Token::Variable { name, escaped } => builder.push(Node::Variable { name, escaped }),
            Token::Comment => {
                builder.standalone(&span);
            }
            Token::SetDelimiters(next) => {
                builder.standalone(&span);
                builder.delimiters = next;
            }
            Token::Partial(name) => {
                let indent = builder.standalone(&span);
                builder.push(Node::Partial { name, indent });
            }
            Token::SectionStart(name) => {
                builder.standalone(&span);
                builder.open(name, false, span);
            }
            Token::InvertedSectionStart(name) => {
                builder.standalone(&span);
                builder.open(name, true, span);
            }
            Token::SectionEnd(name) => {
                builder.standalone(&span);
                builder.close(name, span)?;
            }
        }
    }

    builder.finish()
}

struct OpenSection {
    name: String,
    inverted: bool,
    tag: Span,
    delimiters: Delimiters,
    children: Vec<Node>,
}

struct TreeBuilder<'s> {
    source: &'s str,
    root: Vec<Node>,
    open: Vec<OpenSection>,
    delimiters: Delimiters,
    /// Text before this offset belongs to an elided standalone line
    suppress_until: usize,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str, delimiters: Delimiters) -> Self {
        Self {
            source,
            root: Vec::new(),
            open: Vec::new(),
            delimiters,
            suppress_until: 0,
        }
    }

    fn current(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(section) => &mut section.children,
            None => &mut self.root,
        }
    }

    fn push(&mut self, node: Node) {
        self.current().push(node);
    }

    fn text(&mut self, span: &Span) {
        if span.end <= self.suppress_until {
            return;
        }
        let start = span.start.max(self.suppress_until);
        let text = self.source[start..span.end].to_string();
        self.push(Node::Text(text));
    }

    /// Apply standalone trimming for a tag, returning its indentation if it
    /// stands alone
    fn standalone(&mut self, span: &Span) -> Option<String> {
        let line = standalone_line(self.source, span)?;

        let nodes = self.current();
        if let Some(Node::Text(text)) = nodes.last_mut() {
            let keep = text.rfind('\n').map_or(0, |i| i + 1);
            text.truncate(keep);
            if text.is_empty() {
                nodes.pop();
            }
        }
        self.suppress_until = line.resume;

        Some(self.source[line.indent].to_string())
    }

    fn open(&mut self, name: String, inverted: bool, tag: Span) {
        self.open.push(OpenSection {
            name,
            inverted,
            tag,
            delimiters: self.delimiters.clone(),
            children: Vec::new(),
        });
    }

    fn close(&mut self, name: String, span: Span) -> Result<(), ParseError> {
        let Some(section) = self.open.pop() else {
            return Err(ParseError::UnmatchedSectionEnd { name, span });
        };
        if section.name != name {
            return Err(ParseError::SectionMismatch {
                expected: section.name,
                found: name,
                span,
            });
        }

        let raw = self.source[section.tag.end..span.start].to_string();
        self.push(Node::Section(Section {
            name,
            inverted: section.inverted,
            children: section.children,
            raw,
            delimiters: section.delimiters,
        }));
        Ok(())
    }

    fn finish(self) -> Result<Vec<Node>, ParseError> {
        match self.open.into_iter().last() {
            Some(section) => Err(ParseError::UnclosedSection {
                name: section.name,
                span: section.tag,
            }),
            None => Ok(self.root),
        }
    }
}

struct StandaloneLine {
    /// Whitespace between line start and the tag
    indent: Span,
    /// First offset after the line, past its newline if any
    resume: usize,
}

fn standalone_line(source: &str, tag: &Span) -> Option<StandaloneLine> {
    let line_start = source[..tag.start].rfind('\n').map_or(0, |i| i + 1);
    if !is_blank(&source[line_start..tag.start]) {
        return None;
    }

    let line_end = source[tag.end..]
        .find('\n')
        .map_or(source.len(), |i| tag.end + i);
    if !is_blank(&source[tag.end..line_end]) {
        return None;
    }

    let resume = if line_end < source.len() {
        line_end + 1
    } else {
        line_end
    };
    Some(StandaloneLine {
        indent: line_start..tag.start,
        resume,
    })
}

fn is_blank(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b' ' | b'\t' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(name: &str, inverted: bool, children: Vec<Node>, raw: &str) -> Node {
        Node::Section(Section {
            name: name.to_string(),
            inverted,
            children,
            raw: raw.to_string(),
            delimiters: Delimiters::default(),
        })
    }

    #[test]
    fn test_text_and_variables() {
        let nodes = parse("Hello {{name}} and {{{raw}}}").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::text("Hello "),
                Node::variable("name"),
                Node::text(" and "),
                Node::raw_variable("raw"),
            ]
        );
    }

    #[test]
    fn test_nested_sections_capture_raw() {
        let nodes = parse("{{#a}}x{{^b}}{{y}}{{/b}}{{/a}}").unwrap();
        assert_eq!(
            nodes,
            vec![section(
                "a",
                false,
                vec![
                    Node::text("x"),
                    section("b", true, vec![Node::variable("y")], "{{y}}"),
                ],
                "x{{^b}}{{y}}{{/b}}",
            )]
        );
    }

    #[test]
    fn test_standalone_section_lines_removed() {
        let nodes = parse("|\n  {{#s}}\ncontent\n  {{/s}}\n|").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::text("|\n"),
                section("s", false, vec![Node::text("content\n")], "\ncontent\n  "),
                Node::text("|"),
            ]
        );
    }

    #[test]
    fn test_inline_tag_not_trimmed() {
        let nodes = parse("a {{! note }}\nb").unwrap();
        assert_eq!(nodes, vec![Node::text("a "), Node::text("\nb")]);
    }

    #[test]
    fn test_crlf_standalone() {
        let nodes = parse("|\r\n{{! c }}\r\n|").unwrap();
        assert_eq!(nodes, vec![Node::text("|\r\n"), Node::text("|")]);
    }

    #[test]
    fn test_standalone_at_end_without_newline() {
        let nodes = parse("x\n  {{! c }}").unwrap();
        assert_eq!(nodes, vec![Node::text("x\n")]);
    }

    #[test]
    fn test_standalone_partial_indent() {
        let nodes = parse("a\n  {{> p}}\nb {{>q}}").unwrap();
        assert_eq!(
            nodes,
            vec![
                Node::text("a\n"),
                Node::Partial {
                    name: "p".to_string(),
                    indent: Some("  ".to_string()),
                },
                Node::text("b "),
                Node::Partial {
                    name: "q".to_string(),
                    indent: None,
                },
            ]
        );
    }

    #[test]
    fn test_section_records_delimiters() {
        let nodes = parse("{{=| |=}}|#a||/a|").unwrap();
        let Node::Section(section) = &nodes[0] else {
            panic!("expected section, got {:?}", nodes);
        };
        assert_eq!(section.delimiters, Delimiters::new("|", "|").unwrap());
    }

    #[test]
    fn test_unmatched_end() {
        let err = parse("abc{{/a}}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnmatchedSectionEnd {
                name: "a".to_string(),
                span: 3..9,
            }
        );
    }

    #[test]
    fn test_mismatched_end() {
        let err = parse("{{#a}}{{/b}}").unwrap_err();
        assert!(matches!(err, ParseError::SectionMismatch { ref expected, ref found, .. }
            if expected == "a" && found == "b"));
    }

    #[test]
    fn test_unclosed_section() {
        let err = parse("{{#a}}{{#b}}{{/b}}").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnclosedSection {
                name: "a".to_string(),
                span: 0..6,
            }
        );
    }

    #[test]
    fn test_lex_error_surfaces() {
        let err = parse("{{oops").unwrap_err();
        assert!(matches!(err, ParseError::Lex(_)));
    }
}
