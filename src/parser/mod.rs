//! Lexer and parser for Mustache templates

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::*;
pub use grammar::{parse, parse_tokens, parse_with};
pub use lexer::{lex, Delimiters, Token};
