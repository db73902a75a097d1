//! Lexer module for transcription lines
//!
//! This module contains the tokenization logic for single lines of the main text, including
//! token definitions and the lexer implementation. Both the reference resolver and the
//! footnote linker walk this token stream instead of searching for delimiters in raw strings.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize, tokenize_with_spans};
pub use tokens::Token;
