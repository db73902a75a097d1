//! Implementation of the line lexer
//!
//! Convenience functions around the logos lexer. Bytes logos cannot classify (stray control
//! characters, exotic whitespace) are reported as [`Token::Text`], so the spans of the
//! returned tokens always cover the whole input and callers can slice the source freely.

use crate::exegis::lexer::tokens::Token;
use logos::Logos;

/// Convenience function to tokenize a string and collect all tokens
pub fn tokenize(source: &str) -> Vec<Token> {
    tokenize_with_spans(source)
        .into_iter()
        .map(|(token, _)| token)
        .collect()
}

/// Convenience function to tokenize a string and collect tokens with their spans
pub fn tokenize_with_spans(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens: Vec<(Token, logos::Span)> = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = result.unwrap_or(Token::Text);
        match tokens.last_mut() {
            // Keep text runs contiguous when unclassified bytes split them
            Some((Token::Text, last)) if token == Token::Text && last.end == span.start => {
                last.end = span.end
            }
            _ => tokens.push((token, span)),
        }
    }

    tokens
}
