//! Token definitions for transcription lines
//!
//! A line of the main text mixes plain witness text with three kinds of inline markup:
//!
//!     - Witness references: `[W1 12r]` (witness code, a space, then a free-text locus)
//!     - Footnote markers: `*n*`, placed right after the word (or span) they annotate
//!     - Span starts: `#`, opening a multi-word span that the next footnote marker closes
//!
//! The tokens are defined with the logos derive macro. Everything that is not markup is
//! either whitespace, a newline, or text.
use logos::Logos;
use serde::Serialize;

/// All possible tokens in a line of transcription text
#[derive(Logos, Debug, PartialEq, Eq, Clone, Serialize)]
pub enum Token {
    #[token("[")]
    WitnessRefOpen,

    #[token("]")]
    WitnessRefClose,

    // Footnote marker, e.g. *12*. A lone asterisk is not a marker.
    #[regex(r"\*[0-9]+\*", |lex| marker_number(lex.slice()))]
    FootnoteMarker(usize),

    #[token("#")]
    SpanStart,

    #[token("*")]
    Asterisk,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    // Catch-all for everything that is not markup or whitespace
    #[regex(r"[^\[\]\*#\s]+")]
    Text,
}

fn marker_number(slice: &str) -> Option<usize> {
    slice.trim_matches('*').parse().ok()
}

impl Token {
    /// Check if this token is whitespace (including line breaks)
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace | Token::Newline)
    }

    /// Check if this token is inline markup rather than witness text
    pub fn is_markup(&self) -> bool {
        matches!(
            self,
            Token::WitnessRefOpen
                | Token::WitnessRefClose
                | Token::FootnoteMarker(_)
                | Token::SpanStart
        )
    }

    /// The footnote number carried by a marker token
    pub fn footnote_number(&self) -> Option<usize> {
        match self {
            Token::FootnoteMarker(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::WitnessRefOpen => write!(f, "<ref-open>"),
            Token::WitnessRefClose => write!(f, "<ref-close>"),
            Token::FootnoteMarker(n) => write!(f, "<footnote:{}>", n),
            Token::SpanStart => write!(f, "<span-start>"),
            Token::Asterisk => write!(f, "<asterisk>"),
            Token::Whitespace => write!(f, "<whitespace>"),
            Token::Newline => write!(f, "<newline>"),
            Token::Text => write!(f, "<text>"),
        }
    }
}
