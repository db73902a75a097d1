//! Source documents
//!
//! A transcription is one text file made of two blocks: the main text (optional intro, title,
//! numbered aphorisms with their commentaries) followed by the footnote block. The footnote
//! block starts at the last occurrence of `*1*`; the first occurrence is the marker in the
//! main text, so a document in which `*1*` occurs only once has no footnote block and is
//! rejected.

use crate::exegis::error::DocumentError;
use crate::exegis::footnotes::FootnoteList;

/// Line that separates the optional intro from the title
pub const INTRO_SEPARATOR: &str = "++";

/// Marker of the first footnote, used to locate the footnote block
pub const FIRST_FOOTNOTE_MARKER: &str = "*1*";

/// A transcription split into its main-text block and its footnote block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Raw lines of the main text, blank lines included
    pub main_lines: Vec<String>,
    pub footnotes: FootnoteList,
    /// Whether the main text contains `++`, i.e. starts with an intro
    pub has_intro: bool,
}

impl SourceDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let footnote_start = text
            .rfind(FIRST_FOOTNOTE_MARKER)
            .ok_or(DocumentError::MarkerNotFound)?;
        if text.find(FIRST_FOOTNOTE_MARKER) == Some(footnote_start) {
            return Err(DocumentError::SingleMarker);
        }

        let (main, block) = text.split_at(footnote_start);
        Ok(Self {
            main_lines: main.lines().map(str::to_string).collect(),
            footnotes: FootnoteList::from_block(block),
            has_intro: main.contains(INTRO_SEPARATOR),
        })
    }

    /// Run the footnote validator; any violation rejects the document
    pub fn check_footnotes(&self) -> Result<(), DocumentError> {
        let violations = self.footnotes.validate();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(DocumentError::FootnoteFormat(violations))
        }
    }
}
