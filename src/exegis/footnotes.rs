//! Footnotes
//!
//! The footnote block at the end of a transcription holds one line per footnote, numbered
//! from 1 without gaps:
//!
//! ```text
//! *1*ssss ] W1: tttt W2.
//! *2*ssss ] W1: om. W2.
//! ```
//!
//! [`FootnoteList`] owns those lines. Each [`Footnote`] knows how to strip its own marker and
//! trailing period to obtain the body that [`classifier`] and [`variants`] decode, and the
//! [`validator`] checks the whole block before any of that happens.

pub mod classifier;
pub mod validator;
pub mod variants;

pub use classifier::VariantKind;
pub use validator::validate_footnotes;
pub use variants::{split_witness_groups, Reading, VariantRecord};

/// One line of the footnote block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    /// Position in the footnote block, starting at 1
    pub number: usize,
    /// The trimmed source line, marker included
    pub line: String,
}

impl Footnote {
    pub fn new(number: usize, line: impl Into<String>) -> Self {
        Self {
            number,
            line: line.into(),
        }
    }

    /// The marker `*n*` that refers to this footnote
    pub fn marker(&self) -> String {
        format!("*{}*", self.number)
    }

    /// The footnote text without trailing spaces and periods and without its leading marker
    pub fn body(&self) -> &str {
        let line = self.line.trim_end_matches(|c: char| c == ' ' || c == '.');
        match line.split_once(self.marker().as_str()) {
            Some((_, body)) => body,
            None => line,
        }
    }

    /// Classify and decode the body
    pub fn record(&self) -> VariantRecord {
        VariantRecord::parse(self.body())
    }
}

/// The ordered footnotes of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteList {
    entries: Vec<Footnote>,
}

impl FootnoteList {
    /// Build the list from the raw footnote block; blank lines are not footnotes
    pub fn from_block(block: &str) -> Self {
        let entries = block
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| Footnote::new(index + 1, line))
            .collect();
        Self { entries }
    }

    /// Footnote `number` (1-based)
    pub fn get(&self, number: usize) -> Option<&Footnote> {
        number.checked_sub(1).and_then(|index| self.entries.get(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Footnote> {
        self.entries.iter()
    }

    /// All format violations in the list
    pub fn validate(&self) -> Vec<String> {
        validate_footnotes(self.entries.iter().map(|footnote| footnote.line.as_str()))
    }
}
