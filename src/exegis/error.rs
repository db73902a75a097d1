//! Error types for document conversion
//!
//! Footnote format violations are collected exhaustively before any XML is generated; every
//! other error is fail-fast and aborts the document it occurred in. [`ConversionError`]
//! renders the ordered plain-text message list handed to the error reporting collaborator.

use thiserror::Error;

/// A witness reference `[CODE LOCUS]` that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Unable to partition string at \"]\" when looking for a reference")]
    Unterminated,
    #[error("Unable to partition reference {reference} because missing \" \" character")]
    MissingSeparator { reference: String },
    #[error("Reference {reference} contains a nested \"[\"")]
    Nested { reference: String },
}

/// A footnote marker that cannot be linked to its text or its footnote entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Unable to partition text before footnote symbol *{number}*")]
    UnresolvedSplit { number: usize },
    #[error("Footnote symbol *{number}* has no entry in the footnote block ({available} footnotes)")]
    UnknownFootnote { number: usize, available: usize },
}

/// The sequence of sections does not follow the expected document layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("Unable to find expected aphorism number ({expected}), found: {found}")]
    UnexpectedAphorismNumber { expected: usize, found: String },
    #[error("Reached the end of the main text while looking for {looking_for}")]
    UnexpectedEndOfDocument { looking_for: String },
}

/// The raw document cannot be split into a main-text block and a footnote block, or its
/// footnotes are malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Problem finding location of \"*1*\"")]
    MarkerNotFound,
    #[error("Can only find one instance of \"*1*\"")]
    SingleMarker,
    #[error("{} footnote format violation(s)", .0.len())]
    FootnoteFormat(Vec<String>),
}

impl DocumentError {
    /// Both marker errors are the MissingMarker kind
    pub fn is_missing_marker(&self) -> bool {
        matches!(self, DocumentError::MarkerNotFound | DocumentError::SingleMarker)
    }
}

/// The template file has no insertion marker
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Unable to find template marker text ({marker}) in file {source_name}")]
    MarkerMissing { marker: String, source_name: String },
}

/// Where in the document the walker was when an error occurred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContext {
    Intro,
    Title,
    Aphorism(usize),
    Commentary(usize),
}

impl std::fmt::Display for SectionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionContext::Intro => write!(f, "document intro"),
            SectionContext::Title => write!(f, "title line"),
            SectionContext::Aphorism(n) => write!(f, "aphorism {}", n),
            SectionContext::Commentary(n) => write!(f, "commentary for aphorism {}", n),
        }
    }
}

/// A failure converting one line of the main text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error(transparent)]
    Reference(#[from] ReferenceError),
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Any failure converting one document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("{source} (line {line}, {section})")]
    Line {
        line: usize,
        section: SectionContext,
        source: LineError,
    },
    #[error("{source} (line {line})")]
    Structure {
        line: usize,
        source: StructureError,
    },
}

impl ConversionError {
    /// Render the ordered list of plain-text messages for the named document
    pub fn messages(&self, document: &str) -> Vec<String> {
        match self {
            // Footnote violations are reported bare, one per line
            ConversionError::Document(DocumentError::FootnoteFormat(violations)) => {
                violations.clone()
            }
            ConversionError::Document(err) => vec![
                format!("Error processing document: {}", document),
                format!("  {}", err),
            ],
            ConversionError::Line {
                line,
                section,
                source,
            } => {
                let operation = match source {
                    LineError::Reference(_) => "references",
                    LineError::Link(_) => "footnotes",
                };
                vec![
                    format!("Error processing document: {}", document),
                    format!(
                        "  Unable to process {} in line {} ({})",
                        operation, line, section
                    ),
                    format!("  Message: {}", source),
                ]
            }
            ConversionError::Structure { line, source } => vec![
                format!("Error processing document: {}", document),
                format!("  {} in line {}", source, line),
            ],
        }
    }
}
