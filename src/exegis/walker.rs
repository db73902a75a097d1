//! Document structure walker
//!
//! Drives the conversion of a whole document. The main text is walked as a small state
//! machine over its non-blank lines:
//!
//! ```text
//! Intro? -> Title -> Aphorism(1) -> Commentary(1) -> Aphorism(2) -> ... -> End
//! ```
//!
//!     - Intro: present when the main text contains `++`; runs until a line that is exactly
//!       `++` (the separator itself is not converted).
//!     - Title: runs until a line that is exactly `1.`. A document that starts with `1.` has
//!       no title and gets no title container.
//!     - Aphorism(n): the number line must read `n.`; the next line is the aphorism.
//!     - Commentary(n): every following line is one commentary, until a number line (the
//!       next aphorism) or the end of the main text.
//!
//! Every content line goes through the reference resolver and then the footnote linker. The
//! number of the next footnote to look for lives in a [`FootnoteCursor`] owned by the walk,
//! so markers may be spread over any number of lines and sections. The first error aborts
//! the walk and nothing of the document's XML is kept.

use crate::exegis::document::{SourceDocument, INTRO_SEPARATOR};
use crate::exegis::error::{ConversionError, SectionContext, StructureError};
use crate::exegis::linker::FootnoteLinker;
use crate::exegis::references::resolve_references;
use crate::exegis::xml::{escape_attr, Indent, XmlFragments};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// A number line: digits followed by one trailing character (normally `.`)
static APHORISM_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+).$").unwrap_or_else(|e| panic!("invalid aphorism pattern: {}", e))
});

/// The line that ends the title and opens the first aphorism
const FIRST_APHORISM: &str = "1.";

/// The digits of a number line, if it is one. Numbers are compared as written, so `02.`
/// is not aphorism 2.
pub fn aphorism_digits(line: &str) -> Option<&str> {
    APHORISM_NUMBER
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|digits| digits.as_str())
}

/// How generated XML is laid out
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub indent: Indent,
    /// Offset units of the outermost generated containers
    pub base_offset: usize,
}

/// The number of the next footnote marker the walk expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FootnoteCursor {
    next: usize,
}

impl FootnoteCursor {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next(&self) -> usize {
        self.next
    }

    /// Number of footnotes linked so far
    pub fn linked(&self) -> usize {
        self.next - 1
    }

    fn advance_to(&mut self, next: usize) {
        self.next = next;
    }
}

impl Default for FootnoteCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Intro,
    Title,
    /// Expecting the number line of aphorism n at the given line index
    Aphorism(usize, usize),
    Commentary(usize),
    End,
}

/// Walks a split source document and accumulates its main-text and apparatus XML
pub struct DocumentWalker<'a> {
    document: &'a SourceDocument,
    document_number: &'a str,
    layout: &'a Layout,
    linker: FootnoteLinker<'a>,
    position: usize,
    cursor: FootnoteCursor,
    output: XmlFragments,
}

impl<'a> DocumentWalker<'a> {
    pub fn new(document: &'a SourceDocument, document_number: &'a str, layout: &'a Layout) -> Self {
        Self {
            document,
            document_number,
            layout,
            linker: FootnoteLinker::new(&document.footnotes, &layout.indent),
            position: 0,
            cursor: FootnoteCursor::new(),
            output: XmlFragments::new(),
        }
    }

    /// Walk the whole main text
    pub fn walk(mut self) -> Result<XmlFragments, ConversionError> {
        let mut state = if self.document.has_intro {
            State::Intro
        } else {
            State::Title
        };

        while state != State::End {
            debug!(?state, line = self.position + 1, "entering section");
            state = match state {
                State::Intro => self.intro()?,
                State::Title => self.title()?,
                State::Aphorism(number, index) => self.aphorism(number, index)?,
                State::Commentary(number) => self.commentary(number)?,
                State::End => State::End,
            };
        }

        let linked = self.cursor.linked();
        if linked < self.document.footnotes.len() {
            warn!(
                linked,
                available = self.document.footnotes.len(),
                "footnotes never referenced in the main text"
            );
        }
        Ok(self.output)
    }

    fn intro(&mut self) -> Result<State, ConversionError> {
        let base = self.layout.base_offset;
        self.open(base, "<div type=\"intro\">");
        self.open(base + 1, "<p>");

        loop {
            let (index, line) = self.require_line("the \"++\" line ending the intro")?;
            if line == INTRO_SEPARATOR {
                break;
            }
            self.convert_line(index, line, SectionContext::Intro, base + 2)?;
        }

        self.open(base + 1, "</p>");
        self.open(base, "</div>");
        Ok(State::Title)
    }

    fn title(&mut self) -> Result<State, ConversionError> {
        let base = self.layout.base_offset;
        let (mut index, mut line) = self.require_line("the first aphorism (\"1.\")")?;
        if line == FIRST_APHORISM {
            return Ok(State::Aphorism(1, index));
        }

        self.open(
            base,
            &format!(
                "<div n=\"{}\" type=\"Title_section\">",
                escape_attr(self.document_number)
            ),
        );
        self.open(base + 1, "<ab>");
        while line != FIRST_APHORISM {
            self.convert_line(index, line, SectionContext::Title, base + 2)?;
            (index, line) = self.require_line("the first aphorism (\"1.\")")?;
        }
        self.open(base + 1, "</ab>");
        self.open(base, "</div>");

        Ok(State::Aphorism(1, index))
    }

    fn aphorism(&mut self, number: usize, index: usize) -> Result<State, ConversionError> {
        let document: &'a SourceDocument = self.document;
        let line = document.main_lines[index].trim();
        if aphorism_digits(line) != Some(number.to_string().as_str()) {
            let mut found = line.chars();
            found.next_back();
            return Err(ConversionError::Structure {
                line: index + 1,
                source: StructureError::UnexpectedAphorismNumber {
                    expected: number,
                    found: found.as_str().to_string(),
                },
            });
        }

        let base = self.layout.base_offset;
        self.open(
            base,
            &format!("<div n=\"{}\" type=\"aphorism_commentary_unit\">", number),
        );
        self.open(base + 1, "<div type=\"aphorism\">");
        self.open(base + 2, "<p>");

        let (text_index, text) = self.require_line(&format!("the text of aphorism {}", number))?;
        self.convert_line(text_index, text, SectionContext::Aphorism(number), base + 3)?;

        self.open(base + 2, "</p>");
        self.open(base + 1, "</div>");
        Ok(State::Commentary(number))
    }

    fn commentary(&mut self, number: usize) -> Result<State, ConversionError> {
        let base = self.layout.base_offset;

        let next = loop {
            let Some((index, line)) = self.next_line() else {
                break State::End;
            };
            if aphorism_digits(line).is_some() {
                break State::Aphorism(number + 1, index);
            }

            self.open(base + 1, "<div type=\"commentary\">");
            self.open(base + 2, "<p>");
            self.convert_line(index, line, SectionContext::Commentary(number), base + 3)?;
            self.open(base + 2, "</p>");
            self.open(base + 1, "</div>");
        };

        self.open(base, "</div>");
        Ok(next)
    }

    /// Resolve references, link footnotes and keep the fragments
    fn convert_line(
        &mut self,
        index: usize,
        line: &str,
        section: SectionContext,
        offset: usize,
    ) -> Result<(), ConversionError> {
        let resolved = resolve_references(line).map_err(|source| ConversionError::Line {
            line: index + 1,
            section: section.clone(),
            source: source.into(),
        })?;

        let (fragments, next) = self
            .linker
            .link(&resolved, self.cursor.next(), offset)
            .map_err(|source| ConversionError::Line {
                line: index + 1,
                section,
                source: source.into(),
            })?;

        self.cursor.advance_to(next);
        self.output.extend(fragments);
        Ok(())
    }

    fn open(&mut self, offset: usize, tag: &str) {
        self.output.main.push(self.layout.indent.line(offset, tag));
    }

    /// The next non-blank line, trimmed, with its index
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        let document: &'a SourceDocument = self.document;
        let lines = &document.main_lines;
        while self.position < lines.len() {
            let index = self.position;
            self.position += 1;
            let line = lines[index].trim();
            if !line.is_empty() {
                return Some((index, line));
            }
        }
        None
    }

    fn require_line(&mut self, looking_for: &str) -> Result<(usize, &'a str), ConversionError> {
        self.next_line().ok_or_else(|| ConversionError::Structure {
            line: self.document.main_lines.len(),
            source: StructureError::UnexpectedEndOfDocument {
                looking_for: looking_for.to_string(),
            },
        })
    }
}

/// Split, validate and walk a document.
///
/// `document_number` numbers the title container. Footnote format violations are all
/// reported together; any other failure is reported alone.
pub fn convert_document(
    text: &str,
    document_number: &str,
    layout: &Layout,
) -> Result<XmlFragments, ConversionError> {
    let document = SourceDocument::parse(text)?;
    document.check_footnotes()?;
    DocumentWalker::new(&document, document_number, layout).walk()
}
