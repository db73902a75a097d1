//! Footnote linking
//!
//! Finds the footnote markers of a (reference-resolved) line in ascending order, starting at
//! the next footnote the document expects. The text annotated by a marker is either the
//! single word right before it, or everything since the last `#`:
//!
//! ```text
//! the physician knows*1* that   -> base text "knows"
//! the #wise physician*2* knows  -> base text "wise physician"
//! ```
//!
//! For every marker two fragments are produced: an inline `<app>` in the main text holding
//! the base text between the `begin_fnN` id and the `end_fnN` anchor, and a standalone
//! apparatus `<app from="#begin_fnN" to="#end_fnN">` whose body is the decoded footnote.
//! A marker that is not found ends the scan for this line; the expected number carries over
//! to the next line.

use crate::exegis::error::LinkError;
use crate::exegis::footnotes::FootnoteList;
use crate::exegis::lexer::{tokenize_with_spans, Token};
use crate::exegis::xml::{Indent, XmlFragments};
use tracing::debug;

/// Links footnote markers in main-text lines to the document's footnote list
#[derive(Debug, Clone, Copy)]
pub struct FootnoteLinker<'a> {
    footnotes: &'a FootnoteList,
    indent: &'a Indent,
}

impl<'a> FootnoteLinker<'a> {
    pub fn new(footnotes: &'a FootnoteList, indent: &'a Indent) -> Self {
        Self { footnotes, indent }
    }

    /// Convert one line, writing main-text lines at `offset`.
    ///
    /// Returns the fragments and the number of the next footnote to look for.
    pub fn link(
        &self,
        line: &str,
        next_footnote: usize,
        offset: usize,
    ) -> Result<(XmlFragments, usize), LinkError> {
        let tokens = tokenize_with_spans(line);
        let mut fragments = XmlFragments::new();
        let mut next = next_footnote;
        let mut text_start = 0;
        let mut first_token = 0;

        while let Some(position) = tokens[first_token..]
            .iter()
            .position(|(token, _)| *token == Token::FootnoteMarker(next))
        {
            let marker_index = first_token + position;
            let marker = tokens[marker_index].1.clone();
            let preceding = &tokens[first_token..marker_index];

            let split = preceding
                .iter()
                .rev()
                .find(|(token, _)| *token == Token::SpanStart)
                .or_else(|| preceding.iter().rev().find(|(token, _)| token.is_whitespace()))
                .map(|(_, span)| span.clone())
                .ok_or(LinkError::UnresolvedSplit { number: next })?;

            // A marker right after a locus or a separator annotates nothing
            let base = &line[split.end..marker.start];
            if base.trim().is_empty() {
                return Err(LinkError::UnresolvedSplit { number: next });
            }

            self.push_text(&mut fragments.main, &line[text_start..split.start], offset);
            self.push_inline_app(&mut fragments.main, next, base, offset);
            self.push_apparatus(&mut fragments.apparatus, next)?;

            next += 1;
            text_start = marker.end;
            first_token = marker_index + 1;
        }

        self.push_text(&mut fragments.main, &line[text_start..], offset);
        Ok((fragments, next))
    }

    /// Literal text, one output line per source line, blank lines dropped
    fn push_text(&self, main: &mut Vec<String>, text: &str, offset: usize) {
        main.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| self.indent.line(offset, line)),
        );
    }

    fn push_inline_app(&self, main: &mut Vec<String>, number: usize, base: &str, offset: usize) {
        let app = format!(
            "<app n=\"{n}\" type=\"footnote\" xml:id=\"begin_fn{n}\"><rdg>{base}</rdg><anchor xml:id=\"end_fn{n}\"/>",
            n = number,
            base = base
        );
        main.extend(
            app.lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| self.indent.line(offset, line)),
        );
        main.push(self.indent.line(offset, "</app>"));
    }

    fn push_apparatus(&self, apparatus: &mut Vec<String>, number: usize) -> Result<(), LinkError> {
        let footnote = self
            .footnotes
            .get(number)
            .ok_or(LinkError::UnknownFootnote {
                number,
                available: self.footnotes.len(),
            })?;
        let record = footnote.record();
        debug!(footnote = number, kind = %record.kind(), "linked footnote");

        apparatus.push(format!(
            "<app from=\"#begin_fn{n}\" to=\"#end_fn{n}\">",
            n = number
        ));
        apparatus.extend(record.to_xml(self.indent));
        apparatus.push("</app>".to_string());
        Ok(())
    }
}
