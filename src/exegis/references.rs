//! Witness reference resolution
//!
//! Rewrites every `[CODE LOCUS]` in a line into `<locus target="CODE">LOCUS</locus>`. Each
//! inserted tag is separated from the surrounding text by line breaks, so that later stages
//! can write every markup unit on its own output line. Text between references passes
//! through unchanged apart from XML escaping; footnote markers and span starts are left in
//! place for the footnote linker.
//!
//! ```text
//! Aphorism text [A 12r] goes on.
//! ```
//!
//! becomes
//!
//! ```text
//! Aphorism text
//! <locus target="A">12r</locus>
//!  goes on.
//! ```

use crate::exegis::error::ReferenceError;
use crate::exegis::lexer::{tokenize_with_spans, Token};
use crate::exegis::xml::{escape_attr, escape_text};

/// A witness reference found in a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessReference {
    pub witness: String,
    pub locus: String,
}

impl WitnessReference {
    /// Split the text between the brackets at its first space
    pub fn parse(reference: &str) -> Result<Self, ReferenceError> {
        let (witness, locus) =
            reference
                .split_once(' ')
                .ok_or_else(|| ReferenceError::MissingSeparator {
                    reference: reference.to_string(),
                })?;
        Ok(Self {
            witness: witness.to_string(),
            locus: locus.to_string(),
        })
    }

    pub fn to_xml(&self) -> String {
        format!(
            "<locus target=\"{}\">{}</locus>",
            escape_attr(&self.witness),
            escape_text(&self.locus)
        )
    }
}

/// Replace every witness reference in `line` with a `<locus>` tag on its own line
pub fn resolve_references(line: &str) -> Result<String, ReferenceError> {
    let tokens = tokenize_with_spans(line);
    let mut result = String::new();
    let mut text_start = 0;
    let mut index = 0;

    while index < tokens.len() {
        if tokens[index].0 != Token::WitnessRefOpen {
            index += 1;
            continue;
        }

        let open = tokens[index].1.clone();
        let close_index = tokens[index + 1..]
            .iter()
            .position(|(token, _)| *token == Token::WitnessRefClose)
            .map(|offset| index + 1 + offset)
            .ok_or(ReferenceError::Unterminated)?;
        if tokens[index + 1..close_index]
            .iter()
            .any(|(token, _)| *token == Token::WitnessRefOpen)
        {
            return Err(ReferenceError::Nested {
                reference: line[open.start..tokens[close_index].1.end].to_string(),
            });
        }
        let close = tokens[close_index].1.clone();

        let before = &line[text_start..open.start];
        if !before.is_empty() {
            result.push_str(&escape_text(before));
            result.push('\n');
        }

        let reference = WitnessReference::parse(&line[open.end..close.start])?;
        result.push_str(&reference.to_xml());

        text_start = close.end;
        if text_start < line.len() {
            result.push('\n');
        }
        index = close_index + 1;
    }

    result.push_str(&escape_text(&line[text_start..]));
    Ok(result)
}
