//! XML text helpers
//!
//! The converter writes XML line by line: each markup unit sits on its own line and is
//! prefixed with a whole number of offset units. [`Indent`] carries the unit string and
//! [`XmlFragments`] the two line streams (main text and apparatus) a conversion produces.

/// Escape XML special characters in text content
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape XML special characters in an attribute value
pub fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// The unit of offset used when writing XML lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indent {
    unit: String,
}

impl Indent {
    /// An indent made of `width` spaces per offset
    pub fn spaces(width: usize) -> Self {
        Self {
            unit: " ".repeat(width),
        }
    }

    /// The prefix for a line at the given offset
    pub fn at(&self, offset: usize) -> String {
        self.unit.repeat(offset)
    }

    /// Prefix `line` with `offset` units
    pub fn line(&self, offset: usize, line: &str) -> String {
        format!("{}{}", self.at(offset), line)
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::spaces(4)
    }
}

/// Main-text and apparatus XML lines produced by one conversion step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlFragments {
    pub main: Vec<String>,
    pub apparatus: Vec<String>,
}

impl XmlFragments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another pair of fragments, keeping the order of both streams
    pub fn extend(&mut self, other: XmlFragments) {
        self.main.extend(other.main);
        self.apparatus.extend(other.apparatus);
    }

    /// The main-text lines joined into one newline-terminated string
    pub fn main_xml(&self) -> String {
        join_lines(&self.main)
    }

    /// The apparatus lines joined into one newline-terminated string
    pub fn apparatus_xml(&self) -> String {
        join_lines(&self.apparatus)
    }
}

fn join_lines(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
