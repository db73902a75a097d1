//! Main-text XML template
//!
//! The generated main-text XML is not a complete file on its own. It is inserted into a
//! template (normally an EpiDoc TEI skeleton) at the first occurrence of a marker string.

use crate::exegis::error::TemplateError;
use std::fs;
use std::io;
use std::path::Path;

/// Marker used when none is configured
pub const DEFAULT_MARKER: &str = "#INSERT#";

const BUILTIN_TEMPLATE: &str = include_str!("../../templates/xml_main_template.xml");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
    marker: String,
    /// Where the template came from, for error messages
    source_name: String,
}

impl Template {
    pub fn new(
        text: impl Into<String>,
        marker: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            marker: marker.into(),
            source_name: source_name.into(),
        }
    }

    /// The EpiDoc TEI template bundled with the crate
    pub fn builtin(marker: impl Into<String>) -> Self {
        Self::new(BUILTIN_TEMPLATE, marker, "<built-in template>")
    }

    pub fn from_file(path: impl AsRef<Path>, marker: impl Into<String>) -> io::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Ok(Self::new(text, marker, path.display().to_string()))
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Fails early for templates that can never be rendered
    pub fn check(&self) -> Result<(), TemplateError> {
        self.split().map(|_| ())
    }

    /// Insert the main-text lines at the marker, each followed by a newline
    pub fn render<S: AsRef<str>>(&self, main_lines: &[S]) -> Result<String, TemplateError> {
        let (before, after) = self.split()?;
        let mut output = String::with_capacity(self.text.len());
        output.push_str(before);
        for line in main_lines {
            output.push_str(line.as_ref());
            output.push('\n');
        }
        output.push_str(after);
        Ok(output)
    }

    fn split(&self) -> Result<(&str, &str), TemplateError> {
        if self.marker.is_empty() {
            return Err(self.marker_missing());
        }
        self.text
            .split_once(self.marker.as_str())
            .ok_or_else(|| self.marker_missing())
    }

    fn marker_missing(&self) -> TemplateError {
        TemplateError::MarkerMissing {
            marker: self.marker.clone(),
            source_name: self.source_name.clone(),
        }
    }
}
