//! # exegis
//!
//! Converts plain-text transcriptions of aphorisms with their commentaries into EpiDoc XML:
//! a main-text file in which every footnoted word or phrase is an inline `<app>`, and a
//! critical apparatus file with one `<app>` per footnote, built from the footnote's variant
//! readings.
//!
//! See [`exegis::walker`] for the document layout and [`exegis::footnotes`] for the
//! footnote grammar.

pub mod exegis;
