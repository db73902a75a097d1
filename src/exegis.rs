//! Main module for exegis library functionality
//!
//! The conversion pipeline, line by line:
//!
//!     source text -> document (main text / footnote block split)
//!                 -> footnotes::validator (all format violations, or stop)
//!                 -> walker (intro, title, aphorisms, commentaries)
//!                      -> references (witness references to <locus>)
//!                      -> linker (footnote markers to <app>, apparatus entries)
//!                 -> template (main text) + apparatus file, or error file (batch)

pub mod batch;
pub mod config;
pub mod document;
pub mod error;
pub mod footnotes;
pub mod lexer;
pub mod linker;
pub mod logging;
pub mod references;
pub mod template;
pub mod walker;
pub mod xml;

pub use error::ConversionError;
pub use walker::{convert_document, Layout};
pub use xml::XmlFragments;
