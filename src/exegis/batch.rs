//! File and directory processing
//!
//! A transcription file is named `BASE.txt`, where the text after the last `_` of `BASE` is
//! the document number used for the title container. Converting it produces
//!
//! ```text
//! XML_DIR/BASE_main.xml     main text rendered into the template
//! XML_DIR/BASE_app.xml      apparatus entries
//! ERRORS_DIR/BASE.err       only when the conversion failed, one message per line
//! ```
//!
//! Documents are independent of each other, so a directory is processed in parallel and a
//! failing document never stops the others.

use crate::exegis::config::ExegisConfig;
use crate::exegis::error::TemplateError;
use crate::exegis::template::Template;
use crate::exegis::walker::{convert_document, Layout};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Extension of transcription files picked up from a directory
pub const SOURCE_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("File name has incorrect format: {name}")]
    FileName { name: String },
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl BatchError {
    fn io(path: &Path, source: io::Error) -> Self {
        BatchError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Base name and document number of a transcription file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentName {
    pub base: String,
    pub number: String,
}

impl DocumentName {
    pub fn from_path(path: &Path) -> Result<Self, BatchError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let invalid = || BatchError::FileName {
            name: file_name.clone(),
        };

        let (base, _extension) = file_name.rsplit_once('.').ok_or_else(invalid)?;
        let (_, number) = base.rsplit_once('_').ok_or_else(invalid)?;
        if base.is_empty() || number.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            base: base.to_string(),
            number: number.to_string(),
        })
    }
}

#[derive(Debug)]
pub enum Outcome {
    Converted { main: PathBuf, apparatus: PathBuf },
    Failed { error_file: PathBuf, messages: Vec<String> },
}

/// What happened to one transcription file
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    /// File name as shown to the user
    pub name: String,
    pub outcome: Outcome,
}

impl FileReport {
    pub fn is_converted(&self) -> bool {
        matches!(self.outcome, Outcome::Converted { .. })
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files that were read, in file name order
    pub files: Vec<FileReport>,
    /// Files that could not be handled at all (bad name, I/O)
    pub errors: Vec<(PathBuf, BatchError)>,
}

impl BatchReport {
    pub fn converted(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| report.is_converted())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|report| !report.is_converted())
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty() && self.files.iter().all(FileReport::is_converted)
    }
}

/// Convert one transcription file and write its XML or its error file.
///
/// Every document-level failure (bad file name, conversion error, template error) ends in an
/// error file; only I/O failures are returned as errors.
pub fn process_file(
    path: &Path,
    template: &Template,
    config: &ExegisConfig,
) -> Result<FileReport, BatchError> {
    let display_name = path
        .file_name()
        .map(|file| file.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let xml_dir = &config.output.xml_dir;
    let errors_dir = &config.output.errors_dir;

    let name = match DocumentName::from_path(path) {
        Ok(name) => name,
        Err(err) => {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| display_name.clone());
            let error_file = errors_dir.join(format!("{}.err", stem));
            warn!(document = %display_name, error = %err, "unable to process file");
            let outcome = write_failure(errors_dir, error_file, vec![err.to_string()])?;
            return Ok(FileReport {
                source: path.to_path_buf(),
                name: display_name,
                outcome,
            });
        }
    };

    let error_file = errors_dir.join(format!("{}.err", name.base));
    if error_file.exists() {
        fs::remove_file(&error_file).map_err(|e| BatchError::io(&error_file, e))?;
    }

    let text = fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
    let layout: Layout = config.layout();

    let converted = convert_document(&text, &name.number, &layout)
        .map_err(|err| {
            warn!(document = %display_name, error = %err, "conversion failed");
            err.messages(&display_name)
        })
        .and_then(|fragments| match template.render(&fragments.main) {
            Ok(rendered) => Ok((fragments, rendered)),
            Err(err) => {
                warn!(document = %display_name, error = %err, "template rendering failed");
                Err(vec![
                    format!("Error processing document: {}", display_name),
                    format!("  {}", err),
                ])
            }
        });

    let outcome = match converted {
        Ok((fragments, rendered)) => {
            fs::create_dir_all(xml_dir).map_err(|e| BatchError::io(xml_dir, e))?;

            let main = xml_dir.join(format!("{}_main.xml", name.base));
            let apparatus = xml_dir.join(format!("{}_app.xml", name.base));
            fs::write(&main, rendered).map_err(|e| BatchError::io(&main, e))?;
            fs::write(&apparatus, fragments.apparatus_xml())
                .map_err(|e| BatchError::io(&apparatus, e))?;

            info!(
                document = %display_name,
                footnotes = fragments.apparatus.iter().filter(|l| l.starts_with("<app ")).count(),
                "converted document"
            );
            Outcome::Converted { main, apparatus }
        }
        Err(messages) => write_failure(errors_dir, error_file, messages)?,
    };

    Ok(FileReport {
        source: path.to_path_buf(),
        name: display_name,
        outcome,
    })
}

/// Write the messages, one per line, to the error file
fn write_failure(
    errors_dir: &Path,
    error_file: PathBuf,
    messages: Vec<String>,
) -> Result<Outcome, BatchError> {
    fs::create_dir_all(errors_dir).map_err(|e| BatchError::io(errors_dir, e))?;
    let mut report = messages.join("\n");
    report.push('\n');
    fs::write(&error_file, report).map_err(|e| BatchError::io(&error_file, e))?;
    Ok(Outcome::Failed {
        error_file,
        messages,
    })
}

/// All transcription files directly inside `dir`, sorted by name
pub fn source_files(dir: &Path) -> Result<Vec<PathBuf>, BatchError> {
    let entries = fs::read_dir(dir).map_err(|e| BatchError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BatchError::io(dir, e))?.path();
        let is_source = path.is_file()
            && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION);
        if is_source {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Convert every transcription file in `dir`
pub fn process_directory(
    dir: &Path,
    template: &Template,
    config: &ExegisConfig,
) -> Result<BatchReport, BatchError> {
    template.check()?;
    let files = source_files(dir)?;
    info!(directory = %dir.display(), files = files.len(), "processing directory");

    let results: Vec<(PathBuf, Result<FileReport, BatchError>)> = files
        .into_par_iter()
        .map(|path| {
            let result = process_file(&path, template, config);
            (path, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (path, result) in results {
        match result {
            Ok(file) => report.files.push(file),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "unable to process file");
                report.errors.push((path, err));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exegis::config::Loader;
    use tempfile::TempDir;

    const VALID: &str = "Title\n1.\nAphorism text*1* [A 12].\nCommentary one.\n*1*text ] A: other B.\n";

    fn setup() -> (TempDir, ExegisConfig) {
        let dir = TempDir::new().expect("temp dir");
        let config = Loader::new()
            .set_override("output.xml_dir", dir.path().join("XML").to_string_lossy().into_owned())
            .expect("override")
            .set_override(
                "output.errors_dir",
                dir.path().join("errors").to_string_lossy().into_owned(),
            )
            .expect("override")
            .build()
            .expect("config");
        (dir, config)
    }

    fn template() -> Template {
        Template::new("<body>\n#INSERT#</body>\n", "#INSERT#", "test")
    }

    #[test]
    fn test_document_name() {
        let name = DocumentName::from_path(Path::new("in/hipp_aph_12.txt")).unwrap();
        assert_eq!(name.base, "hipp_aph_12");
        assert_eq!(name.number, "12");
        assert!(DocumentName::from_path(Path::new("noextension_1")).is_err());
        assert!(DocumentName::from_path(Path::new("nounderscore.txt")).is_err());
        assert!(DocumentName::from_path(Path::new("trailing_.txt")).is_err());
    }

    #[test]
    fn test_process_file_writes_both_xml_files() {
        let (dir, config) = setup();
        let source = dir.path().join("text_3.txt");
        fs::write(&source, VALID).unwrap();

        let report = process_file(&source, &template(), &config).unwrap();
        assert!(report.is_converted());
        assert_eq!(report.name, "text_3.txt");

        let main = fs::read_to_string(dir.path().join("XML/text_3_main.xml")).unwrap();
        assert!(main.starts_with("<body>\n<div n=\"3\" type=\"Title_section\">\n"));
        assert!(main.ends_with("</div>\n</body>\n"));
        let app = fs::read_to_string(dir.path().join("XML/text_3_app.xml")).unwrap();
        assert!(app.starts_with("<app from=\"#begin_fn1\" to=\"#end_fn1\">\n"));
        assert!(!dir.path().join("errors/text_3.err").exists());
    }

    #[test]
    fn test_failure_writes_error_file_only() {
        let (dir, config) = setup();
        let source = dir.path().join("broken_1.txt");
        fs::write(&source, "1.\nno markers at all\n").unwrap();

        let report = process_file(&source, &template(), &config).unwrap();
        match &report.outcome {
            Outcome::Failed { messages, .. } => {
                assert_eq!(messages[0], "Error processing document: broken_1.txt");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        let err = fs::read_to_string(dir.path().join("errors/broken_1.err")).unwrap();
        assert!(err.starts_with("Error processing document: broken_1.txt\n"));
        assert!(!dir.path().join("XML/broken_1_main.xml").exists());
    }

    #[test]
    fn test_stale_error_file_is_removed() {
        let (dir, config) = setup();
        fs::create_dir_all(dir.path().join("errors")).unwrap();
        fs::write(dir.path().join("errors/text_1.err"), "old").unwrap();
        let source = dir.path().join("text_1.txt");
        fs::write(&source, VALID).unwrap();

        process_file(&source, &template(), &config).unwrap();
        assert!(!dir.path().join("errors/text_1.err").exists());
    }

    #[test]
    fn test_process_directory_isolates_failures() {
        let (dir, config) = setup();
        let input = dir.path().join("in");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("b_2.txt"), "1.\nno markers\n").unwrap();
        fs::write(input.join("a_1.txt"), VALID).unwrap();
        fs::write(input.join("notes.md"), "ignored").unwrap();
        fs::write(input.join("badname.txt"), VALID).unwrap();

        let report = process_directory(&input, &template(), &config).unwrap();
        let names: Vec<&str> = report.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a_1.txt", "b_2.txt", "badname.txt"]);
        assert_eq!(report.converted().count(), 1);
        assert_eq!(report.failed().count(), 2);
        assert!(report.errors.is_empty());
        assert!(!report.is_success());
    }

    #[test]
    fn test_bad_file_name_writes_error_file() {
        let (dir, config) = setup();
        let source = dir.path().join("badname.txt");
        fs::write(&source, VALID).unwrap();

        let report = process_file(&source, &template(), &config).unwrap();
        assert!(!report.is_converted());
        let err = fs::read_to_string(dir.path().join("errors/badname.err")).unwrap();
        assert_eq!(err, "File name has incorrect format: badname.txt\n");
        assert!(!dir.path().join("XML").exists());
    }

    #[test]
    fn test_template_failure_writes_error_file() {
        let (dir, config) = setup();
        let source = dir.path().join("text_4.txt");
        fs::write(&source, VALID).unwrap();
        let bad = Template::new("<body/>", "#INSERT#", "bad.xml");

        let report = process_file(&source, &bad, &config).unwrap();
        assert!(!report.is_converted());
        let err = fs::read_to_string(dir.path().join("errors/text_4.err")).unwrap();
        assert_eq!(
            err,
            "Error processing document: text_4.txt\n  Unable to find template marker text (#INSERT#) in file bad.xml\n"
        );
        assert!(!dir.path().join("XML/text_4_main.xml").exists());
    }

    #[test]
    fn test_template_without_marker_is_rejected_up_front() {
        let (dir, config) = setup();
        let bad = Template::new("<body/>", "#INSERT#", "bad.xml");
        assert!(matches!(
            process_directory(dir.path(), &bad, &config),
            Err(BatchError::Template(_))
        ));
    }
}
