//! Command-line interface for exegis
//! Converts aphorism/commentary transcriptions into EpiDoc main-text and apparatus XML.
//!
//! Usage:
//!   exegis convert `<path>` [--template `<file>`] [--config `<file>`]  - Convert a file or every .txt file in a directory
//!   exegis check `<file>`                                             - Validate the footnotes of a transcription
//!   exegis tokens `<file>`                                            - Print the main-text token stream as JSON

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use exegis::exegis::batch::{process_directory, process_file, FileReport, Outcome};
use exegis::exegis::config::{ExegisConfig, Loader};
use exegis::exegis::document::SourceDocument;
use exegis::exegis::error::ConversionError;
use exegis::exegis::lexer::tokenize_with_spans;
use exegis::exegis::logging::{self, Profile};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let matches = Command::new("exegis")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts transcribed aphorisms and commentaries into EpiDoc XML")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log conversion details to stderr")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a transcription file, or every .txt file in a directory")
                .arg(
                    Arg::new("path")
                        .help("Transcription file or directory")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("template")
                        .long("template")
                        .short('t')
                        .help("Template file holding the insertion marker")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .help("Spaces per XML indentation level")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("offset")
                        .long("offset")
                        .help("Indentation levels of the outermost generated elements")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("xml-dir")
                        .long("xml-dir")
                        .help("Output directory for XML files")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("errors-dir")
                        .long("errors-dir")
                        .help("Output directory for error reports")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate the footnote block of a transcription")
                .arg(
                    Arg::new("path")
                        .help("Transcription file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("tokens")
                .about("Print the token stream of the main text as JSON")
                .arg(
                    Arg::new("path")
                        .help("Transcription file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                ),
        )
        .get_matches();

    logging::init(if matches.get_flag("verbose") {
        Profile::Development
    } else {
        Profile::Quiet
    });

    let ok = match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(convert_matches),
        Some(("check", check_matches)) => handle_check_command(required_path(check_matches)),
        Some(("tokens", tokens_matches)) => handle_tokens_command(required_path(tokens_matches)),
        _ => unreachable!(),
    };

    if !ok {
        process::exit(1);
    }
}

fn required_path(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<PathBuf>("path")
        .map(PathBuf::as_path)
        .unwrap_or_else(|| fail("a path is required"))
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Build the configuration from defaults, the optional config file and flags
fn load_config(matches: &ArgMatches) -> ExegisConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }

    let mut overrides: Vec<(&str, config::ValueKind)> = Vec::new();
    if let Some(indent) = matches.get_one::<usize>("indent") {
        overrides.push(("layout.indent_width", (*indent as i64).into()));
    }
    if let Some(offset) = matches.get_one::<usize>("offset") {
        overrides.push(("layout.base_offset", (*offset as i64).into()));
    }
    for (key, flag) in [
        ("template.path", "template"),
        ("output.xml_dir", "xml-dir"),
        ("output.errors_dir", "errors-dir"),
    ] {
        if let Some(path) = matches.get_one::<PathBuf>(flag) {
            overrides.push((key, path.to_string_lossy().into_owned().into()));
        }
    }

    for (key, value) in overrides {
        loader = loader
            .set_override(key, value)
            .unwrap_or_else(|e| fail(&format!("invalid value for {}: {}", key, e)));
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(&format!("unable to load configuration: {}", e)))
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches) -> bool {
    let path = required_path(matches);
    let config = load_config(matches);
    let template = config
        .load_template()
        .unwrap_or_else(|e| fail(&format!("unable to read template: {}", e)));
    if let Err(e) = template.check() {
        fail(&e.to_string());
    }

    if path.is_dir() {
        match process_directory(path, &template, &config) {
            Ok(report) => {
                report.files.iter().for_each(print_report);
                for (file, err) in &report.errors {
                    eprintln!("Error: unable to process {}: {}", file.display(), err);
                }
                report.is_success()
            }
            Err(e) => fail(&e.to_string()),
        }
    } else {
        let name = path
            .file_name()
            .map(|file| file.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Processing: {}", name);
        match process_file(path, &template, &config) {
            Ok(report) => {
                print_failure(&report);
                report.is_converted()
            }
            Err(e) => fail(&e.to_string()),
        }
    }
}

fn print_report(report: &FileReport) {
    println!("Processing: {}", report.name);
    print_failure(report);
}

fn print_failure(report: &FileReport) {
    if let Outcome::Failed { .. } = report.outcome {
        println!(
            "Error: unable to process {}, see file in errors folder.",
            report.name
        );
    }
}

fn read_source(path: &Path) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("unable to read {}: {}", path.display(), e)))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|file| file.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Handle the check command
fn handle_check_command(path: &Path) -> bool {
    let text = read_source(path);
    let name = display_name(path);

    let result = SourceDocument::parse(&text).and_then(|document| {
        document.check_footnotes()?;
        Ok(document.footnotes.len())
    });
    match result {
        Ok(count) => {
            println!("{}: {} footnotes, no format errors", name, count);
            true
        }
        Err(err) => {
            for message in ConversionError::from(err).messages(&name) {
                println!("{}", message);
            }
            false
        }
    }
}

/// Handle the tokens command
fn handle_tokens_command(path: &Path) -> bool {
    let text = read_source(path);
    let document = SourceDocument::parse(&text).unwrap_or_else(|err| {
        for message in ConversionError::from(err).messages(&display_name(path)) {
            eprintln!("{}", message);
        }
        process::exit(1);
    });

    let main_text = document.main_lines.join("\n");
    let tokens = tokenize_with_spans(&main_text);
    let json = serde_json::to_string_pretty(&tokens)
        .unwrap_or_else(|e| fail(&format!("error formatting tokens: {}", e)));
    println!("{}", json);
    true
}
