use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VALID: &str = "On the art\n1.\nLife is short*1* [A 12].\nCommentary one.\n*1*short ] A: brief B.\n";
const BROKEN: &str = "1.\nLife is short [A 12].\n*1*short ] A: brief B.\n";

fn workspace() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::create_dir_all(dir.path().join("in")).expect("input dir");
    dir
}

#[test]
fn convert_directory_writes_xml_and_reports_failures() {
    let dir = workspace();
    fs::write(dir.path().join("in/hipp_1.txt"), VALID).unwrap();
    fs::write(dir.path().join("in/hipp_2.txt"), BROKEN).unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("convert")
        .arg(dir.path().join("in"))
        .arg("--xml-dir")
        .arg(dir.path().join("XML"))
        .arg("--errors-dir")
        .arg(dir.path().join("errors"));

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Processing: hipp_1.txt"))
        .stdout(predicate::str::contains(
            "Error: unable to process hipp_2.txt, see file in errors folder.",
        ));

    let main = fs::read_to_string(dir.path().join("XML/hipp_1_main.xml")).unwrap();
    assert!(main.contains("<div n=\"1\" type=\"Title_section\">"));
    assert!(main.contains("<TEI"));
    assert!(dir.path().join("XML/hipp_1_app.xml").exists());
    assert!(!dir.path().join("XML/hipp_2_main.xml").exists());

    let errors = fs::read_to_string(dir.path().join("errors/hipp_2.err")).unwrap();
    assert!(errors.starts_with("Error processing document: hipp_2.txt"));
}

#[test]
fn convert_single_file_with_layout_flags() {
    let dir = workspace();
    let source = dir.path().join("in/hipp_7.txt");
    fs::write(&source, VALID).unwrap();
    let template = dir.path().join("template.xml");
    fs::write(&template, "<body>\n#INSERT#</body>\n").unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("convert")
        .arg(&source)
        .arg("--template")
        .arg(&template)
        .arg("--indent")
        .arg("2")
        .arg("--offset")
        .arg("1")
        .arg("--xml-dir")
        .arg(dir.path().join("XML"))
        .arg("--errors-dir")
        .arg(dir.path().join("errors"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Processing: hipp_7.txt"));

    let main = fs::read_to_string(dir.path().join("XML/hipp_7_main.xml")).unwrap();
    assert!(main.starts_with("<body>\n  <div n=\"7\" type=\"Title_section\">\n    <ab>\n"));
    assert!(main.ends_with("  </div>\n</body>\n"));
}

#[test]
fn convert_rejects_template_without_marker() {
    let dir = workspace();
    let source = dir.path().join("in/hipp_1.txt");
    fs::write(&source, VALID).unwrap();
    let template = dir.path().join("template.xml");
    fs::write(&template, "<body/>").unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("convert").arg(&source).arg("--template").arg(&template);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unable to find template marker text (#INSERT#)"));
}

#[test]
fn check_reports_footnote_violations() {
    let dir = workspace();
    let source = dir.path().join("in/hipp_1.txt");
    fs::write(&source, "1.\nLife is short*1*\n*1*short ] A, C: brief B.\n").unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("check").arg(&source);

    cmd.assert().failure().stdout(predicate::str::contains(
        "Error in footnote 1: standard variation should not contain \",\" character",
    ));
}

#[test]
fn check_accepts_valid_document() {
    let dir = workspace();
    let source = dir.path().join("in/hipp_1.txt");
    fs::write(&source, VALID).unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("check").arg(&source);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hipp_1.txt: 1 footnotes, no format errors"));
}

#[test]
fn tokens_prints_json() {
    let dir = workspace();
    let source = dir.path().join("in/hipp_1.txt");
    fs::write(&source, VALID).unwrap();

    let mut cmd = cargo_bin_cmd!("exegis");
    cmd.arg("tokens").arg(&source);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"FootnoteMarker\": 1"))
        .stdout(predicate::str::contains("\"WitnessRefOpen\""));
}
