//! Footnote format validation
//!
//! Every footnote line is checked before any XML is generated. Checks run independently per
//! footnote and all violations across the whole footnote block are collected, so a single
//! run reports everything an editor has to fix. A non-empty result is the gate that stops
//! the document from being converted.
//!
//! Checks, in order:
//!
//!     - exactly two `*` characters, the first character is `*`, the last is `.`
//!     - the number between the two `*` matches the footnote's position (1-based)
//!     - exactly one `]`
//!     - no `codd` and no `;` (either one ends the checks for that footnote)
//!     - the grammar of its variant kind: comma / colon counts and the keyword sitting right
//!       after its delimiter (` om. ` after `:`, ` add. `, ` correxi: `, ` conieci: ` after
//!       `]`). The positional checks also catch a footnote that was classified by a keyword
//!       appearing inside its variant text.

use super::classifier::VariantKind;

/// Validate all footnote lines; empty lines are skipped and do not count as footnotes
pub fn validate_footnotes<'a, I>(footnotes: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    footnotes
        .into_iter()
        .map(str::trim)
        .filter(|footnote| !footnote.is_empty())
        .enumerate()
        .flat_map(|(index, footnote)| check_footnote(footnote, index + 1))
        .collect()
}

/// All violations of a single trimmed, non-empty footnote line at position `number`
pub fn check_footnote(footnote: &str, number: usize) -> Vec<String> {
    let mut violations = Vec::new();
    let mut report = |message: String| {
        violations.push(format!("Error in footnote {}: {}", number, message));
    };

    if footnote.matches('*').count() != 2 {
        report("should contain two \"*\" characters".to_string());
    }
    if !footnote.starts_with('*') {
        report("first character is not an \"*\"".to_string());
    }
    if !footnote.ends_with('.') {
        report("last character is not an \".\"".to_string());
    }

    let rest = footnote.trim_start_matches('*');
    let (found, body) = rest.split_once('*').unwrap_or((rest, ""));
    if found.trim().parse::<usize>().ok() != Some(number) {
        report(format!(
            "expected footnote {} but found footnote {}",
            number, found
        ));
    }

    if body.matches(']').count() != 1 {
        report("should contain one \"]\" character".to_string());
    }

    if body.contains("codd") {
        report("contains \"codd\"".to_string());
        return violations;
    }
    if body.contains(';') {
        report("contains \";\"".to_string());
        return violations;
    }

    match VariantKind::classify(body) {
        VariantKind::Omission => {
            if body.contains(',') {
                report("omission should not contain \",\" character".to_string());
            }
            if body.matches(':').count() != 1 {
                report("omission should contain one \":\" character".to_string());
            }
            let (_, after_colon) = body.split_once(':').unwrap_or((body, ""));
            if !after_colon.starts_with(" om. ") {
                report("omission must contain \" om. \" after \":\"".to_string());
            }
        }
        VariantKind::Addition => {
            if !after_bracket(body).starts_with(" add. ") {
                report("addition must contain \" add. \" after \"]\"".to_string());
            }
        }
        VariantKind::Correxi => {
            if !after_bracket(body).starts_with(" correxi: ") {
                report("correxi must contain \" correxi: \" after \"]\"".to_string());
            }
        }
        VariantKind::Conieci => {
            if !after_bracket(body).starts_with(" conieci: ") {
                report("conieci must contain \" conieci: \" after \"]\"".to_string());
            }
        }
        VariantKind::StandardVariant => {
            if body.contains(',') {
                report("standard variation should not contain \",\" character".to_string());
            }
            if body.matches(':').count() != 1 {
                report("standard variation should contain one \":\" character".to_string());
            }
        }
    }

    violations
}

fn after_bracket(body: &str) -> &str {
    body.split_once(']').map(|(_, tail)| tail).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("*1*ssss ] W1: om. W2.")]
    #[case("*1*ssss ] add. tttt W1.")]
    #[case("*1*ssss ] add. tttt W1, W2.")]
    #[case("*1*ssss ] add. tttt W1: uuuu W2.")]
    #[case("*1*ssss ] correxi: tttt W1, W2.")]
    #[case("*1*ssss ] correxi: tttt W1: uuuu W2.")]
    #[case("*1*ssss ] conieci: tttt W1, W2.")]
    #[case("*1*ssss ] conieci: tttt W1: uuuu W2.")]
    #[case("*1*ssss ] W1: tttt W2.")]
    fn test_documented_forms_are_valid(#[case] footnote: &str) {
        assert_eq!(check_footnote(footnote, 1), Vec::<String>::new());
    }

    #[test]
    fn test_wrong_sequence_number_names_position() {
        let violations = validate_footnotes(["*1*a ] A: b B.", "*3*a ] A: b B."]);
        assert_eq!(
            violations,
            vec!["Error in footnote 2: expected footnote 2 but found footnote 3".to_string()]
        );
    }

    #[test]
    fn test_empty_lines_do_not_count() {
        let violations = validate_footnotes(["*1*a ] A: b B.", "", "   ", "*2*a ] A: b B."]);
        assert!(violations.is_empty());
    }

    #[test]
    fn test_structural_violations_accumulate() {
        let violations = check_footnote("1*a A: b B", 1);
        assert_eq!(
            violations,
            vec![
                "Error in footnote 1: should contain two \"*\" characters".to_string(),
                "Error in footnote 1: first character is not an \"*\"".to_string(),
                "Error in footnote 1: last character is not an \".\"".to_string(),
                "Error in footnote 1: should contain one \"]\" character".to_string(),
            ]
        );
    }

    #[test]
    fn test_forbidden_substrings_stop_format_checks() {
        // The comma would be a standard-variation violation, but codd ends the checks first
        assert_eq!(
            check_footnote("*1*a ] codd, b B.", 1),
            vec!["Error in footnote 1: contains \"codd\"".to_string()]
        );
        assert_eq!(
            check_footnote("*1*a ] A; b B.", 1),
            vec!["Error in footnote 1: contains \";\"".to_string()]
        );
    }

    #[test]
    fn test_omission_format() {
        let violations = check_footnote("*1*a ] A, C: om. B.", 1);
        assert_eq!(
            violations,
            vec!["Error in footnote 1: omission should not contain \",\" character".to_string()]
        );

        let violations = check_footnote("*1*a ] A:om. B.", 1);
        assert_eq!(
            violations,
            vec!["Error in footnote 1: omission must contain \" om. \" after \":\"".to_string()]
        );
    }

    #[test]
    fn test_keyword_inside_variant_text_is_flagged() {
        // A standard variation whose variant text happens to contain "add."
        let violations = check_footnote("*1*a ] A: b add. B.", 1);
        assert_eq!(
            violations,
            vec!["Error in footnote 1: addition must contain \" add. \" after \"]\"".to_string()]
        );
    }

    #[test]
    fn test_correxi_and_conieci_position() {
        assert_eq!(
            check_footnote("*1*a ] correxi tttt A, B.", 1),
            vec!["Error in footnote 1: correxi must contain \" correxi: \" after \"]\"".to_string()]
        );
        assert_eq!(
            check_footnote("*1*a ]conieci: tttt A, B.", 1),
            vec!["Error in footnote 1: conieci must contain \" conieci: \" after \"]\"".to_string()]
        );
    }

    #[test]
    fn test_standard_variation_format() {
        assert_eq!(
            check_footnote("*1*a ] A: b B: c C.", 1),
            vec![
                "Error in footnote 1: standard variation should contain one \":\" character"
                    .to_string()
            ]
        );
    }
}
