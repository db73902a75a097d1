//! Variant records and their apparatus encoding
//!
//! A classified footnote body is decoded into a [`VariantRecord`], one variant per grammar,
//! and then written out as the body of an apparatus `<app>` element. Letters in the
//! grammar below follow the usual editorial shorthand: `ssss` is the lemma (the adopted
//! reading), `tttt` / `uuuu` are variant texts and `W1` / `W2` witness codes.
//!
//! Decoding never fails. Each split falls back to an empty part when its delimiter is
//! missing, exactly like splitting on a delimiter that is not there; format correctness is
//! the validator's job and is enforced before any footnote gets here.

use super::classifier::VariantKind;
use crate::exegis::xml::{escape_attr, escape_text, Indent};

/// A reading attested by one witness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub witness: String,
    pub text: String,
}

impl Reading {
    pub fn new(witness: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            witness: witness.into(),
            text: text.into(),
        }
    }

    fn open_tag(&self) -> String {
        format!("<rdg wit=\"#{}\">", escape_attr(&self.witness))
    }

    fn to_xml(&self) -> String {
        format!("{}{}</rdg>", self.open_tag(), escape_text(&self.text))
    }
}

/// A decoded footnote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantRecord {
    /// The lemma is read by one witness and omitted by another
    Omission { lemma: Reading, omitted_in: String },
    /// Each witness group adds its own text to the lemma
    Addition { additions: Vec<Reading> },
    /// The editor corrected the witnesses' readings to `correction`
    Correxi {
        correction: String,
        readings: Vec<Reading>,
    },
    /// The editor conjectures `conjecture` in place of the witnesses' readings
    Conieci {
        conjecture: String,
        readings: Vec<Reading>,
    },
    /// Two witnesses, two readings
    StandardVariant { lemma: Reading, variant: Reading },
}

impl VariantRecord {
    /// Classify and decode a cleaned footnote body (no `*n*` marker, no trailing `.`)
    pub fn parse(body: &str) -> Self {
        match VariantKind::classify(body) {
            VariantKind::Omission => {
                let (head, tail) = partition(body, ":");
                let (text, witness) = partition(head, "]");
                let (_, omitted_in) = partition(tail, "om.");
                VariantRecord::Omission {
                    lemma: Reading::new(witness.trim(), text.trim()),
                    omitted_in: omitted_in.trim().to_string(),
                }
            }
            VariantKind::Addition => {
                let (_, tail) = partition(body, "add.");
                VariantRecord::Addition {
                    additions: split_witness_groups(tail),
                }
            }
            VariantKind::Correxi => {
                let (correction, readings) = split_correction(body);
                VariantRecord::Correxi {
                    correction,
                    readings,
                }
            }
            VariantKind::Conieci => {
                let (conjecture, readings) = split_correction(body);
                VariantRecord::Conieci {
                    conjecture,
                    readings,
                }
            }
            VariantKind::StandardVariant => {
                let (head, tail) = partition(body, ":");
                let (text, witness) = partition(head, "]");
                let (variant_text, variant_witness) = rpartition(tail.trim(), " ");
                VariantRecord::StandardVariant {
                    lemma: Reading::new(witness.trim(), text.trim()),
                    variant: Reading::new(variant_witness.trim(), variant_text.trim()),
                }
            }
        }
    }

    pub fn kind(&self) -> VariantKind {
        match self {
            VariantRecord::Omission { .. } => VariantKind::Omission,
            VariantRecord::Addition { .. } => VariantKind::Addition,
            VariantRecord::Correxi { .. } => VariantKind::Correxi,
            VariantRecord::Conieci { .. } => VariantKind::Conieci,
            VariantRecord::StandardVariant { .. } => VariantKind::StandardVariant,
        }
    }

    /// Witness codes in output order
    pub fn witnesses(&self) -> Vec<&str> {
        match self {
            VariantRecord::Omission { lemma, omitted_in } => {
                vec![lemma.witness.as_str(), omitted_in.as_str()]
            }
            VariantRecord::Addition { additions: readings }
            | VariantRecord::Correxi { readings, .. }
            | VariantRecord::Conieci { readings, .. } => {
                readings.iter().map(|r| r.witness.as_str()).collect()
            }
            VariantRecord::StandardVariant { lemma, variant } => {
                vec![lemma.witness.as_str(), variant.witness.as_str()]
            }
        }
    }

    /// The apparatus lines for this record, one offset unit inside the enclosing `<app>`
    pub fn to_xml(&self, indent: &Indent) -> Vec<String> {
        let mut lines = Vec::new();
        match self {
            VariantRecord::Omission { lemma, omitted_in } => {
                lines.push(indent.line(1, &lemma.to_xml()));
                lines.push(indent.line(
                    1,
                    &format!("<rdg wit=\"#{}\">", escape_attr(omitted_in)),
                ));
                lines.push(indent.line(2, "<gap reason=\"omission\"/>"));
                lines.push(indent.line(1, "</rdg>"));
            }
            VariantRecord::Addition { additions } => {
                for reading in additions {
                    lines.push(indent.line(1, &reading.open_tag()));
                    lines.push(indent.line(
                        2,
                        &format!(
                            "<add reason=\"add_scribe\">{}</add>",
                            escape_text(&reading.text)
                        ),
                    ));
                    lines.push(indent.line(1, "</rdg>"));
                }
            }
            VariantRecord::Correxi {
                correction,
                readings,
            } => {
                push_correction(&mut lines, indent, "<corr>", correction);
                lines.extend(readings.iter().map(|r| indent.line(1, &r.to_xml())));
            }
            VariantRecord::Conieci {
                conjecture,
                readings,
            } => {
                push_correction(&mut lines, indent, "<corr type=\"conjecture\">", conjecture);
                lines.extend(readings.iter().map(|r| indent.line(1, &r.to_xml())));
            }
            VariantRecord::StandardVariant { lemma, variant } => {
                lines.push(indent.line(1, &lemma.to_xml()));
                lines.push(indent.line(1, &variant.to_xml()));
            }
        }
        lines
    }
}

fn push_correction(lines: &mut Vec<String>, indent: &Indent, open: &str, text: &str) {
    lines.push(indent.line(1, "<rdg>"));
    lines.push(indent.line(2, "<choice>"));
    lines.push(indent.line(3, &format!("{}{}</corr>", open, escape_text(text))));
    lines.push(indent.line(2, "</choice>"));
    lines.push(indent.line(1, "</rdg>"));
}

/// `ssss ] correxi: <groups>` -> (ssss, readings of the groups)
fn split_correction(body: &str) -> (String, Vec<Reading>) {
    let (head, tail) = partition(body, ":");
    let (text, _) = partition(head, "]");
    (text.trim().to_string(), split_witness_groups(tail))
}

/// Split the text following a variant keyword into one reading per witness group.
///
/// Colon-separated groups each carry their own text (`tttt W1: uuuu W2`). Without a colon,
/// trailing comma-separated witness codes share the text in front of the first code
/// (`tttt W1, W2`). Groups keep the order in which they are written.
pub fn split_witness_groups(text: &str) -> Vec<Reading> {
    let text = text.trim();

    if text.contains(':') {
        return text
            .split(':')
            .map(|group| {
                let (variant, witness) = rpartition(group.trim(), " ");
                Reading::new(witness.trim(), variant.trim())
            })
            .collect();
    }

    let mut witnesses = Vec::new();
    let mut rest = text;
    while let Some((head, witness)) = rest.rsplit_once(',') {
        witnesses.push(witness.trim());
        rest = head;
    }
    let (variant, witness) = rpartition(rest.trim(), " ");
    witnesses.push(witness.trim());
    witnesses.reverse();

    witnesses
        .into_iter()
        .map(|witness| Reading::new(witness, variant.trim()))
        .collect()
}

/// Split at the first `sep`; without it everything is head
fn partition<'a>(text: &'a str, sep: &str) -> (&'a str, &'a str) {
    text.split_once(sep).unwrap_or((text, ""))
}

/// Split at the last `sep`; without it everything is tail
fn rpartition<'a>(text: &'a str, sep: &str) -> (&'a str, &'a str) {
    text.rsplit_once(sep).unwrap_or(("", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(body: &str) -> Vec<String> {
        VariantRecord::parse(body).to_xml(&Indent::spaces(4))
    }

    #[test]
    fn test_standard_variant() {
        let record = VariantRecord::parse("text ] A: other B");
        assert_eq!(
            record,
            VariantRecord::StandardVariant {
                lemma: Reading::new("A", "text"),
                variant: Reading::new("B", "other"),
            }
        );
        assert_eq!(
            record.to_xml(&Indent::spaces(4)),
            vec![
                "    <rdg wit=\"#A\">text</rdg>",
                "    <rdg wit=\"#B\">other</rdg>"
            ]
        );
    }

    #[test]
    fn test_standard_variant_multiword() {
        let record = VariantRecord::parse("two words ] A: three other words B");
        assert_eq!(record.witnesses(), vec!["A", "B"]);
        if let VariantRecord::StandardVariant { lemma, variant } = record {
            assert_eq!(lemma.text, "two words");
            assert_eq!(variant.text, "three other words");
        } else {
            panic!("expected a standard variant");
        }
    }

    #[test]
    fn test_omission() {
        assert_eq!(
            xml("ssss ] W1: om. W2"),
            vec![
                "    <rdg wit=\"#W1\">ssss</rdg>",
                "    <rdg wit=\"#W2\">",
                "        <gap reason=\"omission\"/>",
                "    </rdg>",
            ]
        );
    }

    #[test]
    fn test_addition_single_witness() {
        assert_eq!(
            xml("ssss ] add. tttt W1"),
            vec![
                "    <rdg wit=\"#W1\">",
                "        <add reason=\"add_scribe\">tttt</add>",
                "    </rdg>",
            ]
        );
    }

    #[test]
    fn test_addition_shared_text_keeps_written_order() {
        let record = VariantRecord::parse("ssss ] add. tttt more W1, W2");
        assert_eq!(
            record,
            VariantRecord::Addition {
                additions: vec![
                    Reading::new("W1", "tttt more"),
                    Reading::new("W2", "tttt more")
                ]
            }
        );
    }

    #[test]
    fn test_addition_distinct_text() {
        let record = VariantRecord::parse("ssss ] add. tttt W1: uuuu W2");
        assert_eq!(
            record,
            VariantRecord::Addition {
                additions: vec![Reading::new("W1", "tttt"), Reading::new("W2", "uuuu")]
            }
        );
    }

    #[test]
    fn test_correxi_shared_text() {
        assert_eq!(
            xml("ssss ] correxi: tttt W1, W2"),
            vec![
                "    <rdg>",
                "        <choice>",
                "            <corr>ssss</corr>",
                "        </choice>",
                "    </rdg>",
                "    <rdg wit=\"#W1\">tttt</rdg>",
                "    <rdg wit=\"#W2\">tttt</rdg>",
            ]
        );
    }

    #[test]
    fn test_correxi_distinct_text() {
        let record = VariantRecord::parse("ssss ] correxi: tttt W1: uuuu W2");
        assert_eq!(
            record,
            VariantRecord::Correxi {
                correction: "ssss".to_string(),
                readings: vec![Reading::new("W1", "tttt"), Reading::new("W2", "uuuu")]
            }
        );
    }

    #[test]
    fn test_conieci_is_tagged_as_conjecture() {
        let lines = xml("ssss ] conieci: tttt W1: uuuu W2");
        assert_eq!(lines[2], "            <corr type=\"conjecture\">ssss</corr>");
        assert_eq!(lines[5], "    <rdg wit=\"#W1\">tttt</rdg>");
        assert_eq!(lines[6], "    <rdg wit=\"#W2\">uuuu</rdg>");
    }

    #[test]
    fn test_split_witness_groups_three_codes() {
        assert_eq!(
            split_witness_groups(" a b C, D, E"),
            vec![
                Reading::new("C", "a b"),
                Reading::new("D", "a b"),
                Reading::new("E", "a b")
            ]
        );
    }

    #[test]
    fn test_space_before_comma_keeps_first_witness() {
        assert_eq!(
            split_witness_groups(" tttt W1 , W2"),
            vec![Reading::new("W1", "tttt"), Reading::new("W2", "tttt")]
        );
    }

    #[test]
    fn test_decoding_never_fails_on_malformed_input() {
        let record = VariantRecord::parse("no delimiters at all");
        assert_eq!(record.kind(), VariantKind::StandardVariant);
        assert_eq!(record.witnesses().len(), 2);
    }

    #[test]
    fn test_escaping() {
        assert_eq!(
            xml("a<b ] A: c&d B"),
            vec![
                "    <rdg wit=\"#A\">a&lt;b</rdg>",
                "    <rdg wit=\"#B\">c&amp;d</rdg>"
            ]
        );
    }
}
