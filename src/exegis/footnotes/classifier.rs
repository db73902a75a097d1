//! Footnote classification
//!
//! A footnote body belongs to exactly one of five variant grammars. The decision is a
//! case-sensitive substring test in a fixed priority order: omission, addition, correxi,
//! conieci, and finally the standard variant as the fallback. A body that contains the
//! keywords of several grammars always takes the first one in that order.

/// The five kinds of textual variation a footnote can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// `ssss ] W1: om. W2`
    Omission,
    /// `ssss ] add. tttt W1` (and the comma / colon group forms)
    Addition,
    /// `ssss ] correxi: tttt W1, W2` or `ssss ] correxi: tttt W1: uuuu W2`
    Correxi,
    /// `ssss ] conieci: tttt W1, W2` or `ssss ] conieci: tttt W1: uuuu W2`
    Conieci,
    /// `ssss ] W1: tttt W2`
    StandardVariant,
}

impl VariantKind {
    /// Keyword tests in priority order
    const PRIORITY: [(&'static str, VariantKind); 4] = [
        ("om.", VariantKind::Omission),
        ("add.", VariantKind::Addition),
        ("correxi", VariantKind::Correxi),
        ("conieci", VariantKind::Conieci),
    ];

    /// Classify a cleaned footnote body
    pub fn classify(body: &str) -> Self {
        Self::PRIORITY
            .iter()
            .find(|(keyword, _)| body.contains(keyword))
            .map(|(_, kind)| *kind)
            .unwrap_or(VariantKind::StandardVariant)
    }

    /// The keyword that selects this kind, if any
    pub fn keyword(&self) -> Option<&'static str> {
        Self::PRIORITY
            .iter()
            .find(|(_, kind)| kind == self)
            .map(|(keyword, _)| *keyword)
    }
}

impl std::fmt::Display for VariantKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantKind::Omission => write!(f, "omission"),
            VariantKind::Addition => write!(f, "addition"),
            VariantKind::Correxi => write!(f, "correxi"),
            VariantKind::Conieci => write!(f, "conieci"),
            VariantKind::StandardVariant => write!(f, "standard variation"),
        }
    }
}
