/// Default search query sent to the listing API (title-only search).
pub const DEFAULT_QUERY: &str = "golang OR go developer";

/// Titles must contain at least one of these to pass.
pub const LANGUAGE_KEYWORDS: &[&str] = &["go", "golang"];

/// Titles containing any of these are rejected even when a keyword matches
/// (management / teaching roles).
pub const EXCLUDED_WORDS: &[&str] = &[
    "lead",
    "лид",
    "руководитель",
    "ментор",
    "преподаватель",
    "менеджер",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Relevant,
    /// No inclusion keyword found in the title.
    NoKeyword,
    /// An exclusion word matched; wins over any inclusion match.
    Excluded,
}

/// Inclusion/exclusion substring matcher over vacancy titles. Matching is
/// case-insensitive and not word-boundary-aware.
#[derive(Debug, Clone)]
pub struct TitleFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl TitleFilter {
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        TitleFilter {
            include: include.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
            exclude: exclude.into_iter().map(|s| s.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn check(&self, title: &str) -> Verdict {
        let title = title.to_lowercase();
        if !self.include.iter().any(|kw| title.contains(kw.as_str())) {
            return Verdict::NoKeyword;
        }
        if self.exclude.iter().any(|w| title.contains(w.as_str())) {
            return Verdict::Excluded;
        }
        Verdict::Relevant
    }
}

impl Default for TitleFilter {
    fn default() -> Self {
        TitleFilter::new(LANGUAGE_KEYWORDS, EXCLUDED_WORDS)
    }
}

// ── Tests ──
