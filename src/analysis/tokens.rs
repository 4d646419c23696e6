use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<]+?>").unwrap());
// Alphanumeric runs, optionally joined by single hyphens or slashes:
// "ci/cd" and "front-end" stay whole.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:[/\-][A-Za-z0-9]+)*").unwrap());

/// Tokens excluded from frequency analysis as noise. Data, not logic: pass a
/// different set to `Tokenizer::new` to replace it.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    // Numbers
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "00", "10", "11", "12", "13", "14", "15",
    "16", "17", "18", "19", "20", "30", "39", "50", "60", "70", "80", "90", "100", "000",
    // English function words
    "and", "the", "to", "of", "you", "in", "with", "for", "a", "an", "is", "are", "be",
    "been", "have", "has", "had", "will", "would", "could", "should", "may", "might",
    "this", "that", "these", "those", "he", "she", "it", "they", "we", "us", "our",
    // Generic IT filler
    "skills", "back", "end", "experience", "work", "working", "job", "position",
    "role", "team", "project", "projects", "development", "developer", "specialist",
    "engineer", "technology", "technologies", "months", "years", "code", "review",
    "senior", "junior", "middle", "lead", "data", "science", "web", "your",
    "can", "must", "need", "good", "strong", "excellent", "high", "low",
    "design", "support", "on", "node", "js",
    // Company names, not technologies
    "ozon", "yandex", "google", "microsoft", "apple", "amazon", "facebook", "meta",
    "sber", "tinkoff", "avito", "wildberries", "kaspersky", "jetbrains",
    // Schedule / posting noise
    "b2b", "b2c", "java", "schedule", "remote", "office", "salary",
    // Markup artifacts surviving tag stripping
    "quot", "ru", "etc", "er", "e", "o", "nbsp", "amp", "gt", "lt", "strong", "em", "br",
    "div", "span", "p", "ul", "li", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Extracts normalized word and compound-word tokens from markup-laden text.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new<I>(stop_words: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Tokenizer {
            stop_words: stop_words
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Strip markup, extract tokens, lowercase, drop short and stop-listed
    /// ones. Input order is preserved and duplicates retained; counting
    /// happens downstream.
    pub fn extract_tokens(&self, text: &str) -> Vec<String> {
        let clean = TAG_RE.replace_all(text, " ");
        WORD_RE
            .find_iter(&clean)
            .map(|m| m.as_str().to_lowercase())
            .filter(|w| w.len() >= 2 && !self.stop_words.contains(w))
            .collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new(DEFAULT_STOP_WORDS)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_tokens_survive_stop_filtering() {
        let t = Tokenizer::new(["and", "experience", "node", "js"]);
        let tokens = t.extract_tokens("<b>CI/CD and Node.js experience</b>");
        assert_eq!(tokens, vec!["ci/cd"]);
    }

    #[test]
    fn hyphenated_compounds_stay_whole() {
        let t = Tokenizer::new(Vec::<&str>::new());
        let tokens = t.extract_tokens("front-end and back-end");
        assert_eq!(tokens, vec!["front-end", "and", "back-end"]);
    }

    #[test]
    fn short_tokens_dropped() {
        let t = Tokenizer::new(Vec::<&str>::new());
        let tokens = t.extract_tokens("a Go k8s x");
        assert_eq!(tokens, vec!["go", "k8s"]);
    }

    #[test]
    fn duplicates_and_order_retained() {
        let t = Tokenizer::new(Vec::<&str>::new());
        let tokens = t.extract_tokens("rust go rust");
        assert_eq!(tokens, vec!["rust", "go", "rust"]);
    }

    #[test]
    fn default_set_filters_markup_artifacts() {
        let t = Tokenizer::default();
        let tokens = t.extract_tokens("Kubernetes &amp; Docker nbsp");
        assert_eq!(tokens, vec!["kubernetes", "docker"]);
    }

    #[test]
    fn tags_never_become_tokens() {
        let t = Tokenizer::new(Vec::<&str>::new());
        let tokens = t.extract_tokens("<ul><li>Kafka</li></ul>");
        assert_eq!(tokens, vec!["kafka"]);
    }
}
