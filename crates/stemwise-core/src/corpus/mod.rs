//! Word corpus: the candidate words and their frequency scores.
//!
//! A [`Corpus`] is built once per run by [`CorpusStore::load_or_build`] and is
//! read-only afterwards. Words are lowercase and unique; iteration order is
//! lexicographic so every run visits candidates in the same order.

mod source;
mod store;

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

pub use source::{HttpSource, WordSource};
pub use store::{CorpusStore, FREQUENCY_CACHE_FILE, WORD_CACHE_FILE};

/// Frequency-ordered list of common English words (also used for scores).
pub const GOOGLE_10K_URL: &str = "https://raw.githubusercontent.com/first20hours/google-10000-english/master/google-10000-english-usa-no-swears.txt";

/// Broad English dictionary, one word per line.
pub const WORDS_ALPHA_URL: &str =
    "https://raw.githubusercontent.com/dwyl/english-words/master/words_alpha.txt";

/// Word lists unioned into a fresh corpus.
pub const DEFAULT_WORD_SOURCES: &[&str] = &[GOOGLE_10K_URL, WORDS_ALPHA_URL];

/// Word list whose ordering defines frequency scores.
pub const DEFAULT_FREQUENCY_SOURCE: &str = GOOGLE_10K_URL;

/// The candidate words plus their frequency scores.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    words: BTreeSet<String>,
    frequencies: HashMap<String, f64>,
}

impl Corpus {
    /// Build a corpus, normalizing every word (trimmed, lowercase, non-empty).
    pub fn new<I, S>(words: I, frequencies: HashMap<String, f64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .collect();
        Self { words, frequencies }
    }

    /// Candidate words in lexicographic order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Frequency score for `word`, or 0.0 when it has none.
    pub fn frequency(&self, word: &str) -> f64 {
        self.frequencies.get(word).copied().unwrap_or(0.0)
    }

    /// Number of candidate words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the corpus has no candidate words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of words carrying a frequency score.
    pub fn scored_len(&self) -> usize {
        self.frequencies.len()
    }
}

/// Trim and lowercase a raw token, dropping empty ones.
pub(crate) fn normalize(raw: &str) -> Option<String> {
    let word = raw.trim();
    if word.is_empty() {
        None
    } else {
        Some(word.to_lowercase())
    }
}

/// Score each word of a frequency-ordered list by its rank.
///
/// The word at zero-based rank `i` of `n` scores `1 - i / n`: the first word
/// scores 1.0 and the last scores just above 0.0. A word listed twice keeps
/// the score of its later position.
pub fn scores_from_ranked_list(text: &str) -> HashMap<String, f64> {
    let ranked: Vec<&str> = text.split_whitespace().collect();
    let total = ranked.len() as f64;
    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, word)| (word.to_lowercase(), 1.0 - rank as f64 / total))
        .collect()
}

/// What happened while building a corpus.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// Words came from the cache file rather than remote sources.
    pub words_cached: bool,
    /// Frequencies came from the cache file rather than a remote source.
    pub frequencies_cached: bool,
    /// One entry per remote fetch attempted, in fetch order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReport>,
}

impl BuildReport {
    /// Sources whose fetch failed.
    pub fn failures(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources
            .iter()
            .filter(|s| matches!(s.outcome, SourceOutcome::Failed { .. }))
    }

    /// Whether any fetch failed.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Outcome of fetching one remote source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    /// Source name (its URL for HTTP sources).
    pub source: String,
    /// What the source was fetched for.
    pub role: SourceRole,
    /// Success with a token count, or the failure reason.
    #[serde(flatten)]
    pub outcome: SourceOutcome,
}

/// Why a source was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRole {
    /// Contributes candidate words.
    Words,
    /// Defines frequency scores.
    Frequencies,
}

/// Result of a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceOutcome {
    /// Fetched; `count` distinct words were read.
    Loaded {
        /// Distinct words read from the source.
        count: usize,
    },
    /// Fetch failed and was skipped.
    Failed {
        /// Error description.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_normalized_and_deduplicated() {
        let corpus = Corpus::new(["Honor", " honor ", "", "HONEY", "  "], HashMap::new());
        let words: Vec<&str> = corpus.words().collect();
        assert_eq!(words, vec!["honey", "honor"]);
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn unscored_words_default_to_zero() {
        let frequencies = HashMap::from([("honor".to_string(), 0.8)]);
        let corpus = Corpus::new(["honor", "hongs"], frequencies);
        assert!((corpus.frequency("honor") - 0.8).abs() < f64::EPSILON);
        assert_eq!(corpus.frequency("hongs"), 0.0);
        assert_eq!(corpus.scored_len(), 1);
    }

    #[test]
    fn ranked_list_scores_descend_from_one() {
        let scores = scores_from_ranked_list("the\nOf\nand\nto\n");
        assert_eq!(scores.len(), 4);
        assert!((scores["the"] - 1.0).abs() < f64::EPSILON);
        assert!((scores["of"] - 0.75).abs() < f64::EPSILON);
        assert!((scores["to"] - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_ranked_list_scores_nothing() {
        assert!(scores_from_ranked_list("   \n").is_empty());
    }

    #[test]
    fn report_lists_failures() {
        let report = BuildReport {
            words_cached: false,
            frequencies_cached: false,
            sources: vec![
                SourceReport {
                    source: "a".into(),
                    role: SourceRole::Words,
                    outcome: SourceOutcome::Loaded { count: 3 },
                },
                SourceReport {
                    source: "b".into(),
                    role: SourceRole::Words,
                    outcome: SourceOutcome::Failed {
                        reason: "timeout".into(),
                    },
                },
            ],
        };
        assert!(report.has_failures());
        let failed: Vec<&str> = report.failures().map(|s| s.source.as_str()).collect();
        assert_eq!(failed, vec!["b"]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sources"][1]["status"], "failed");
        assert_eq!(json["sources"][0]["count"], 3);
    }
}
