//! Frequency ranking of stem matches.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TOP_K;
use crate::corpus::Corpus;
use crate::error::PatternResult;
use crate::pattern::StemPattern;

/// One ranked completion of a stem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Completion {
    /// The completed word, lowercase.
    pub word: String,
    /// Corpus frequency score in [0, 1]; 0 when the word has no score.
    pub freq_score: f64,
}

impl Completion {
    /// Create a completion.
    pub fn new(word: impl Into<String>, freq_score: f64) -> Self {
        Self {
            word: word.into(),
            freq_score,
        }
    }
}

/// Sort completions by score, highest first, and keep the first `top_k`.
///
/// Equal scores are ordered alphabetically so output is reproducible.
pub fn rank(mut completions: Vec<Completion>, top_k: usize) -> Vec<Completion> {
    if top_k == 0 {
        return Vec::new();
    }
    completions.sort_by(|a, b| {
        b.freq_score
            .total_cmp(&a.freq_score)
            .then_with(|| a.word.cmp(&b.word))
    });
    completions.truncate(top_k);
    completions
}

/// Matches stems against a corpus and ranks the results.
#[derive(Debug, Clone, Copy)]
pub struct StemCompleter<'c> {
    corpus: &'c Corpus,
    top_k: usize,
}

impl<'c> StemCompleter<'c> {
    /// Create a completer keeping [`DEFAULT_TOP_K`] results per stem.
    pub const fn new(corpus: &'c Corpus) -> Self {
        Self {
            corpus,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Keep at most `top_k` completions per stem.
    pub const fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Completions kept per stem.
    pub const fn top_k(&self) -> usize {
        self.top_k
    }

    /// Compile `stem` and return its ranked completions.
    #[tracing::instrument(skip(self), fields(top_k = self.top_k))]
    pub fn complete(&self, stem: &str) -> PatternResult<Vec<Completion>> {
        let pattern = StemPattern::compile(stem)?;
        Ok(self.complete_pattern(&pattern))
    }

    /// Ranked completions for an already compiled pattern.
    pub fn complete_pattern(&self, pattern: &StemPattern) -> Vec<Completion> {
        let matches: Vec<Completion> = pattern
            .matches(self.corpus)
            .map(|word| Completion::new(word, self.corpus.frequency(word)))
            .collect();
        tracing::debug!(stem = %pattern, matches = matches.len(), "matched stem");
        rank(matches, self.top_k)
    }
}
