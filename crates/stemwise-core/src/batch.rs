//! Batch completion over a file of stems.
//!
//! Each stem is completed independently. A malformed stem becomes a
//! [`StemOutcome::Failed`] entry and the rest of the batch still runs.
//! Successful stems are collected into a [`ResultSet`], the JSON file the
//! report formatters read.

use std::fmt;
use std::fs;

use camino::Utf8Path;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{BatchError, BatchResult, PatternError};
use crate::rank::{Completion, StemCompleter};

/// Stems from text: one per line, trimmed, blank lines skipped.
pub fn parse_stems(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read stems from a file.
pub fn read_stems(path: &Utf8Path) -> BatchResult<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| BatchError::ReadStems {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_stems(&text))
}

/// What happened to one stem.
#[derive(Debug, Clone, PartialEq)]
pub enum StemOutcome {
    /// Ranked completions; may be empty.
    Completed(Vec<Completion>),
    /// The stem could not be compiled.
    Failed(PatternError),
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct BatchRun {
    outcomes: Vec<(String, StemOutcome)>,
}

impl BatchRun {
    /// Every stem with its outcome, in input order.
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, &StemOutcome)> {
        self.outcomes.iter().map(|(stem, outcome)| (stem.as_str(), outcome))
    }

    /// Stems that failed to compile.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &PatternError)> {
        self.outcomes.iter().filter_map(|(stem, outcome)| match outcome {
            StemOutcome::Failed(err) => Some((stem.as_str(), err)),
            StemOutcome::Completed(_) => None,
        })
    }

    /// Number of stems processed.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no stems were processed.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// The completed stems as a result set (failed stems left out).
    pub fn results(&self) -> ResultSet {
        let mut set = ResultSet::default();
        for (stem, outcome) in &self.outcomes {
            if let StemOutcome::Completed(completions) = outcome {
                set.insert(stem.clone(), completions.clone());
            }
        }
        set
    }
}

/// Complete every stem in order.
pub fn run_batch<S: AsRef<str>>(completer: &StemCompleter<'_>, stems: &[S]) -> BatchRun {
    run_batch_with(completer, stems, |_, _, _| {})
}

/// Complete every stem in order, calling `on_stem(index, stem, outcome)` after each.
#[tracing::instrument(skip_all, fields(stems = stems.len(), top_k = completer.top_k()))]
pub fn run_batch_with<S, F>(completer: &StemCompleter<'_>, stems: &[S], mut on_stem: F) -> BatchRun
where
    S: AsRef<str>,
    F: FnMut(usize, &str, &StemOutcome),
{
    let mut run = BatchRun::default();
    for (index, stem) in stems.iter().enumerate() {
        let stem = stem.as_ref();
        let outcome = match completer.complete(stem) {
            Ok(completions) => StemOutcome::Completed(completions),
            Err(err) => {
                tracing::warn!(stem, error = %err, "skipping malformed stem");
                StemOutcome::Failed(err)
            }
        };
        on_stem(index, stem, &outcome);
        run.outcomes.push((stem.to_string(), outcome));
    }
    tracing::info!(
        processed = run.len(),
        failed = run.failures().count(),
        "batch complete"
    );
    run
}

/// Stem → ranked completions, in the order stems were first seen.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, Vec<Completion>)>,
}

impl ResultSet {
    /// Insert or replace the completions for `stem`.
    ///
    /// A replaced stem keeps its original position.
    pub fn insert(&mut self, stem: impl Into<String>, completions: Vec<Completion>) {
        let stem = stem.into();
        if let Some(entry) = self.entries.iter_mut().find(|(s, _)| *s == stem) {
            entry.1 = completions;
        } else {
            self.entries.push((stem, completions));
        }
    }

    /// Completions for `stem`, if present.
    pub fn get(&self, stem: &str) -> Option<&[Completion]> {
        self.entries
            .iter()
            .find(|(s, _)| s == stem)
            .map(|(_, c)| c.as_slice())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Completion])> {
        self.entries
            .iter()
            .map(|(stem, completions)| (stem.as_str(), completions.as_slice()))
    }

    /// Number of stems.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no stems.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write as pretty-printed JSON.
    pub fn write_json(&self, path: &Utf8Path) -> BatchResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| BatchError::WriteResults {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path, stems = self.len(), "wrote results");
        Ok(())
    }

    /// Read a result set written by [`write_json`](Self::write_json).
    pub fn read_json(path: &Utf8Path) -> BatchResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| BatchError::ReadResults {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BatchError::MalformedResults {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (stem, completions) in &self.entries {
            map.serialize_entry(stem, completions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ResultSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResultSetVisitor;

        impl<'de> Visitor<'de> for ResultSetVisitor {
            type Value = ResultSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of stem to completion list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ResultSet, A::Error> {
                let mut set = ResultSet::default();
                while let Some((stem, completions)) =
                    access.next_entry::<String, Vec<Completion>>()?
                {
                    set.insert(stem, completions);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(ResultSetVisitor)
    }
}

/// JSON Schema for the result set file.
pub fn result_set_schema() -> schemars::Schema {
    schemars::schema_for!(std::collections::BTreeMap<String, Vec<Completion>>)
}
