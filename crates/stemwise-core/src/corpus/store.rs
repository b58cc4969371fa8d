//! Load-or-build over the flat-file corpus cache.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};

use super::{
    BuildReport, Corpus, SourceOutcome, SourceReport, SourceRole, WordSource, normalize,
    scores_from_ranked_list,
};
use crate::error::{CorpusError, CorpusResult};

/// Word cache file name, one lowercase word per line.
pub const WORD_CACHE_FILE: &str = "word_list.txt";

/// Frequency cache file name, a JSON object of word to score.
pub const FREQUENCY_CACHE_FILE: &str = "word_frequencies.json";

/// Owns the cache location and the remote sources used to fill it.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use stemwise_core::corpus::{CorpusStore, HttpSource, GOOGLE_10K_URL};
///
/// let store = CorpusStore::new("cache")
///     .with_word_source(HttpSource::new(GOOGLE_10K_URL, Duration::from_secs(30)))
///     .with_frequency_source(HttpSource::new(GOOGLE_10K_URL, Duration::from_secs(30)));
/// let (corpus, report) = store.load_or_build().unwrap();
/// println!("{} words, {} failed sources", corpus.len(), report.failures().count());
/// ```
pub struct CorpusStore {
    dir: Utf8PathBuf,
    word_sources: Vec<Box<dyn WordSource>>,
    frequency_source: Option<Box<dyn WordSource>>,
}

impl CorpusStore {
    /// Create a store whose cache files live in `dir`.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            word_sources: Vec::new(),
            frequency_source: None,
        }
    }

    /// Add a source unioned into the word set when the word cache is missing.
    pub fn with_word_source(mut self, source: impl WordSource + 'static) -> Self {
        self.word_sources.push(Box::new(source));
        self
    }

    /// Set the frequency-ordered source used when the frequency cache is missing.
    pub fn with_frequency_source(mut self, source: impl WordSource + 'static) -> Self {
        self.frequency_source = Some(Box::new(source));
        self
    }

    /// Cache directory.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Path of the word cache file.
    pub fn word_cache_path(&self) -> Utf8PathBuf {
        self.dir.join(WORD_CACHE_FILE)
    }

    /// Path of the frequency cache file.
    pub fn frequency_cache_path(&self) -> Utf8PathBuf {
        self.dir.join(FREQUENCY_CACHE_FILE)
    }

    /// Delete both cache files so the next load rebuilds from sources.
    ///
    /// Missing files are not an error.
    pub fn clear(&self) -> CorpusResult<()> {
        for path in [self.word_cache_path(), self.frequency_cache_path()] {
            match fs::remove_file(&path) {
                Ok(()) => tracing::debug!(path = %path, "removed cache file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(CorpusError::WriteCache { path, source }),
            }
        }
        Ok(())
    }

    /// Load the corpus from cache, building and caching whatever is missing.
    ///
    /// Remote failures never fail the load: they are logged and listed in the
    /// returned [`BuildReport`]. A cache is only written when at least one
    /// source for it succeeded, so a fully offline run retries next time.
    #[tracing::instrument(skip(self), fields(dir = %self.dir))]
    pub fn load_or_build(&self) -> CorpusResult<(Corpus, BuildReport)> {
        let mut report = BuildReport::default();

        let words = match self.read_word_cache()? {
            Some(words) => {
                report.words_cached = true;
                words
            }
            None => self.build_words(&mut report)?,
        };

        let frequencies = match self.read_frequency_cache()? {
            Some(frequencies) => {
                report.frequencies_cached = true;
                frequencies
            }
            None => self.build_frequencies(&mut report)?,
        };

        let corpus = Corpus::new(words, frequencies);
        tracing::info!(
            words = corpus.len(),
            scored = corpus.scored_len(),
            failed_sources = report.failures().count(),
            "corpus ready"
        );
        Ok((corpus, report))
    }

    fn read_word_cache(&self) -> CorpusResult<Option<BTreeSet<String>>> {
        let path = self.word_cache_path();
        let Some(text) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let words: BTreeSet<String> = text.lines().filter_map(normalize).collect();
        tracing::debug!(path = %path, words = words.len(), "loaded word cache");
        Ok(Some(words))
    }

    fn read_frequency_cache(&self) -> CorpusResult<Option<HashMap<String, f64>>> {
        let path = self.frequency_cache_path();
        let Some(text) = read_if_exists(&path)? else {
            return Ok(None);
        };
        let frequencies: HashMap<String, f64> = serde_json::from_str(&text)
            .map_err(|source| CorpusError::MalformedFrequencies {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path, scored = frequencies.len(), "loaded frequency cache");
        Ok(Some(frequencies))
    }

    fn build_words(&self, report: &mut BuildReport) -> CorpusResult<BTreeSet<String>> {
        tracing::info!(sources = self.word_sources.len(), "downloading word lists");
        let mut words = BTreeSet::new();
        let mut any_loaded = false;

        for source in &self.word_sources {
            let outcome = match source.fetch() {
                Ok(text) => {
                    let fetched: BTreeSet<String> =
                        text.split_whitespace().filter_map(normalize).collect();
                    tracing::info!(source = source.name(), words = fetched.len(), "added words");
                    let count = fetched.len();
                    words.extend(fetched);
                    any_loaded = true;
                    SourceOutcome::Loaded { count }
                }
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "skipping word source");
                    SourceOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            report.sources.push(SourceReport {
                source: source.name().to_string(),
                role: SourceRole::Words,
                outcome,
            });
        }

        if any_loaded {
            let joined = words.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
            self.write_cache(&self.word_cache_path(), &joined)?;
        }
        Ok(words)
    }

    fn build_frequencies(&self, report: &mut BuildReport) -> CorpusResult<HashMap<String, f64>> {
        let Some(ref source) = self.frequency_source else {
            return Ok(HashMap::new());
        };
        tracing::info!(source = source.name(), "creating frequency dictionary");

        match source.fetch() {
            Ok(text) => {
                let frequencies = scores_from_ranked_list(&text);
                report.sources.push(SourceReport {
                    source: source.name().to_string(),
                    role: SourceRole::Frequencies,
                    outcome: SourceOutcome::Loaded {
                        count: frequencies.len(),
                    },
                });
                // Sorted keys keep the cache file stable between builds.
                let sorted: BTreeMap<&str, f64> =
                    frequencies.iter().map(|(w, s)| (w.as_str(), *s)).collect();
                let json = serde_json::to_string(&sorted).map_err(|source| {
                    CorpusError::MalformedFrequencies {
                        path: self.frequency_cache_path(),
                        source,
                    }
                })?;
                self.write_cache(&self.frequency_cache_path(), &json)?;
                Ok(frequencies)
            }
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "skipping frequency source");
                report.sources.push(SourceReport {
                    source: source.name().to_string(),
                    role: SourceRole::Frequencies,
                    outcome: SourceOutcome::Failed {
                        reason: e.to_string(),
                    },
                });
                Ok(HashMap::new())
            }
        }
    }

    fn write_cache(&self, path: &Utf8Path, contents: &str) -> CorpusResult<()> {
        fs::create_dir_all(&self.dir).map_err(|source| CorpusError::WriteCache {
            path: self.dir.clone(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| CorpusError::WriteCache {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path, bytes = contents.len(), "wrote cache file");
        Ok(())
    }
}

impl std::fmt::Debug for CorpusStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusStore")
            .field("dir", &self.dir)
            .field(
                "word_sources",
                &self.word_sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field(
                "frequency_source",
                &self.frequency_source.as_ref().map(|s| s.name()),
            )
            .finish()
    }
}

/// Read a file, treating "not found" as "needs building".
fn read_if_exists(path: &Utf8Path) -> CorpusResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CorpusError::ReadCache {
            path: path.to_path_buf(),
            source,
        }),
    }
}
