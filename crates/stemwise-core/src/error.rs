//! Error types for stemwise-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while fetching a remote word source.
///
/// These never abort a corpus build; they are collected into the
/// [`BuildReport`](crate::corpus::BuildReport) instead.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The HTTP request failed or returned a non-success status.
    #[error("request to {url} failed: {reason}")]
    Request {
        /// Source URL.
        url: String,
        /// Transport or status description.
        reason: String,
    },

    /// The response body could not be read as text.
    #[error("unreadable body from {url}: {reason}")]
    Body {
        /// Source URL.
        url: String,
        /// Decoder error description.
        reason: String,
    },
}

/// Errors that can occur while loading or persisting the corpus cache.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A cache file exists but could not be read.
    #[error("failed to read cache file {path}")]
    ReadCache {
        /// Cache file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A cache file could not be written.
    #[error("failed to write cache file {path}")]
    WriteCache {
        /// Cache file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The frequency cache is not a JSON object of word to score.
    #[error("malformed frequency cache {path}")]
    MalformedFrequencies {
        /// Cache file path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias using [`CorpusError`].
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Errors that can occur when compiling a stem pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern contains a character that is neither a letter nor a placeholder.
    #[error("unexpected symbol {symbol:?} at position {position} in stem {stem:?}")]
    UnexpectedSymbol {
        /// The stem as given.
        stem: String,
        /// The offending character.
        symbol: char,
        /// Zero-based character position in the stem (whitespace included).
        position: usize,
    },

    /// The regex engine rejected the compiled pattern.
    #[error("stem {stem:?} did not compile: {reason}")]
    Compile {
        /// The stem as given.
        stem: String,
        /// Regex engine message.
        reason: String,
    },
}

/// Result type alias using [`PatternError`].
pub type PatternResult<T> = Result<T, PatternError>;

/// Errors that can occur while reading stems or writing a result set.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The stem file could not be read.
    #[error("failed to read stems from {path}")]
    ReadStems {
        /// Stem file path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The result set could not be written.
    #[error("failed to write results to {path}")]
    WriteResults {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The result set could not be read back.
    #[error("failed to read results from {path}")]
    ReadResults {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The result set file is not valid JSON in the expected shape.
    #[error("malformed result set {path}")]
    MalformedResults {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// JSON serialization failed.
    #[error("failed to serialize results")]
    Serialize(#[from] serde_json::Error),
}

/// Result type alias using [`BatchError`].
pub type BatchResult<T> = Result<T, BatchError>;

/// Errors that can occur while producing reports.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Writing report output failed.
    #[error("failed to write report")]
    Io(#[from] std::io::Error),

    /// CSV encoding failed.
    #[error("failed to encode CSV")]
    Csv(#[from] csv::Error),

    /// A table row file could not be parsed.
    #[error("malformed table rows: {0}")]
    Rows(#[from] serde_json::Error),
}

/// Result type alias using [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur when talking to the chat completion service.
#[derive(Error, Debug)]
pub enum BotError {
    /// No API key was found in the configured environment variable.
    #[error("no API key found in ${var}")]
    MissingApiKey {
        /// Environment variable name that was checked.
        var: String,
    },

    /// The chat completion request failed.
    #[error("chat completion request failed: {0}")]
    Request(String),

    /// The service replied without any message content.
    #[error("empty response for stem {stem:?}")]
    EmptyResponse {
        /// The stem that was sent.
        stem: String,
    },

    /// Writing the completions report failed.
    #[error("failed to write completions report")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`BotError`].
pub type BotResult<T> = Result<T, BotError>;
