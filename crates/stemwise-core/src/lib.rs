//! Core library for stemwise.
//!
//! Word-stem completion for implicit leadership trait (ILT) studies: given a
//! fragment such as `HON__`, find the dictionary words that fill it and rank
//! them by corpus frequency.
//!
//! # Modules
//!
//! - [`corpus`] - Word list and frequency cache, built from remote lists
//! - [`pattern`] - Stem pattern compilation and matching
//! - [`rank`] - Frequency ranking and the [`StemCompleter`]
//! - [`batch`] - Per-file stem processing and the [`ResultSet`] file format
//! - [`report`] - Summary, frequency band and ILT table reports
//! - [`bot`] - LLM-based leadership completions
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use stemwise_core::{CorpusStore, StemCompleter};
//!
//! let (corpus, _report) = CorpusStore::new(".")
//!     .load_or_build()
//!     .expect("Failed to load corpus");
//!
//! for completion in StemCompleter::new(&corpus).complete("HON__").unwrap() {
//!     println!("{} {:.4}", completion.word, completion.freq_score);
//! }
//! ```
#![deny(unsafe_code)]

pub mod batch;
pub mod bot;
pub mod config;
pub mod corpus;
pub mod error;
pub mod pattern;
pub mod rank;
pub mod report;

pub use batch::{BatchRun, ResultSet, StemOutcome};
pub use config::{Config, ConfigLoader, DEFAULT_TOP_K, LogLevel};
pub use corpus::{BuildReport, Corpus, CorpusStore};
pub use error::{
    BatchError, BotError, ConfigError, ConfigResult, CorpusError, PatternError, ReportError,
};
pub use pattern::StemPattern;
pub use rank::{Completion, StemCompleter};
