//! Remote word lists.

use std::time::Duration;

use ureq::Agent;

use crate::error::SourceError;

/// Anything that can produce the raw text of a word list.
///
/// Sources are fetched one at a time; a failing source is reported and
/// skipped by the [`CorpusStore`](super::CorpusStore), never retried.
pub trait WordSource {
    /// Name used in logs and build reports.
    fn name(&self) -> &str;

    /// Fetch the list as text (whitespace-separated words).
    fn fetch(&self) -> Result<String, SourceError>;
}

/// A word list served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    agent: Agent,
}

impl HttpSource {
    /// Create a source for `url` with a whole-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl WordSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    #[tracing::instrument(skip(self), fields(url = %self.url))]
    fn fetch(&self) -> Result<String, SourceError> {
        tracing::debug!("downloading word list");
        let mut resp = self
            .agent
            .get(&self.url)
            .call()
            .map_err(|e| SourceError::Request {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        resp.body_mut()
            .with_config()
            .limit(64 * 1024 * 1024)
            .read_to_string()
            .map_err(|e| SourceError::Body {
                url: self.url.clone(),
                reason: e.to_string(),
            })
    }
}

/// In-memory source for tests.
#[cfg(test)]
pub(crate) struct FixedSource {
    pub name: &'static str,
    pub body: Option<&'static str>,
}

#[cfg(test)]
impl WordSource for FixedSource {
    fn name(&self) -> &str {
        self.name
    }

    fn fetch(&self) -> Result<String, SourceError> {
        self.body
            .map(str::to_string)
            .ok_or_else(|| SourceError::Request {
                url: self.name.to_string(),
                reason: "connection refused".to_string(),
            })
    }
}
