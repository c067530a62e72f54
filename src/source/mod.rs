//! Corpus loaders.
//!
//! Ownership model:
//! - `SignalSource` and `IssueSource` hand fully materialized corpora to the
//!   analysis; they own all I/O, retries, and caching.
//! - Once a load returns `Ok`, its rows are trusted by the core.

use crate::constants::source::IN_MEMORY_SOURCE_ID;
use crate::data::{Issue, Signal};
use crate::errors::AlignmentError;
use crate::types::SourceId;

/// Date and timestamp parsing shared by loaders.
pub mod dates;
/// JSON file loaders.
pub mod json;

pub use json::{JsonIssueSource, JsonSignalSource};

/// Provider of customer feedback signals.
pub trait SignalSource: Send + Sync {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;
    /// Load every signal. Malformed rows are skipped, not reported as errors.
    fn load_signals(&self) -> Result<Vec<Signal>, AlignmentError>;
}

/// Provider of issue-tracker snapshots.
pub trait IssueSource: Send + Sync {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;
    /// Load every issue. Malformed rows are skipped, not reported as errors.
    fn load_issues(&self) -> Result<Vec<Issue>, AlignmentError>;
}

/// Source backed by already-parsed signals and issues.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    source_id: SourceId,
    signals: Vec<Signal>,
    issues: Vec<Issue>,
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl InMemorySource {
    /// Wrap already-parsed corpora.
    pub fn new(signals: Vec<Signal>, issues: Vec<Issue>) -> Self {
        Self {
            source_id: IN_MEMORY_SOURCE_ID.to_string(),
            signals,
            issues,
        }
    }

    /// Override the source id used in logs and errors.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

impl SignalSource for InMemorySource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load_signals(&self) -> Result<Vec<Signal>, AlignmentError> {
        Ok(self.signals.clone())
    }
}

impl IssueSource for InMemorySource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load_issues(&self) -> Result<Vec<Issue>, AlignmentError> {
        Ok(self.issues.clone())
    }
}
