use std::io;

use thiserror::Error;

use crate::types::{IssueId, SourceId};

/// Error type for loader, collaborator, and configuration failures.
#[derive(Debug, Error)]
pub enum AlignmentError {
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable { source_id: SourceId, reason: String },
    #[error("data source '{source_id}' returned inconsistent state: {details}")]
    SourceInconsistent {
        source_id: SourceId,
        details: String,
    },
    #[error("topic generation failed for issue '{issue_id}': {reason}")]
    TopicGeneration { issue_id: IssueId, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
