use crate::constants::matching::{DEFAULT_MIN_SCORE, EXACT_MATCH_SCORE};
use crate::constants::summary::DEFAULT_TOP_COUNT;
use crate::constants::topics::DEFAULT_TOPIC_LIMIT;
use crate::errors::AlignmentError;

/// Which side of an issue a term is scored against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    /// Score against title, project name, and description.
    #[default]
    Text,
    /// Score against the issue's generated topic list.
    ///
    /// Issues that never had topics generated are scored in text mode.
    Topics,
}

/// Top-level alignment run configuration.
#[derive(Clone, Debug)]
pub struct AlignmentConfig {
    /// Minimum score (0-100) for a (term, issue) pair to count as a match.
    pub min_score: u8,
    /// Number of negative and of positive leaders fed into the matcher.
    ///
    /// The matcher cost is `terms x issues`, so this is the main cost knob.
    pub top_count: usize,
    /// Scoring mode used by the matcher.
    pub match_mode: MatchMode,
    /// Max number of issues handed to a topic generator in one run.
    pub topic_limit: usize,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            top_count: DEFAULT_TOP_COUNT,
            match_mode: MatchMode::Text,
            topic_limit: DEFAULT_TOPIC_LIMIT,
        }
    }
}

impl AlignmentConfig {
    /// Reject settings that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<(), AlignmentError> {
        if self.min_score > EXACT_MATCH_SCORE {
            return Err(AlignmentError::Configuration(format!(
                "min_score must be within 0..={EXACT_MATCH_SCORE}, got {}",
                self.min_score
            )));
        }
        if self.top_count == 0 {
            return Err(AlignmentError::Configuration(
                "top_count must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
