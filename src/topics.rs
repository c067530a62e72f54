//! Issue topic generation collaborator.
//!
//! The core never calls a model itself. A `TopicGenerator` is handed issue
//! text and returns short lowercase topics; `attach_issue_topics` stores them
//! on the issues before matching in `MatchMode::Topics`.

use indexmap::IndexSet;
use serde_json::Value;
use tracing::{debug, info};

use crate::constants::topics::MAX_KEYWORD_TOPICS;
use crate::data::Issue;
use crate::errors::AlignmentError;
use crate::terms::extract_keywords;

/// Produces a short topic list for one issue.
///
/// Implementations should return an empty list when the text carries too
/// little information, and an `AlignmentError::TopicGeneration` on failure.
pub trait TopicGenerator: Send + Sync {
    /// Generate lowercase topics from an issue title and optional description.
    fn generate_topics(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Vec<String>, AlignmentError>;
}

/// Prompt text asking a language model for 3 to 5 product topics as a JSON array.
pub fn topic_prompt(title: &str, description: Option<&str>) -> String {
    format!(
        "You are helping categorize product development issues.\n\n\
         Given this text, extract 3 to 5 short product or feature topics\n\
         that summarize what this issue is about.\n\
         Return them as a valid JSON array of lowercase strings.\n\
         If there is not enough information, return an empty array.\n\n\
         Text:\n\
         Title: {title}\n\
         Description: {}",
        description.unwrap_or("")
    )
}

/// Parse a raw generator reply into lowercase topics.
///
/// A JSON array keeps its string entries; any other valid JSON yields no
/// topics; text that is not JSON is split on commas.
pub fn parse_topic_response(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|topic| topic.trim().to_lowercase())
            .filter(|topic| !topic.is_empty())
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => raw
            .split(',')
            .map(|topic| topic.trim().to_lowercase())
            .filter(|topic| !topic.is_empty())
            .collect(),
    }
}

/// Generate topics for the first `limit` issues; later issues are left untouched.
///
/// Stops at the first generator failure.
pub fn attach_issue_topics(
    issues: &mut [Issue],
    generator: &dyn TopicGenerator,
    limit: usize,
) -> Result<usize, AlignmentError> {
    let mut attached = 0;
    for issue in issues.iter_mut().take(limit) {
        let topics = generator
            .generate_topics(&issue.title, issue.description.as_deref())
            .map_err(|err| match err {
                AlignmentError::TopicGeneration { .. } => err,
                other => AlignmentError::TopicGeneration {
                    issue_id: issue.id.clone(),
                    reason: other.to_string(),
                },
            })?;
        debug!(
            "[alignment:topics] issue '{}' -> {} topics",
            issue.id,
            topics.len()
        );
        issue.topics = Some(topics);
        attached += 1;
    }
    info!(
        "[alignment:topics] attached topics to {} of {} issues",
        attached,
        issues.len()
    );
    Ok(attached)
}

/// Offline generator that mines keywords from title and description.
#[derive(Clone, Debug)]
pub struct KeywordTopicGenerator {
    max_topics: usize,
}

impl Default for KeywordTopicGenerator {
    fn default() -> Self {
        Self {
            max_topics: MAX_KEYWORD_TOPICS,
        }
    }
}

impl KeywordTopicGenerator {
    /// Override the number of topics kept per issue.
    pub fn with_max_topics(mut self, max_topics: usize) -> Self {
        self.max_topics = max_topics;
        self
    }
}

impl TopicGenerator for KeywordTopicGenerator {
    fn generate_topics(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Vec<String>, AlignmentError> {
        let mut topics: IndexSet<String> = extract_keywords(title).into_iter().collect();
        if let Some(description) = description {
            topics.extend(extract_keywords(description));
        }
        Ok(topics.into_iter().take(self.max_topics).collect())
    }
}

/// Generator backed by a text-completion function, such as a language model client.
///
/// Each issue is turned into `topic_prompt`, handed to `complete`, and the reply
/// is read with `parse_topic_response`. Retries and caching belong to `complete`.
pub struct PromptTopicGenerator<F> {
    complete: F,
}

impl<F> PromptTopicGenerator<F>
where
    F: Fn(&str) -> Result<String, AlignmentError> + Send + Sync,
{
    /// Wrap a completion function that maps a prompt to a raw reply.
    pub fn new(complete: F) -> Self {
        Self { complete }
    }
}

impl<F> TopicGenerator for PromptTopicGenerator<F>
where
    F: Fn(&str) -> Result<String, AlignmentError> + Send + Sync,
{
    fn generate_topics(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Result<Vec<String>, AlignmentError> {
        let reply = (self.complete)(&topic_prompt(title, description))?;
        Ok(parse_topic_response(&reply))
    }
}
