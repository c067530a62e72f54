#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Per-term alignment aggregation.
pub mod alignment;
/// Default end-to-end analysis flow.
pub mod analysis;
/// Run configuration types.
pub mod config;
/// Centralized constants used across scoring, extraction, and loaders.
pub mod constants;
/// Signal, issue, match, and report types.
pub mod data;
/// Reusable report runner shared by demo binaries.
pub mod example_apps;
/// Matcher workload estimation and formatting helpers.
pub mod heuristics;
/// Term vocabulary against issue cross-matching.
pub mod matcher;
/// String similarity scoring.
pub mod scoring;
/// Corpus loader traits and built-in loaders.
pub mod source;
/// Feedback leaders and issue topic tables.
pub mod summary;
/// Term extraction from signals and free text.
pub mod terms;
/// Issue topic generation collaborator.
pub mod topics;
/// Input transports used by loaders (filesystem today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use alignment::compute_alignment;
pub use analysis::{AlignmentAnalysis, AlignmentOutcome};
pub use config::{AlignmentConfig, MatchMode};
pub use data::{
    AlignmentReport, AlignmentRow, FeedbackSummary, Issue, IssueState, IssueTopicCount, Match,
    Signal, SignalMeta, TermRow, TermSummary,
};
pub use errors::AlignmentError;
pub use matcher::{match_terms_to_issues, match_to_issue_topics, match_vocabulary};
pub use scoring::{best_topic_score, match_score};
pub use source::{InMemorySource, IssueSource, JsonIssueSource, JsonSignalSource, SignalSource};
pub use summary::{feedback_summary, issue_topics};
pub use terms::{explode_signals, extract_keywords};
pub use topics::{KeywordTopicGenerator, PromptTopicGenerator, TopicGenerator};
pub use types::{IssueId, SignalId, SourceId, StateType, TeamName, Term};
