use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use crate::types::{IssueId, SignalId, StateType, TeamName, Term};

/// One customer feedback observation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Opaque, unique signal identifier.
    pub id: SignalId,
    /// Signed sentiment score; no fixed range is assumed.
    pub sentiment: f64,
    /// Topic tag names as attached upstream (not yet normalized).
    pub topics: Vec<String>,
    /// Keyword tag names as attached upstream (not yet normalized).
    pub keywords: Vec<String>,
    pub summary: Option<String>,
    pub exact_quote: Option<String>,
    pub types: Vec<String>,
    pub impacts: Vec<String>,
    /// Company of the person who gave the feedback.
    pub company: Option<String>,
    pub date: Option<NaiveDate>,
}

/// Metadata copied from a signal onto each of its term rows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalMeta {
    pub summary: Option<String>,
    pub exact_quote: Option<String>,
    pub types: Vec<String>,
    pub impacts: Vec<String>,
    pub company: Option<String>,
    pub date: Option<NaiveDate>,
}

impl From<&Signal> for SignalMeta {
    fn from(signal: &Signal) -> Self {
        Self {
            summary: signal.summary.clone(),
            exact_quote: signal.exact_quote.clone(),
            types: signal.types.clone(),
            impacts: signal.impacts.clone(),
            company: signal.company.clone(),
            date: signal.date,
        }
    }
}

/// Exploded unit of work: one (signal, distinct term) pair.
///
/// Every row of a signal carries the full signal sentiment; it is not split
/// across terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermRow {
    pub signal_id: SignalId,
    /// Trimmed, lowercase, non-empty term.
    pub term: Term,
    pub sentiment: f64,
    pub meta: SignalMeta,
}

/// Lifecycle state of an issue.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueState {
    /// Workflow state name (e.g. `In Review`).
    pub name: String,
    /// Coarse lifecycle type (e.g. `started`, `completed`).
    pub state_type: StateType,
}

/// One tracked unit of engineering work.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    /// Human-facing tracker key such as `ENG-42`.
    pub identifier: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub team: TeamName,
    pub state: IssueState,
    pub project: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
    /// Generated topic list; `None` means topics were never generated.
    pub topics: Option<Vec<String>>,
}

impl Issue {
    /// True when the issue's coarse lifecycle type equals `state_type`.
    pub fn is_in_state(&self, state_type: &str) -> bool {
        self.state.state_type == state_type
    }
}

/// A (term, issue) pair that met the score threshold.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub term: Term,
    pub issue_id: IssueId,
    pub issue_title: String,
    pub team: TeamName,
    /// Similarity score in `[0, 100]`.
    pub score: u8,
}

/// Per-term feedback statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermSummary {
    pub term: Term,
    pub avg_sentiment: f64,
    /// Number of distinct signals that mention the term.
    pub count: usize,
}

/// Top terms by mention count, split by sentiment polarity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    /// Leaders with average sentiment below zero.
    pub negative: Vec<TermSummary>,
    /// Leaders with average sentiment above zero.
    pub positive: Vec<TermSummary>,
}

impl FeedbackSummary {
    /// Negative leaders followed by positive leaders.
    pub fn vocabulary(&self) -> Vec<Term> {
        self.negative
            .iter()
            .chain(self.positive.iter())
            .map(|summary| summary.term.clone())
            .collect()
    }
}

/// Frequency of one topic word within a filtered issue subset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTopicCount {
    pub term: Term,
    pub count: usize,
}

/// One row of the alignment table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRow {
    pub term: Term,
    /// Distinct signals mentioning the term.
    pub feedback_mentions: usize,
    pub avg_sentiment: f64,
    /// Mentions divided by total mentions across every term of the table.
    pub feedback_share: f64,
    /// Distinct matched issues, summed across teams.
    pub total_matched_issues: usize,
    /// Matched issues divided by the total issue count.
    pub issue_share: f64,
    /// `feedback_share - issue_share`, or zero when the issue set is empty.
    /// Positive means under-addressed feedback.
    pub alignment_gap: f64,
    /// Matched issue count per team, keyed in report column order.
    pub team_matches: IndexMap<TeamName, usize>,
}

impl AlignmentRow {
    /// Matched issue count for `team`, zero when the team has no column.
    pub fn team_count(&self, team: &str) -> usize {
        self.team_matches.get(team).copied().unwrap_or(0)
    }
}

/// The alignment table plus the context needed to read it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Rows sorted by `alignment_gap` descending.
    pub rows: Vec<AlignmentRow>,
    /// Team pivot columns, sorted by name.
    pub teams: Vec<TeamName>,
    /// Issue count used as the `issue_share` denominator.
    pub total_issues: usize,
}

impl AlignmentReport {
    /// True when there are no feedback terms.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row for `term`, if the term is part of the feedback vocabulary.
    pub fn row(&self, term: &str) -> Option<&AlignmentRow> {
        self.rows.iter().find(|row| row.term == term)
    }
}
