//! Feedback leaders and issue topic frequency tables.

use std::collections::{BTreeMap, HashSet};

use indexmap::IndexMap;

use crate::data::{FeedbackSummary, Issue, IssueTopicCount, TermRow, TermSummary};
use crate::matcher::has_issue_topics;
use crate::terms::extract_keywords;
use crate::types::{SignalId, Term};

#[derive(Default)]
struct TermAccumulator<'a> {
    sentiment_sum: f64,
    rows: usize,
    signals: HashSet<&'a SignalId>,
}

/// Group term rows by term: flat mean sentiment and distinct signal count.
///
/// Output is ordered by term.
pub fn summarize_terms(rows: &[TermRow]) -> Vec<TermSummary> {
    let mut grouped: BTreeMap<&Term, TermAccumulator<'_>> = BTreeMap::new();
    for row in rows {
        let acc = grouped.entry(&row.term).or_default();
        acc.sentiment_sum += row.sentiment;
        acc.rows += 1;
        acc.signals.insert(&row.signal_id);
    }
    grouped
        .into_iter()
        .map(|(term, acc)| TermSummary {
            term: term.clone(),
            avg_sentiment: acc.sentiment_sum / acc.rows as f64,
            count: acc.signals.len(),
        })
        .collect()
}

/// Top `top_count` terms by mention count among negative and among positive terms.
///
/// Ties on count keep term order. A term whose average is exactly zero is in
/// neither list.
pub fn feedback_summary(rows: &[TermRow], top_count: usize) -> FeedbackSummary {
    let summaries = summarize_terms(rows);
    let leaders = |keep: fn(f64) -> bool| {
        let mut picked: Vec<TermSummary> = summaries
            .iter()
            .filter(|summary| keep(summary.avg_sentiment))
            .cloned()
            .collect();
        picked.sort_by(|a, b| b.count.cmp(&a.count));
        picked.truncate(top_count);
        picked
    };
    FeedbackSummary {
        negative: leaders(|sentiment| sentiment < 0.0),
        positive: leaders(|sentiment| sentiment > 0.0),
    }
}

/// Most frequent topic words among `team`'s issues in lifecycle stage `state_type`.
///
/// With `use_topics`, only generated topic lists are counted, and an issue
/// without one contributes nothing. When no issue in `issues` carries topics,
/// or `use_topics` is off, keywords are mined from titles instead. Ties keep
/// first-seen order.
pub fn issue_topics(
    issues: &[Issue],
    state_type: &str,
    team: &str,
    top_count: usize,
    use_topics: bool,
) -> Vec<IssueTopicCount> {
    let from_topics = use_topics && has_issue_topics(issues);
    let mut counts: IndexMap<Term, usize> = IndexMap::new();
    for issue in issues
        .iter()
        .filter(|issue| issue.team == team && issue.is_in_state(state_type))
    {
        let words: Vec<Term> = if from_topics {
            issue
                .topics
                .iter()
                .flatten()
                .map(|topic| topic.trim().to_lowercase())
                .filter(|topic| !topic.is_empty())
                .collect()
        } else {
            extract_keywords(&issue.title)
        };
        for word in words {
            *counts.entry(word).or_default() += 1;
        }
    }
    let mut ranked: Vec<IssueTopicCount> = counts
        .into_iter()
        .map(|(term, count)| IssueTopicCount { term, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(top_count);
    ranked
}
