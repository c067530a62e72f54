//! Cross-join of the term vocabulary against issues.
//!
//! The cross product is sharded by term across the rayon pool. Shards share
//! nothing, and callers must not rely on the order of the returned matches.

use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::debug;

use crate::config::{AlignmentConfig, MatchMode};
use crate::constants::matching::ISSUE_TEXT_SEPARATOR;
use crate::data::{Issue, Match, TermRow};
use crate::scoring::{best_topic_score, match_score};
use crate::types::Term;

/// Distinct terms of `rows` in first-seen order.
pub fn vocabulary(rows: &[TermRow]) -> Vec<Term> {
    rows.iter()
        .map(|row| row.term.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Lowercased title, project name, and description joined by single spaces.
///
/// Missing or empty fields contribute nothing.
pub fn issue_match_text(issue: &Issue) -> String {
    [
        Some(issue.title.as_str()),
        issue.project.as_deref(),
        issue.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(ISSUE_TEXT_SEPARATOR)
    .to_lowercase()
}

/// Score every (term, issue) pair against issue text and keep those at or above `min_score`.
pub fn match_terms_to_issues(terms: &[Term], issues: &[Issue], min_score: u8) -> Vec<Match> {
    let texts: Vec<String> = issues.iter().map(issue_match_text).collect();
    cross_match(terms, issues, min_score, |term, idx, _issue| {
        match_score(&texts[idx], term)
    })
}

/// Score every (term, issue) pair against the issue's generated topics.
///
/// Title and description are ignored in this mode: an issue with no topic list
/// scores 0. When no issue in `issues` carries topics at all, the corpus was
/// never tagged and every issue is scored on its text instead.
pub fn match_to_issue_topics(terms: &[Term], issues: &[Issue], min_score: u8) -> Vec<Match> {
    if !has_issue_topics(issues) {
        debug!("[alignment:matcher] no issue topics present, scoring issue text");
        return match_terms_to_issues(terms, issues, min_score);
    }
    cross_match(terms, issues, min_score, |term, _idx, issue| {
        best_topic_score(term, issue.topics.as_deref().unwrap_or_default())
    })
}

/// True when at least one issue carries a generated topic list, even an empty one.
pub fn has_issue_topics(issues: &[Issue]) -> bool {
    issues.iter().any(|issue| issue.topics.is_some())
}

/// Dispatch to the matcher selected by `config.match_mode`.
pub fn match_vocabulary(terms: &[Term], issues: &[Issue], config: &AlignmentConfig) -> Vec<Match> {
    match config.match_mode {
        MatchMode::Text => match_terms_to_issues(terms, issues, config.min_score),
        MatchMode::Topics => match_to_issue_topics(terms, issues, config.min_score),
    }
}

fn cross_match<F>(terms: &[Term], issues: &[Issue], min_score: u8, score: F) -> Vec<Match>
where
    F: Fn(&str, usize, &Issue) -> u8 + Sync,
{
    if terms.is_empty() || issues.is_empty() {
        return Vec::new();
    }
    let matches: Vec<Match> = terms
        .par_iter()
        .flat_map_iter(|term| {
            let score = &score;
            issues.iter().enumerate().filter_map(move |(idx, issue)| {
                let value = score(term.as_str(), idx, issue);
                (value >= min_score).then(|| Match {
                    term: term.clone(),
                    issue_id: issue.id.clone(),
                    issue_title: issue.title.clone(),
                    team: issue.team.clone(),
                    score: value,
                })
            })
        })
        .collect();
    debug!(
        "[alignment:matcher] scored {} pairs, kept {} at min_score={}",
        terms.len() * issues.len(),
        matches.len(),
        min_score
    );
    matches
}
