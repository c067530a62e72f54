//! Per-term alignment metrics: feedback share against matched-issue share.
//!
//! The pipeline is a sequence of explicit grouped aggregations:
//! 1. term rows grouped by term (distinct signals, mean sentiment);
//! 2. feedback share over every term of the table;
//! 3. matches at or above the threshold grouped by (term, team) into distinct issues;
//! 4. per-term totals across teams;
//! 5. issue share against the global issue count;
//! 6. the gap between the two shares;
//! 7. a team pivot;
//! 8. a left join from the feedback vocabulary, so unmatched terms keep zero rows;
//! 9. ordering by gap, largest unmet feedback first.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::IndexMap;
use tracing::debug;

use crate::data::{AlignmentReport, AlignmentRow, Match, TermRow};
use crate::summary::summarize_terms;
use crate::types::{IssueId, TeamName, Term};

/// Build the alignment table for every term present in `rows`.
///
/// `matches` are re-filtered at `min_score`. When `total_issues` is zero both
/// the issue share and the gap of every term are defined as zero.
pub fn compute_alignment(
    rows: &[TermRow],
    matches: &[Match],
    total_issues: usize,
    min_score: u8,
) -> AlignmentReport {
    let feedback = summarize_terms(rows);
    let total_mentions: usize = feedback.iter().map(|summary| summary.count).sum();

    let mut per_team: HashMap<(&Term, &TeamName), HashSet<&IssueId>> = HashMap::new();
    for matched in matches.iter().filter(|m| m.score >= min_score) {
        per_team
            .entry((&matched.term, &matched.team))
            .or_default()
            .insert(&matched.issue_id);
    }

    let teams: Vec<TeamName> = per_team
        .keys()
        .map(|(_, team)| (*team).clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut team_counts: HashMap<&Term, HashMap<&TeamName, usize>> = HashMap::new();
    for ((term, team), issues) in &per_team {
        team_counts
            .entry(*term)
            .or_default()
            .insert(*team, issues.len());
    }

    let mut report_rows: Vec<AlignmentRow> = feedback
        .into_iter()
        .map(|summary| {
            let counts = team_counts.get(&summary.term);
            let team_matches: IndexMap<TeamName, usize> = teams
                .iter()
                .map(|team| {
                    let count = counts
                        .and_then(|by_team| by_team.get(team))
                        .copied()
                        .unwrap_or(0);
                    (team.clone(), count)
                })
                .collect();
            let total_matched_issues: usize = team_matches.values().sum();
            let feedback_share = share(summary.count, total_mentions);
            let issue_share = share(total_matched_issues, total_issues);
            AlignmentRow {
                term: summary.term,
                feedback_mentions: summary.count,
                avg_sentiment: summary.avg_sentiment,
                feedback_share,
                total_matched_issues,
                issue_share,
                alignment_gap: alignment_gap(feedback_share, issue_share, total_issues),
                team_matches,
            }
        })
        .collect();

    report_rows.sort_by(|a, b| {
        b.alignment_gap
            .total_cmp(&a.alignment_gap)
            .then_with(|| a.term.cmp(&b.term))
    });

    debug!(
        "[alignment:aggregate] {} terms, {} teams, {} issues",
        report_rows.len(),
        teams.len(),
        total_issues
    );

    AlignmentReport {
        rows: report_rows,
        teams,
        total_issues,
    }
}

fn alignment_gap(feedback_share: f64, issue_share: f64, total_issues: usize) -> f64 {
    if total_issues == 0 {
        return 0.0;
    }
    feedback_share - issue_share
}

/// `part / whole`, or zero when `whole` is zero.
pub fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
