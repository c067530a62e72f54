//! Default end-to-end flow: explode, summarize, match, aggregate.

use tracing::info;

use crate::alignment::compute_alignment;
use crate::config::AlignmentConfig;
use crate::data::{AlignmentReport, FeedbackSummary, Issue, Match, Signal, TermRow};
use crate::errors::AlignmentError;
use crate::heuristics::{MatchWorkload, estimate_match_workload};
use crate::matcher::match_vocabulary;
use crate::summary::feedback_summary;
use crate::terms::explode_signals;

/// Everything one analysis run produces.
#[derive(Clone, Debug)]
pub struct AlignmentOutcome {
    /// Exploded feedback table the report was built from.
    pub term_rows: Vec<TermRow>,
    /// Negative/positive leaders; their terms seeded the matcher.
    pub summary: FeedbackSummary,
    /// Matches kept by the matcher, in no particular order.
    pub matches: Vec<Match>,
    pub report: AlignmentReport,
    pub workload: MatchWorkload,
}

/// Runs the default alignment flow over two in-memory corpora.
#[derive(Clone, Debug, Default)]
pub struct AlignmentAnalysis {
    config: AlignmentConfig,
}

impl AlignmentAnalysis {
    /// Create an analysis after validating `config`.
    pub fn new(config: AlignmentConfig) -> Result<Self, AlignmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Validated configuration for this analysis.
    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Explode signals, pick the leader vocabulary, match it against
    /// `issues`, and aggregate against the full feedback table.
    pub fn run(&self, signals: &[Signal], issues: &[Issue]) -> AlignmentOutcome {
        let term_rows = explode_signals(signals);
        let summary = feedback_summary(&term_rows, self.config.top_count);
        let vocabulary = summary.vocabulary();
        let workload = estimate_match_workload(vocabulary.len(), issues.len());

        let matches = match_vocabulary(&vocabulary, issues, &self.config);
        let report = compute_alignment(&term_rows, &matches, issues.len(), self.config.min_score);

        info!(
            "[alignment] signals={} term_rows={} vocabulary={} issues={} matches={} report_rows={}",
            signals.len(),
            term_rows.len(),
            vocabulary.len(),
            issues.len(),
            matches.len(),
            report.rows.len()
        );

        AlignmentOutcome {
            term_rows,
            summary,
            matches,
            report,
            workload,
        }
    }
}
