use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, ValueEnum, error::ErrorKind};

use crate::analysis::{AlignmentAnalysis, AlignmentOutcome};
use crate::config::{AlignmentConfig, MatchMode};
use crate::constants::matching::{DEFAULT_MIN_SCORE, EXACT_MATCH_SCORE};
use crate::constants::summary::{DEFAULT_TOP_COUNT, STATE_COMPLETED, STATE_STARTED};
use crate::constants::topics::DEFAULT_TOPIC_LIMIT;
use crate::data::{AlignmentReport, IssueTopicCount, TermSummary};
use crate::heuristics::{capped_vocabulary_size, format_share, format_u128_with_commas};
use crate::matcher::vocabulary;
use crate::source::{IssueSource, JsonIssueSource, JsonSignalSource, SignalSource};
use crate::summary::issue_topics;
use crate::topics::{KeywordTopicGenerator, attach_issue_topics};
use crate::utils::truncate_for_display;

const TITLE_COLUMN_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MatchModeArg {
    Text,
    Topics,
}

impl From<MatchModeArg> for MatchMode {
    fn from(value: MatchModeArg) -> Self {
        match value {
            MatchModeArg::Text => MatchMode::Text,
            MatchModeArg::Topics => MatchMode::Topics,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "alignment_report",
    disable_help_subcommand = true,
    about = "Compare customer feedback terms against tracker issues",
    long_about = "Load feedback signals and issue snapshots from JSON, fuzzy-match the leading feedback terms against issue text or topics, and print per-term alignment between feedback share and issue share.",
    after_help = "Both --signals and --issues accept a single JSON file or a directory of JSON files."
)]
/// CLI for `alignment_report`.
///
/// Common usage:
/// - Text matching with defaults: `--signals signals.json --issues issues.json`
/// - Topic matching with offline keyword topics: `--match-mode topics --derive-topics`
/// - Restrict issue topic tables: `--team Engineering --team "Customer Support"`
struct AlignmentReportCli {
    #[arg(long, value_name = "PATH", help = "Signals JSON file or directory")]
    signals: PathBuf,
    #[arg(long, value_name = "PATH", help = "Issues JSON file or directory")]
    issues: PathBuf,
    #[arg(
        long = "min-score",
        default_value_t = DEFAULT_MIN_SCORE,
        value_parser = parse_score,
        help = "Minimum similarity score (0-100) for a match"
    )]
    min_score: u8,
    #[arg(
        long = "top-count",
        default_value_t = DEFAULT_TOP_COUNT,
        value_parser = parse_positive_usize,
        help = "Negative and positive leaders fed into the matcher"
    )]
    top_count: usize,
    #[arg(
        long = "match-mode",
        value_enum,
        default_value_t = MatchModeArg::Text,
        help = "Score terms against issue text or generated issue topics"
    )]
    match_mode: MatchModeArg,
    #[arg(
        long = "derive-topics",
        help = "Derive topics from title/description keywords for the first --topic-limit issues"
    )]
    derive_topics: bool,
    #[arg(
        long = "topic-limit",
        default_value_t = DEFAULT_TOPIC_LIMIT,
        help = "Max issues that receive derived topics"
    )]
    topic_limit: usize,
    #[arg(
        long = "team",
        value_name = "TEAM",
        help = "Team for the issue topic tables, repeat as needed (default: every team)"
    )]
    teams: Vec<String>,
}

/// Run the alignment report CLI with `args_iter` (program name excluded).
pub fn run_alignment_report<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<AlignmentReportCli, _>(
        std::iter::once("alignment_report".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let config = AlignmentConfig {
        min_score: cli.min_score,
        top_count: cli.top_count,
        match_mode: cli.match_mode.into(),
        topic_limit: cli.topic_limit,
    };
    let analysis = AlignmentAnalysis::new(config)?;

    let signals = JsonSignalSource::new(&cli.signals).load_signals()?;
    let mut issues = JsonIssueSource::new(&cli.issues).load_issues()?;

    if cli.derive_topics {
        attach_issue_topics(
            &mut issues,
            &KeywordTopicGenerator::default(),
            analysis.config().topic_limit,
        )?;
    }

    let outcome = analysis.run(&signals, &issues);
    let use_topics = analysis.config().match_mode == MatchMode::Topics;

    let teams: Vec<String> = if cli.teams.is_empty() {
        issues
            .iter()
            .map(|issue| issue.team.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        cli.teams
    };

    println!("=== feedback alignment report ===");
    println!("signals: {}", format_u128_with_commas(signals.len() as u128));
    println!("issues: {}", format_u128_with_commas(issues.len() as u128));
    println!(
        "match mode: {:?}, min score: {}, leaders per polarity: {}",
        analysis.config().match_mode,
        analysis.config().min_score,
        analysis.config().top_count
    );
    let available_terms = vocabulary(&outcome.term_rows).len();
    println!(
        "vocabulary: {} of {} terms (cap {}), scored pairs: {}",
        outcome.workload.terms,
        available_terms,
        capped_vocabulary_size(analysis.config().top_count, available_terms),
        format_u128_with_commas(outcome.workload.pairs)
    );
    println!();

    print_leaders("[TOP NEGATIVE TERMS]", &outcome.summary.negative);
    print_leaders("[TOP POSITIVE TERMS]", &outcome.summary.positive);

    println!("[ISSUE TOPICS]");
    for team in &teams {
        for (label, state_type) in [
            ("in progress", STATE_STARTED),
            ("completed", STATE_COMPLETED),
        ] {
            let topics = issue_topics(
                &issues,
                state_type,
                team,
                analysis.config().top_count,
                use_topics,
            );
            print_issue_topics(team, label, &topics);
        }
    }
    println!();

    print_matches(&outcome, analysis.config().min_score);
    print_alignment(&outcome.report);

    Ok(())
}

fn print_leaders(heading: &str, leaders: &[TermSummary]) {
    println!("{heading}");
    if leaders.is_empty() {
        println!("  (none)");
    }
    for leader in leaders {
        println!(
            "  {:<24} mentions={:<5} avg_sentiment={:+.3}",
            leader.term, leader.count, leader.avg_sentiment
        );
    }
    println!();
}

fn print_issue_topics(team: &str, label: &str, topics: &[IssueTopicCount]) {
    let rendered: Vec<String> = topics
        .iter()
        .map(|topic| format!("{} ({})", topic.term, topic.count))
        .collect();
    let rendered = if rendered.is_empty() {
        "(none)".to_string()
    } else {
        rendered.join(", ")
    };
    println!("  {team} / {label}: {rendered}");
}

fn print_matches(outcome: &AlignmentOutcome, min_score: u8) {
    println!("[MATCHES (score >= {min_score})]");
    if outcome.matches.is_empty() {
        println!("  (none)");
    }
    let mut matches = outcome.matches.clone();
    matches.sort_by(|a, b| {
        a.term
            .cmp(&b.term)
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| a.issue_id.cmp(&b.issue_id))
    });
    for matched in &matches {
        println!(
            "  {:<20} {:>3}  {:<18} {}",
            matched.term,
            matched.score,
            matched.team,
            truncate_for_display(&matched.issue_title, TITLE_COLUMN_WIDTH)
        );
    }
    println!();
}

fn print_alignment(report: &AlignmentReport) {
    println!("[ALIGNMENT]");
    if report.is_empty() {
        println!("  (no feedback terms)");
        return;
    }
    let mut header = format!(
        "  {:<20} {:>8} {:>9} {:>9} {:>8} {:>9} {:>9}",
        "term", "mentions", "sentiment", "fb_share", "matched", "is_share", "gap"
    );
    for team in &report.teams {
        header.push_str(&format!(" {:>12}", truncate_for_display(team, 12)));
    }
    println!("{header}");
    for row in &report.rows {
        let mut line = format!(
            "  {:<20} {:>8} {:>+9.3} {:>9} {:>8} {:>9} {:>9}",
            truncate_for_display(&row.term, 20),
            row.feedback_mentions,
            row.avg_sentiment,
            format_share(row.feedback_share),
            row.total_matched_issues,
            format_share(row.issue_share),
            format_share(row.alignment_gap)
        );
        for team in &report.teams {
            line.push_str(&format!(" {:>12}", row.team_count(team)));
        }
        println!("{line}");
    }
    println!();
    println!(
        "Note: shares are fractions of all feedback mentions and of all {} issues; a positive gap marks feedback that is under-represented in tracked work.",
        report.total_issues
    );
}

fn parse_score(raw: &str) -> Result<u8, String> {
    let parsed = raw.parse::<u8>().map_err(|_| {
        format!(
            "Could not parse --min-score value '{}' as an integer in 0..={}",
            raw, EXACT_MATCH_SCORE
        )
    })?;
    if parsed > EXACT_MATCH_SCORE {
        return Err(format!(
            "--min-score must be at most {EXACT_MATCH_SCORE}, got {parsed}"
        ));
    }
    Ok(parsed)
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw.parse::<usize>().map_err(|_| {
        format!(
            "Could not parse --top-count value '{}' as a positive integer",
            raw
        )
    })?;
    if parsed == 0 {
        return Err("--top-count must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
