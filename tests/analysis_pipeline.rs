use std::fs;

use feedback_alignment::analysis::AlignmentAnalysis;
use feedback_alignment::config::{AlignmentConfig, MatchMode};
use feedback_alignment::data::{Issue, IssueState, Signal};
use feedback_alignment::example_apps::run_alignment_report;
use feedback_alignment::source::{InMemorySource, IssueSource, SignalSource};
use feedback_alignment::summary::issue_topics;
use feedback_alignment::topics::{KeywordTopicGenerator, attach_issue_topics};
use feedback_alignment::{AlignmentError, TopicGenerator};

fn signal(id: &str, sentiment: f64, topics: &[&str], keywords: &[&str]) -> Signal {
    Signal {
        id: id.to_string(),
        sentiment,
        topics: topics.iter().map(|t| t.to_string()).collect(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        ..Signal::default()
    }
}

fn issue(id: &str, title: &str, description: Option<&str>, team: &str, state: &str) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description: description.map(str::to_string),
        team: team.to_string(),
        state: IssueState {
            name: state.to_string(),
            state_type: state.to_string(),
        },
        ..Issue::default()
    }
}

fn corpus() -> (Vec<Signal>, Vec<Issue>) {
    let signals = vec![
        signal("1", -0.8, &["Onboarding"], &["invoices"]),
        signal("2", -0.6, &["onboarding"], &[]),
        signal("3", 0.9, &["speed"], &[]),
        signal("4", 0.7, &["Speed", "search"], &[]),
        signal("5", -0.3, &["billing"], &[]),
    ];
    let issues = vec![
        issue(
            "ENG-1",
            "Improve onboarding flow for new users",
            Some("Guided setup after signup"),
            "Engineering",
            "started",
        ),
        issue(
            "ENG-2",
            "Search speed regression",
            None,
            "Engineering",
            "completed",
        ),
        issue(
            "FIN-1",
            "Billing page shows wrong totals",
            None,
            "Finance",
            "started",
        ),
        issue(
            "SUP-1",
            "Onboarding macro for support",
            None,
            "Customer Support",
            "completed",
        ),
    ];
    (signals, issues)
}

#[test]
fn default_run_reports_every_feedback_term() {
    let (signals, issues) = corpus();
    let analysis = AlignmentAnalysis::new(AlignmentConfig::default()).unwrap();
    let outcome = analysis.run(&signals, &issues);

    // billing, invoices, onboarding, search, speed
    assert_eq!(outcome.report.rows.len(), 5);
    assert_eq!(outcome.report.total_issues, 4);
    assert_eq!(
        outcome.report.teams,
        vec!["Customer Support", "Engineering", "Finance"]
    );

    let onboarding = outcome.report.row("onboarding").unwrap();
    assert_eq!(onboarding.feedback_mentions, 2);
    assert_eq!(onboarding.team_count("Engineering"), 1);
    assert_eq!(onboarding.team_count("Customer Support"), 1);
    assert_eq!(onboarding.total_matched_issues, 2);
    assert!((onboarding.issue_share - 0.5).abs() < 1e-9);

    let speed = outcome.report.row("speed").unwrap();
    assert_eq!(speed.team_count("Engineering"), 1);

    let total: f64 = outcome
        .report
        .rows
        .iter()
        .map(|row| row.feedback_share)
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(outcome.workload.terms, outcome.summary.vocabulary().len());
    assert_eq!(outcome.workload.issues, 4);
}

#[test]
fn leader_cap_limits_matched_vocabulary_but_not_rows() {
    let (signals, issues) = corpus();
    let config = AlignmentConfig {
        top_count: 1,
        ..AlignmentConfig::default()
    };
    let outcome = AlignmentAnalysis::new(config)
        .unwrap()
        .run(&signals, &issues);

    assert_eq!(outcome.summary.vocabulary(), vec!["onboarding", "speed"]);
    assert!(
        outcome
            .matches
            .iter()
            .all(|m| m.term == "onboarding" || m.term == "speed")
    );
    let billing = outcome.report.row("billing").unwrap();
    assert_eq!(billing.total_matched_issues, 0);
    assert_eq!(outcome.report.rows.len(), 5);
}

#[test]
fn invalid_config_is_rejected() {
    let config = AlignmentConfig {
        min_score: 101,
        ..AlignmentConfig::default()
    };
    assert!(matches!(
        AlignmentAnalysis::new(config),
        Err(AlignmentError::Configuration(_))
    ));
}

#[test]
fn topic_mode_uses_generated_topics() {
    let (signals, mut issues) = corpus();
    let attached = attach_issue_topics(&mut issues, &KeywordTopicGenerator::default(), 2).unwrap();
    assert_eq!(attached, 2);
    assert!(issues[0].topics.is_some());
    assert!(issues[2].topics.is_none());

    let config = AlignmentConfig {
        match_mode: MatchMode::Topics,
        ..AlignmentConfig::default()
    };
    let outcome = AlignmentAnalysis::new(config)
        .unwrap()
        .run(&signals, &issues);

    let ids: Vec<_> = outcome
        .matches
        .iter()
        .filter(|m| m.term == "onboarding")
        .map(|m| m.issue_id.as_str())
        .collect();
    assert_eq!(ids, vec!["ENG-1"]);
    // SUP-1 sits past the topic limit, so it has no topics and its title is not scored.
    assert!(outcome.matches.iter().all(|m| m.issue_id != "SUP-1"));
}

#[test]
fn issue_topic_tables_filter_by_team_and_state() {
    let (_, mut issues) = corpus();
    let started = issue_topics(&issues, "started", "Engineering", 5, false);
    let words: Vec<_> = started.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(words, vec!["improve", "onboarding", "flow", "users"]);

    issues[1].topics = Some(vec!["search".into(), "performance".into()]);
    let completed = issue_topics(&issues, "completed", "Engineering", 5, true);
    let words: Vec<_> = completed.iter().map(|t| t.term.as_str()).collect();
    assert_eq!(words, vec!["search", "performance"]);

    assert!(issue_topics(&issues, "started", "Design", 5, false).is_empty());
}

struct RejectingGenerator;

impl TopicGenerator for RejectingGenerator {
    fn generate_topics(
        &self,
        _title: &str,
        _description: Option<&str>,
    ) -> Result<Vec<String>, AlignmentError> {
        Err(AlignmentError::Configuration("model unavailable".into()))
    }
}

#[test]
fn topic_generation_failure_is_typed() {
    let (_, mut issues) = corpus();
    let err = attach_issue_topics(&mut issues, &RejectingGenerator, 10).unwrap_err();
    assert!(matches!(
        err,
        AlignmentError::TopicGeneration { ref issue_id, .. } if issue_id == "ENG-1"
    ));
}

#[test]
fn in_memory_source_feeds_analysis() {
    let (signals, issues) = corpus();
    let source = InMemorySource::new(signals, issues).with_source_id("fixture");
    assert_eq!(SignalSource::id(&source), "fixture");
    assert_eq!(IssueSource::id(&source), "fixture");

    let outcome = AlignmentAnalysis::default().run(
        &source.load_signals().unwrap(),
        &source.load_issues().unwrap(),
    );
    assert!(!outcome.report.is_empty());
}

#[test]
fn report_runner_succeeds_on_fixture_files() {
    let temp = tempfile::tempdir().unwrap();
    let signals_path = temp.path().join("signals.json");
    let issues_path = temp.path().join("issues.json");
    fs::write(
        &signals_path,
        r#"[{"id": "1", "sentiment": -0.5, "topics": [{"name": "onboarding"}]},
            {"id": "2", "sentiment": 0.5, "topics": [{"name": "speed"}]}]"#,
    )
    .unwrap();
    fs::write(
        &issues_path,
        r#"{"data": {"issues": {"nodes": [
            {"id": "a", "title": "Onboarding revamp", "team": {"name": "Engineering"},
             "state": {"name": "In Progress", "type": "started"}}
        ]}}}"#,
    )
    .unwrap();

    let args = [
        "--signals",
        signals_path.to_str().unwrap(),
        "--issues",
        issues_path.to_str().unwrap(),
        "--match-mode",
        "topics",
        "--derive-topics",
        "--min-score",
        "75",
    ]
    .into_iter()
    .map(str::to_string);
    run_alignment_report(args).unwrap();
}

#[test]
fn report_runner_surfaces_missing_inputs() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("missing.json");
    let args = [
        "--signals".to_string(),
        missing.display().to_string(),
        "--issues".to_string(),
        missing.display().to_string(),
    ];
    assert!(run_alignment_report(args.into_iter()).is_err());
}
