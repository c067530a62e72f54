use std::fs;
use std::path::Path;

use feedback_alignment::AlignmentError;
use feedback_alignment::source::{IssueSource, JsonIssueSource, JsonSignalSource, SignalSource};

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

const SIGNALS: &str = r#"[
  {"id": "s1", "sentiment": -0.8, "topics": [{"name": "Onboarding"}], "keywords": [{"name": "SSO"}]},
  {"sentiment": 0.4, "topics": [{"name": "Speed"}]},
  {"id": "s2", "sentiment": 0.9, "topics": [{"name": "speed"}], "date": "2024-05-01"}
]"#;

const GRAPHQL_ISSUES: &str = r#"{
  "data": {
    "issues": {
      "nodes": [
        {
          "id": "i1",
          "identifier": "ENG-1",
          "title": "Improve onboarding flow",
          "state": {"name": "In Progress", "type": "started"},
          "team": {"name": "Engineering"},
          "project": {"name": "Activation"},
          "labels": {"nodes": [{"name": "ux"}]},
          "createdAt": "2024-04-01T10:00:00Z"
        },
        {
          "id": "i2",
          "title": "Missing team is skipped",
          "state": {"name": "Todo", "type": "unstarted"}
        }
      ]
    }
  }
}"#;

#[test]
fn signal_file_loads_and_skips_rows_without_id() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("signals.json");
    write(&path, SIGNALS);

    let source = JsonSignalSource::new(&path);
    assert_eq!(source.id(), "signals");
    let signals = source.load_signals().unwrap();

    let ids: Vec<_> = signals.iter().map(|signal| signal.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
    assert_eq!(signals[0].topics, vec!["Onboarding"]);
    assert_eq!(signals[0].keywords, vec!["SSO"]);
    assert!(signals[1].date.is_some());
}

#[test]
fn issue_graphql_envelope_loads_and_skips_rows_without_team() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("issues.json");
    write(&path, GRAPHQL_ISSUES);

    let issues = JsonIssueSource::new(&path)
        .with_source_id("tracker")
        .load_issues()
        .unwrap();

    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.id, "i1");
    assert_eq!(issue.identifier.as_deref(), Some("ENG-1"));
    assert_eq!(issue.team, "Engineering");
    assert_eq!(issue.project.as_deref(), Some("Activation"));
    assert_eq!(issue.labels, vec!["ux"]);
    assert!(issue.is_in_state("started"));
    assert!(issue.created_at.is_some());
    assert!(issue.topics.is_none());
}

#[test]
fn directory_sources_read_every_json_file_in_path_order() {
    let temp = tempfile::tempdir().unwrap();
    write(
        &temp.path().join("b/second.json"),
        r#"[{"id": "b1", "sentiment": 0.1, "topics": [{"name": "search"}]}]"#,
    );
    write(
        &temp.path().join("a.json"),
        r#"[{"id": "a1", "sentiment": -0.1, "topics": [{"name": "billing"}]}]"#,
    );
    write(&temp.path().join("notes.txt"), "not json");

    let signals = JsonSignalSource::new(temp.path()).load_signals().unwrap();
    let ids: Vec<_> = signals.iter().map(|signal| signal.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "b1"]);
}

#[test]
fn plain_issue_array_with_topics_loads() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("issues.json");
    write(
        &path,
        r#"[
          {"id": "i1", "title": "Speed up search", "team": {"name": "Engineering"},
           "state": {"name": "Done", "type": "completed"},
           "llm_topics": ["Search", " Performance "]},
          {"id": "i2", "title": "Billing export", "team": {"name": "Finance"},
           "topics": "billing, exports"}
        ]"#,
    );

    let issues = JsonIssueSource::new(&path).load_issues().unwrap();
    assert_eq!(
        issues[0].topics.as_deref(),
        Some(&["search".to_string(), "performance".to_string()][..])
    );
    assert_eq!(
        issues[1].topics.as_deref(),
        Some(&["billing".to_string(), "exports".to_string()][..])
    );
}

#[test]
fn missing_path_is_source_unavailable() {
    let temp = tempfile::tempdir().unwrap();
    let err = JsonIssueSource::new(temp.path().join("absent.json"))
        .load_issues()
        .unwrap_err();
    assert!(matches!(
        err,
        AlignmentError::SourceUnavailable { ref source_id, .. } if source_id == "issues"
    ));
}

#[test]
fn wrong_document_shape_is_source_inconsistent() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("issues.json");
    write(&path, r#"{"data": {"projects": []}}"#);

    let err = JsonIssueSource::new(&path).load_issues().unwrap_err();
    assert!(matches!(err, AlignmentError::SourceInconsistent { .. }));
}
