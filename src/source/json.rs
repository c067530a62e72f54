//! JSON loaders for feedback signals and tracker issues.
//!
//! Rows are parsed one at a time. A row that is missing a required field, or
//! whose fields have the wrong type, is logged and skipped; only a document
//! with the wrong overall shape fails the load.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::source::{
    ISSUES_SOURCE_ID, SIGNALS_SOURCE_ID, SKIP_ISSUE_MSG, SKIP_SIGNAL_MSG,
};
use crate::data::{Issue, IssueState, Signal};
use crate::errors::AlignmentError;
use crate::source::dates::{parse_signal_date, parse_timestamp};
use crate::source::{IssueSource, SignalSource};
use crate::topics::parse_topic_response;
use crate::transport::fs::JsonFileStream;
use crate::types::SourceId;

#[derive(Debug, Default, Deserialize)]
struct NamedRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPerson {
    #[serde(default)]
    company: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSignal {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    sentiment: Option<f64>,
    #[serde(default)]
    topics: Option<Vec<NamedRef>>,
    #[serde(default)]
    keywords: Option<Vec<NamedRef>>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    exact_quote: Option<String>,
    #[serde(default)]
    types: Option<Vec<NamedRef>>,
    #[serde(default)]
    impacts: Option<Vec<NamedRef>>,
    #[serde(default)]
    person: Option<RawPerson>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawState {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    state_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLabels {
    Connection { nodes: Vec<NamedRef> },
    List(Vec<NamedRef>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIssue {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    completed_at: Option<String>,
    #[serde(default)]
    state: Option<RawState>,
    #[serde(default)]
    team: Option<NamedRef>,
    #[serde(default)]
    project: Option<NamedRef>,
    #[serde(default)]
    labels: Option<RawLabels>,
    #[serde(default, alias = "llm_topics", alias = "llmTopics")]
    topics: Option<Value>,
}

fn names(refs: Option<Vec<NamedRef>>) -> Vec<String> {
    refs.unwrap_or_default()
        .into_iter()
        .filter_map(|named| named.name)
        .filter(|name| !name.is_empty())
        .collect()
}

fn opaque_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) if !id.trim().is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Parse one signal row; the error is the reason the row was rejected.
pub fn parse_signal(item: &Value) -> Result<Signal, String> {
    let raw = RawSignal::deserialize(item).map_err(|err| err.to_string())?;
    let id = opaque_id(raw.id.as_ref()).ok_or_else(|| "missing id".to_string())?;
    let date = match raw.date.as_deref() {
        Some(text) => {
            let parsed = parse_signal_date(text);
            if parsed.is_none() {
                debug!("[alignment:source] signal '{}' has unparseable date '{}'", id, text);
            }
            parsed
        }
        None => None,
    };
    Ok(Signal {
        id,
        sentiment: raw.sentiment.unwrap_or(0.0),
        topics: names(raw.topics),
        keywords: names(raw.keywords),
        summary: non_empty(raw.summary),
        exact_quote: non_empty(raw.exact_quote),
        types: names(raw.types),
        impacts: names(raw.impacts),
        company: raw.person.and_then(|person| non_empty(person.company)),
        date,
    })
}

fn parse_topics(value: Option<Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|topic| topic.trim().to_lowercase())
                .filter(|topic| !topic.is_empty())
                .collect(),
        ),
        Value::String(raw) => Some(parse_topic_response(&raw)),
        _ => None,
    }
}

/// Parse one issue row; the error is the reason the row was rejected.
pub fn parse_issue(item: &Value) -> Result<Issue, String> {
    let raw = RawIssue::deserialize(item).map_err(|err| err.to_string())?;
    let id = opaque_id(raw.id.as_ref()).ok_or_else(|| "missing id".to_string())?;
    let title = raw.title.ok_or_else(|| format!("issue '{id}' is missing a title"))?;
    let team = raw
        .team
        .and_then(|team| non_empty(team.name))
        .ok_or_else(|| format!("issue '{id}' is missing a team"))?;
    let state = raw
        .state
        .map(|state| IssueState {
            name: state.name.unwrap_or_default(),
            state_type: state.state_type.unwrap_or_default(),
        })
        .unwrap_or_default();
    let labels = match raw.labels {
        Some(RawLabels::Connection { nodes }) | Some(RawLabels::List(nodes)) => names(Some(nodes)),
        None => Vec::new(),
    };
    Ok(Issue {
        id,
        identifier: non_empty(raw.identifier),
        title,
        description: non_empty(raw.description),
        team,
        state,
        project: raw.project.and_then(|project| non_empty(project.name)),
        created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        completed_at: raw.completed_at.as_deref().and_then(parse_timestamp),
        labels,
        topics: parse_topics(raw.topics),
    })
}

/// Parse a signals document: a JSON array of signal objects.
pub fn parse_signals_document(
    source_id: &str,
    document: &Value,
) -> Result<Vec<Signal>, AlignmentError> {
    let items = document
        .as_array()
        .ok_or_else(|| AlignmentError::SourceInconsistent {
            source_id: source_id.to_string(),
            details: "expected a JSON array of signals".into(),
        })?;
    let mut signals = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_signal(item) {
            Ok(signal) => signals.push(signal),
            Err(reason) => warn!(
                "[alignment:source] {} source='{}' index={} reason={}",
                SKIP_SIGNAL_MSG, source_id, idx, reason
            ),
        }
    }
    Ok(signals)
}

/// Parse an issues document: a JSON array of issue nodes, or a GraphQL
/// response shaped like `{"data": {"issues": {"nodes": [...]}}}`.
pub fn parse_issues_document(
    source_id: &str,
    document: &Value,
) -> Result<Vec<Issue>, AlignmentError> {
    let items = document
        .as_array()
        .or_else(|| {
            document
                .pointer("/data/issues/nodes")
                .or_else(|| document.pointer("/issues/nodes"))
                .and_then(Value::as_array)
        })
        .ok_or_else(|| AlignmentError::SourceInconsistent {
            source_id: source_id.to_string(),
            details: "expected a JSON array of issues or a data.issues.nodes envelope".into(),
        })?;
    let mut issues = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_issue(item) {
            Ok(issue) => issues.push(issue),
            Err(reason) => warn!(
                "[alignment:source] {} source='{}' index={} reason={}",
                SKIP_ISSUE_MSG, source_id, idx, reason
            ),
        }
    }
    Ok(issues)
}

fn load_documents(
    stream: &JsonFileStream,
    source_id: &str,
) -> Result<Vec<(PathBuf, Value)>, AlignmentError> {
    stream
        .documents()
        .map_err(|err| AlignmentError::SourceUnavailable {
            source_id: source_id.to_string(),
            reason: format!("{}: {err}", stream.root().display()),
        })
}

/// Signals loaded from a JSON file or a directory of JSON files.
pub struct JsonSignalSource {
    source_id: SourceId,
    stream: JsonFileStream,
}

impl JsonSignalSource {
    /// Create a loader for `root` (a file or a directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            source_id: SIGNALS_SOURCE_ID.to_string(),
            stream: JsonFileStream::new(root),
        }
    }

    /// Override the source id used in logs and errors.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

impl SignalSource for JsonSignalSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load_signals(&self) -> Result<Vec<Signal>, AlignmentError> {
        let mut signals = Vec::new();
        for (path, document) in load_documents(&self.stream, &self.source_id)? {
            let parsed = parse_signals_document(&self.source_id, &document)?;
            debug!(
                "[alignment:source] {} signals from {}",
                parsed.len(),
                path.display()
            );
            signals.extend(parsed);
        }
        Ok(signals)
    }
}

/// Issues loaded from a JSON export (file or directory).
pub struct JsonIssueSource {
    source_id: SourceId,
    stream: JsonFileStream,
}

impl JsonIssueSource {
    /// Create a loader for `root` (a file or a directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            source_id: ISSUES_SOURCE_ID.to_string(),
            stream: JsonFileStream::new(root),
        }
    }

    /// Override the source id used in logs and errors.
    pub fn with_source_id(mut self, source_id: impl Into<SourceId>) -> Self {
        self.source_id = source_id.into();
        self
    }
}

impl IssueSource for JsonIssueSource {
    fn id(&self) -> &str {
        &self.source_id
    }

    fn load_issues(&self) -> Result<Vec<Issue>, AlignmentError> {
        let mut issues = Vec::new();
        for (path, document) in load_documents(&self.stream, &self.source_id)? {
            let parsed = parse_issues_document(&self.source_id, &document)?;
            debug!(
                "[alignment:source] {} issues from {}",
                parsed.len(),
                path.display()
            );
            issues.extend(parsed);
        }
        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn parses_signal_with_nested_tags_and_numeric_id() {
        let signal = parse_signal(&json!({
            "id": 17,
            "sentiment": -0.4,
            "topics": [{"name": "Onboarding"}, {"name": null}, {}],
            "keywords": [{"name": "SSO"}],
            "summary": "Setup is confusing",
            "exactQuote": "I could not find the invite button",
            "types": [{"name": "complaint"}],
            "impacts": [{"name": "churn risk"}],
            "person": {"company": "Acme"},
            "date": "2025-02-14"
        }))
        .unwrap();

        assert_eq!(signal.id, "17");
        assert_eq!(signal.sentiment, -0.4);
        assert_eq!(signal.topics, vec!["Onboarding"]);
        assert_eq!(signal.keywords, vec!["SSO"]);
        assert_eq!(signal.exact_quote.as_deref(), Some("I could not find the invite button"));
        assert_eq!(signal.types, vec!["complaint"]);
        assert_eq!(signal.impacts, vec!["churn risk"]);
        assert_eq!(signal.company.as_deref(), Some("Acme"));
        assert_eq!(signal.date, NaiveDate::from_ymd_opt(2025, 2, 14));
    }

    #[test]
    fn signal_defaults_sentiment_and_rejects_missing_id() {
        let signal = parse_signal(&json!({"id": "s1", "topics": null})).unwrap();
        assert_eq!(signal.sentiment, 0.0);
        assert!(signal.topics.is_empty());

        assert!(parse_signal(&json!({"sentiment": 0.3})).is_err());
        assert!(parse_signal(&json!({"id": "s2", "sentiment": "very good"})).is_err());
    }

    #[test]
    fn signals_document_skips_bad_rows_and_rejects_bad_shape() {
        let document = json!([
            {"id": "1", "sentiment": 0.5, "topics": [{"name": "speed"}]},
            {"sentiment": 0.1},
            "not an object",
            {"id": "2", "sentiment": -0.2}
        ]);
        let signals = parse_signals_document("signals", &document).unwrap();
        let ids: Vec<_> = signals.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert!(matches!(
            parse_signals_document("signals", &json!({"signals": []})),
            Err(AlignmentError::SourceInconsistent { .. })
        ));
    }

    #[test]
    fn parses_tracker_issue_node() {
        let issue = parse_issue(&json!({
            "id": "abc",
            "identifier": "ENG-12",
            "title": "Improve onboarding flow",
            "description": "",
            "createdAt": "2025-03-02T14:05:00.000Z",
            "completedAt": null,
            "state": {"name": "In Progress", "type": "started"},
            "team": {"name": "Engineering"},
            "project": {"name": "Activation"},
            "labels": {"nodes": [{"name": "ux"}, {"name": "p1"}]}
        }))
        .unwrap();

        assert_eq!(issue.identifier.as_deref(), Some("ENG-12"));
        assert_eq!(issue.description, None);
        assert_eq!(issue.state.state_type, "started");
        assert!(issue.is_in_state("started"));
        assert_eq!(issue.project.as_deref(), Some("Activation"));
        assert_eq!(issue.labels, vec!["ux", "p1"]);
        assert!(issue.created_at.is_some());
        assert!(issue.completed_at.is_none());
        assert!(issue.topics.is_none());
    }

    #[test]
    fn issue_topics_accept_arrays_and_encoded_strings() {
        let base = |topics: Value| {
            json!({"id": "1", "title": "t", "team": {"name": "Eng"}, "topics": topics})
        };
        let from_array = parse_issue(&base(json!(["Billing", " "]))).unwrap();
        assert_eq!(from_array.topics, Some(vec!["billing".to_string()]));

        let from_json_string = parse_issue(&base(json!("[\"Billing\", \"Export\"]"))).unwrap();
        assert_eq!(
            from_json_string.topics,
            Some(vec!["billing".to_string(), "export".to_string()])
        );

        let from_csv = parse_issue(&base(json!("billing, export"))).unwrap();
        assert_eq!(
            from_csv.topics,
            Some(vec!["billing".to_string(), "export".to_string()])
        );

        let legacy = parse_issue(&json!({
            "id": "2", "title": "t", "team": {"name": "Eng"}, "llm_topics": ["sso"]
        }))
        .unwrap();
        assert_eq!(legacy.topics, Some(vec!["sso".to_string()]));
    }

    #[test]
    fn issues_document_accepts_graphql_envelope_and_skips_incomplete_rows() {
        let document = json!({
            "data": {"issues": {"nodes": [
                {"id": "1", "title": "A", "team": {"name": "Eng"}},
                {"id": "2", "title": "B"},
                {"id": "3", "team": {"name": "Eng"}},
                {"title": "D", "team": {"name": "Eng"}}
            ]}}
        });
        let issues = parse_issues_document("issues", &document).unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "1");

        assert!(matches!(
            parse_issues_document("issues", &json!({"data": {}})),
            Err(AlignmentError::SourceInconsistent { .. })
        ));
    }

    #[test]
    fn missing_root_reports_unavailable_source() {
        let source = JsonSignalSource::new("/definitely/not/here.json").with_source_id("fb");
        match source.load_signals() {
            Err(AlignmentError::SourceUnavailable { source_id, .. }) => assert_eq!(source_id, "fb"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
