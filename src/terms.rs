//! Term extraction: signals to normalized term rows, plus free-text keyword mining.

use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::terms::{MIN_KEYWORD_LEN, STOP_WORDS};
use crate::data::{Signal, SignalMeta, TermRow};
use crate::types::Term;
use crate::utils::normalize_term;

/// Distinct normalized terms attached to a signal (topics and keywords).
///
/// Repeating a term within one signal counts once for that signal.
pub fn signal_terms(signal: &Signal) -> BTreeSet<Term> {
    signal
        .topics
        .iter()
        .chain(signal.keywords.iter())
        .filter_map(|name| normalize_term(name))
        .collect()
}

/// Explode signals into one row per (signal, distinct term).
pub fn explode_signals(signals: &[Signal]) -> Vec<TermRow> {
    let mut rows = Vec::new();
    for signal in signals {
        let terms = signal_terms(signal);
        if terms.is_empty() {
            continue;
        }
        let meta = SignalMeta::from(signal);
        for term in terms {
            rows.push(TermRow {
                signal_id: signal.id.clone(),
                term,
                sentiment: signal.sentiment,
                meta: meta.clone(),
            });
        }
    }
    debug!(
        "[alignment:terms] exploded {} signals into {} term rows",
        signals.len(),
        rows.len()
    );
    rows
}

/// Mine candidate keywords from free text.
///
/// Keeps maximal runs of ASCII letters at least four long, lowercased, minus a
/// small stop-list. Order is preserved and repeats are kept.
pub fn extract_keywords(text: &str) -> Vec<Term> {
    text.to_lowercase()
        .split(|ch: char| !ch.is_ascii_alphabetic())
        .filter(|token| token.len() >= MIN_KEYWORD_LEN)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}
