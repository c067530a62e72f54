/// Size of one matcher cross product.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchWorkload {
    pub terms: usize,
    pub issues: usize,
    /// Number of (term, issue) pairs the matcher will score.
    pub pairs: u128,
}

/// Pair count for a `terms` by `issues` cross product.
pub fn estimate_match_workload(terms: usize, issues: usize) -> MatchWorkload {
    MatchWorkload {
        terms,
        issues,
        pairs: (terms as u128).saturating_mul(issues as u128),
    }
}

/// Upper bound on vocabulary size produced by a `top_count` leader cap.
pub fn capped_vocabulary_size(top_count: usize, available_terms: usize) -> usize {
    top_count.saturating_mul(2).min(available_terms)
}

pub fn format_u128_with_commas(value: u128) -> String {
    let raw = value.to_string();
    let mut grouped_reversed = String::with_capacity(raw.len() + (raw.len() / 3));
    for (idx, ch) in raw.chars().rev().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped_reversed.push(',');
        }
        grouped_reversed.push(ch);
    }
    grouped_reversed.chars().rev().collect()
}

/// Render a share in `[0, 1]` as a percentage with one decimal.
pub fn format_share(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}
