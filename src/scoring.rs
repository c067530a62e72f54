//! String similarity scoring between feedback terms and issue text.
//!
//! All scores live in `[0, 100]`. `ratio` is the normalized Indel similarity
//! (`2 * LCS / total length`), and `partial_ratio` aligns the shorter string
//! against every window of the longer one and keeps the best `ratio`. Both
//! operate on `char`s, so multi-byte text is compared per scalar value.

use std::collections::HashMap;

use crate::constants::matching::EXACT_MATCH_SCORE;

/// Score `term` against a block of issue `text`.
///
/// Both sides are lowercased. A literal substring hit returns exactly 100;
/// anything else falls through to the rounded partial ratio.
pub fn match_score(text: &str, term: &str) -> u8 {
    let text = text.to_lowercase();
    let term = term.to_lowercase();
    if text.contains(&term) {
        return EXACT_MATCH_SCORE;
    }
    round_score(partial_ratio(&text, &term))
}

/// Best whole-string ratio between `term` and any of `topics`; 0 when empty.
pub fn best_topic_score<S: AsRef<str>>(term: &str, topics: &[S]) -> u8 {
    let term = term.to_lowercase();
    topics
        .iter()
        .map(|topic| round_score(ratio(&term, &topic.as_ref().to_lowercase())))
        .max()
        .unwrap_or(0)
}

/// Normalized Indel similarity of two strings in `[0, 100]`.
pub fn ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    ratio_chars(&left, &right)
}

/// Similarity of the best-aligned window of the longer string against the shorter one.
pub fn partial_ratio(left: &str, right: &str) -> f64 {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    if left.is_empty() && right.is_empty() {
        return 100.0;
    }
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    if left.len() == right.len() {
        // Edge windows differ by direction when lengths tie.
        return best_window_ratio(&left, &right).max(best_window_ratio(&right, &left));
    }
    if left.len() < right.len() {
        best_window_ratio(&left, &right)
    } else {
        best_window_ratio(&right, &left)
    }
}

fn round_score(score: f64) -> u8 {
    score.round().clamp(0.0, f64::from(EXACT_MATCH_SCORE)) as u8
}

fn ratio_chars(left: &[char], right: &[char]) -> f64 {
    let total = left.len() + right.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_len(left, right);
    100.0 * (2 * lcs) as f64 / total as f64
}

fn lcs_len(left: &[char], right: &[char]) -> usize {
    if left.is_empty() || right.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; right.len() + 1];
    let mut curr = vec![0usize; right.len() + 1];
    for &l in left {
        for (j, &r) in right.iter().enumerate() {
            curr[j + 1] = if l == r {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[right.len()]
}

/// Character profile of the needle, built once per `partial_ratio` call.
struct NeedleProfile<'a> {
    chars: &'a [char],
    counts: HashMap<char, usize>,
    /// Per-character position bitmasks; only built when the needle fits in a word.
    masks: Option<HashMap<char, u64>>,
}

impl<'a> NeedleProfile<'a> {
    fn new(chars: &'a [char]) -> Self {
        let mut counts: HashMap<char, usize> = HashMap::new();
        for &ch in chars {
            *counts.entry(ch).or_default() += 1;
        }
        let masks = (chars.len() <= u64::BITS as usize).then(|| {
            let mut masks: HashMap<char, u64> = HashMap::new();
            for (idx, &ch) in chars.iter().enumerate() {
                *masks.entry(ch).or_default() |= 1u64 << idx;
            }
            masks
        });
        Self {
            chars,
            counts,
            masks,
        }
    }

    fn ratio(&self, window: &[char]) -> f64 {
        let lcs = match &self.masks {
            Some(masks) => bit_parallel_lcs(masks, self.chars.len(), window),
            None => lcs_len(self.chars, window),
        };
        100.0 * (2 * lcs) as f64 / (self.chars.len() + window.len()) as f64
    }
}

/// LCS length for a needle of at most 64 chars (Hyyrö's bit-vector recurrence).
fn bit_parallel_lcs(masks: &HashMap<char, u64>, needle_len: usize, window: &[char]) -> usize {
    let mut row = !0u64;
    for ch in window {
        let matches = masks.get(ch).copied().unwrap_or(0);
        let carry = row & matches;
        row = row.wrapping_add(carry) | row.wrapping_sub(carry);
    }
    let used = if needle_len == u64::BITS as usize {
        !0u64
    } else {
        (1u64 << needle_len) - 1
    };
    (!row & used).count_ones() as usize
}

/// Multiset overlap between the needle and a window that slides one char at a time.
struct WindowOverlap<'p> {
    needle_counts: &'p HashMap<char, usize>,
    window_counts: HashMap<char, usize>,
    common: usize,
}

impl<'p> WindowOverlap<'p> {
    fn new(needle_counts: &'p HashMap<char, usize>) -> Self {
        Self {
            needle_counts,
            window_counts: HashMap::new(),
            common: 0,
        }
    }

    fn push(&mut self, ch: char) {
        let Some(&available) = self.needle_counts.get(&ch) else {
            return;
        };
        let held = self.window_counts.entry(ch).or_default();
        if *held < available {
            self.common += 1;
        }
        *held += 1;
    }

    fn pop(&mut self, ch: char) {
        let Some(&available) = self.needle_counts.get(&ch) else {
            return;
        };
        let held = self.window_counts.entry(ch).or_default();
        *held -= 1;
        if *held < available {
            self.common -= 1;
        }
    }
}

/// Windows of `haystack` compared against `needle` (`needle.len() <= haystack.len()`):
/// growing prefixes, every full-length window, then shrinking suffixes.
fn best_window_ratio(needle: &[char], haystack: &[char]) -> f64 {
    let m = needle.len();
    let n = haystack.len();
    let profile = NeedleProfile::new(needle);
    let mut overlap = WindowOverlap::new(&profile.counts);

    let prefixes = (1..m).map(|end| (0, end));
    let full = (0..=n - m).map(|start| (start, start + m));
    let suffixes = (n - m + 1..n).map(|start| (start, n));

    let mut best = 0.0f64;
    let (mut lo, mut hi) = (0, 0);
    for (start, end) in prefixes.chain(full).chain(suffixes) {
        // Window bounds only ever move forward.
        while hi < end {
            overlap.push(haystack[hi]);
            hi += 1;
        }
        while lo < start {
            overlap.pop(haystack[lo]);
            lo += 1;
        }
        let window = &haystack[start..end];
        // LCS can never exceed the multiset overlap of the two sides.
        let bound = 100.0 * (2 * overlap.common) as f64 / (m + window.len()) as f64;
        if bound <= best {
            continue;
        }
        let score = profile.ratio(window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}
