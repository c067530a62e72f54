/// Constants used by the match scorer and matcher.
pub mod matching {
    /// Score returned when a term is a literal substring of the issue text.
    pub const EXACT_MATCH_SCORE: u8 = 100;
    /// Default minimum score for a (term, issue) pair to count as a match.
    pub const DEFAULT_MIN_SCORE: u8 = 80;
    /// Separator used when joining issue fields into one scored text block.
    pub const ISSUE_TEXT_SEPARATOR: &str = " ";
}

/// Constants used by term and keyword extraction.
pub mod terms {
    /// Minimum length of an alphabetic token mined from free text.
    pub const MIN_KEYWORD_LEN: usize = 4;
    /// Tokens that are never treated as keywords.
    pub const STOP_WORDS: [&str; 8] = [
        "this", "that", "with", "from", "when", "calls", "call", "need",
    ];
}

/// Constants used by the feedback summarizer and issue topic tables.
pub mod summary {
    /// Default number of leaders returned per sentiment polarity.
    pub const DEFAULT_TOP_COUNT: usize = 5;
    /// Lifecycle type for issues that are in progress.
    pub const STATE_STARTED: &str = "started";
    /// Lifecycle type for issues that are done.
    pub const STATE_COMPLETED: &str = "completed";
}

/// Constants used by topic generation.
pub mod topics {
    /// Default number of issues sent to a topic generator per run.
    pub const DEFAULT_TOPIC_LIMIT: usize = 50;
    /// Maximum number of topics kept by the offline keyword generator.
    pub const MAX_KEYWORD_TOPICS: usize = 5;
}

/// Constants used by file-backed loaders.
pub mod source {
    /// Source id reported by the signal loader.
    pub const SIGNALS_SOURCE_ID: &str = "signals";
    /// Source id reported by the issue loader.
    pub const ISSUES_SOURCE_ID: &str = "issues";
    /// Source id reported by the in-memory source.
    pub const IN_MEMORY_SOURCE_ID: &str = "in_memory";
    /// File extension picked up when a loader is pointed at a directory.
    pub const JSON_EXTENSION: &str = "json";
    /// Log message used when a malformed signal row is skipped.
    pub const SKIP_SIGNAL_MSG: &str = "skipping malformed signal row";
    /// Log message used when a malformed issue row is skipped.
    pub const SKIP_ISSUE_MSG: &str = "skipping malformed issue row";
}
