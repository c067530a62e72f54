/// Opaque feedback signal identifier.
/// Examples: `sig_0192`, `42` (numeric ids are stringified on load)
pub type SignalId = String;
/// Opaque issue identifier assigned by the tracker.
/// Example: `5b1c3a9e-1f0d-4a55-9d1e-7c1c2a0b9f10`
pub type IssueId = String;
/// Normalized (trimmed, lowercase, non-empty) feedback term.
/// Examples: `onboarding`, `call recording`, `speed`
pub type Term = String;
/// Team name used as a pivot column in alignment reports.
/// Examples: `Engineering`, `Customer Support`
pub type TeamName = String;
/// Identifier for the loader that produced a corpus.
/// Examples: `signals`, `issues`, `in_memory`
pub type SourceId = String;
/// Issue lifecycle stage as reported by the tracker.
/// Examples: `started`, `completed`, `backlog`
pub type StateType = String;
