use thiserror::Error;

/// Errors reported by the matching core.
/// All operations are deterministic, so every failure is reproducible;
/// nothing is retried or silently defaulted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Vocabulary/IDF weights requested before `fit`.
    #[error("no fitted vocabulary; call `fit` or `add_corpus` first")]
    NotFitted,

    /// `match_against_corpus` called before `add_corpus`.
    #[error("no corpus to match against; call `add_corpus` first")]
    NoCorpus,

    /// `fit` called with zero strings (IDF is undefined).
    #[error("cannot fit on an empty collection of strings")]
    EmptyFitInput,

    /// A vector references a term dimension outside the vocabulary.
    /// Internal invariant violation, not a user-facing condition.
    #[error("term dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}
