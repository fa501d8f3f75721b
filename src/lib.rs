/// This crate is a fuzzy string matching engine on TF-IDF weighted
/// character n-grams. It matches noisy real-world strings (company names,
/// addresses) against a canonical list without ever materializing the full
/// dense similarity matrix.
pub mod error;
pub mod matcher;
pub mod sparse;

/// Fuzzy Matcher
/// The top-level struct of this crate, providing the main matching features.
/// It learns a vocabulary of character n-grams and inverse-document-
/// frequency weights from a string collection, vectorizes queries and
/// corpus into L2-normalized sparse vectors, and returns per query the
/// top-N corpus entries by cosine similarity above a threshold.
///
/// Lifecycle: unfitted -> fitted (`fit`) -> has corpus (`add_corpus`).
/// `add_corpus` on an unfitted matcher fits on the corpus itself.
/// `match_sets` and `score_pair` need only a fitted vocabulary;
/// `match_against_corpus` needs a stored corpus.
///
/// # Serialization
/// Supported. The whole state (n-gram size, vocabulary, IDF weights,
/// corpus and corpus vectors) round-trips through an opaque CBOR blob via
/// `to_bytes`/`from_bytes` or any `io::Write`/`io::Read` via
/// `save_state`/`load_state`.
pub use matcher::FuzzyMatcher;

/// Fitted vocabulary and IDF weights.
/// Owns the term -> index mapping (immutable after fit) and one smoothed
/// IDF weight per term. `transform` produces L2-normalized sparse TF-IDF
/// rows; terms unseen at fit time are dropped silently.
pub use matcher::tfidf::TfIdfModel;

/// Match result structures.
/// - `Matches`: one query string with its ranked match list; queries with
///   no match above the threshold keep an empty list
/// - `MatchEntry`: a single result entry with score, corpus index and
///   corpus string
pub use matcher::result::{MatchEntry, Matches};

/// Stored reference set: the raw corpus strings plus their vectorized
/// column-major matrix. Index position joins matches back to strings.
pub use matcher::Corpus;

/// Error kinds of the matching core.
/// All operations are deterministic pure functions over their inputs, so
/// every reported failure is reproducible.
pub use error::MatchError;

/// Sparse matrix primitives shared by vectorizer and matcher: row-major
/// `CsrMatrix` for vectorized strings, column-major `CscMatrix` for the
/// transposed corpus view.
pub use sparse::{CscMatrix, CsrMatrix};

/// The bounded top-N sparse multiply at the heart of the matcher: fuses the
/// similarity product with per-row truncation, so peak memory is
/// O(rows x top_n) instead of O(rows x corpus).
pub use sparse::topn::topn_multiply;
