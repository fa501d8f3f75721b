pub mod ngram;
pub mod result;
pub mod serde;
pub mod tfidf;

use ::serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MatchError;
use crate::matcher::result::Matches;
use crate::matcher::tfidf::TfIdfModel;
use crate::sparse::topn::topn_multiply;
use crate::sparse::{sparse_dot, CscMatrix};

/// Reference strings plus their vectorized column-major matrix.
/// Strings are not deduplicated; index position is the join key back into
/// match results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    pub strings: Vec<String>,
    pub matrix: CscMatrix,
}

/// Fuzzy string matcher on TF-IDF weighted character n-grams.
///
/// Lifecycle: created unfitted; `fit` learns vocabulary and IDF weights;
/// `add_corpus` vectorizes and stores the reference set (fitting on it
/// first when no vocabulary exists yet). Matching borrows the state
/// immutably, so a fitted matcher can serve match calls concurrently;
/// `fit`/`add_corpus` must not race with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuzzyMatcher {
    n_grams: usize,
    model: Option<TfIdfModel>,
    corpus: Option<Corpus>,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_N_GRAMS)
    }
}

impl FuzzyMatcher {
    /// Trigrams work well for names and addresses.
    pub const DEFAULT_N_GRAMS: usize = 3;
    pub const DEFAULT_TOP_N: usize = 5;
    pub const DEFAULT_THRESHOLD: f64 = 0.0;

    /// Create an unfitted matcher over character n-grams of size `n_grams`.
    pub fn new(n_grams: usize) -> Self {
        Self {
            n_grams,
            model: None,
            corpus: None,
        }
    }

    /// n-gram size this matcher tokenizes with.
    #[inline]
    pub fn n_grams(&self) -> usize {
        self.n_grams
    }

    /// Whether vocabulary and IDF weights exist.
    #[inline]
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Whether a corpus has been added.
    #[inline]
    pub fn has_corpus(&self) -> bool {
        self.corpus.is_some()
    }

    /// The fitted model, or `NotFitted`.
    pub fn model(&self) -> Result<&TfIdfModel, MatchError> {
        self.model.as_ref().ok_or(MatchError::NotFitted)
    }

    /// The stored corpus, or `NoCorpus`.
    pub fn corpus(&self) -> Result<&Corpus, MatchError> {
        self.corpus.as_ref().ok_or(MatchError::NoCorpus)
    }

    /// Learn vocabulary and IDF weights from `strings`.
    ///
    /// Always allowed; a re-fit replaces the model from scratch and drops
    /// any stored corpus, whose vectors were built against the replaced
    /// vocabulary and are no longer comparable.
    pub fn fit<S: AsRef<str>>(&mut self, strings: &[S]) -> Result<(), MatchError> {
        self.model = Some(TfIdfModel::fit(self.n_grams, strings)?);
        if self.corpus.take().is_some() {
            debug!("re-fit dropped the stored corpus");
        }
        Ok(())
    }

    /// Vectorize and store a corpus to match against.
    /// If no vocabulary exists yet, IDF weights are fitted on the corpus
    /// itself first.
    pub fn add_corpus<S: AsRef<str> + Sync>(&mut self, corpus: &[S]) -> Result<(), MatchError> {
        if self.model.is_none() {
            debug!("no fitted vocabulary; fitting on the corpus");
            self.model = Some(TfIdfModel::fit(self.n_grams, corpus)?);
        }
        let model = self.model.as_ref().ok_or(MatchError::NotFitted)?;
        let matrix = model.transform(corpus).to_csc();
        self.corpus = Some(Corpus {
            strings: corpus.iter().map(|s| s.as_ref().to_string()).collect(),
            matrix,
        });
        Ok(())
    }

    /// Match `strings` against the stored corpus, returning for each string
    /// at most `top_n` corpus entries with score strictly above `threshold`.
    pub fn match_against_corpus<S: AsRef<str> + Sync>(
        &self,
        strings: &[S],
        top_n: usize,
        threshold: f64,
    ) -> Result<Vec<Matches>, MatchError> {
        let corpus = self.corpus.as_ref().ok_or(MatchError::NoCorpus)?;
        let model = self.model.as_ref().ok_or(MatchError::NotFitted)?;
        let queries = model.transform(strings);
        let hits = topn_multiply(&queries, &corpus.matrix, top_n, threshold)?;
        Ok(result::assemble(strings, &corpus.strings, &hits))
    }

    /// Match `left` against `right`, returning for each left string at most
    /// `top_n` right strings with score strictly above `threshold`.
    /// Needs only vocabulary and IDF weights, not a stored corpus.
    pub fn match_sets<L, R>(
        &self,
        left: &[L],
        right: &[R],
        top_n: usize,
        threshold: f64,
    ) -> Result<Vec<Matches>, MatchError>
    where
        L: AsRef<str> + Sync,
        R: AsRef<str> + Sync,
    {
        let model = self.model.as_ref().ok_or(MatchError::NotFitted)?;
        let left_vect = model.transform(left);
        let right_vect = model.transform(right).to_csc();
        let hits = topn_multiply(&left_vect, &right_vect, top_n, threshold)?;
        Ok(result::assemble(left, right, &hits))
    }

    /// Cosine similarity of two single strings under the fitted weights.
    pub fn score_pair(&self, left: &str, right: &str) -> Result<f64, MatchError> {
        let model = self.model.as_ref().ok_or(MatchError::NotFitted)?;
        let left_vect = model.transform(&[left]);
        let right_vect = model.transform(&[right]);
        let (l_inds, l_vals) = left_vect.row(0);
        let (r_inds, r_vals) = right_vect.row(0);
        Ok(sparse_dot(l_inds, l_vals, r_inds, r_vals))
    }
}
