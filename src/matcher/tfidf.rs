use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::MatchError;
use crate::matcher::ngram;
use crate::sparse::CsrMatrix;

/// Fitted n-gram vocabulary and IDF weights.
///
/// `fit` learns the set of distinct n-grams across a document collection and
/// an inverse-document-frequency weight per term; `transform` turns any
/// string collection into L2-normalized sparse TF-IDF rows over that fixed
/// vocabulary. The vocabulary is immutable after fit; re-fitting builds a
/// fresh model.
///
/// IDF uses the smoothed form `ln((1 + D) / (1 + df)) + 1`, so a term seen
/// in every document still carries weight 1 and the formula is defined for
/// every df.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfIdfModel {
    /// n-gram size the model was fitted with
    n_grams: usize,
    /// term -> dense column index; lexicographically sorted at fit so the
    /// index assignment is independent of document order
    vocab: IndexMap<Box<str>, u32>,
    /// smoothed IDF per term, index-aligned with `vocab`
    idf: Vec<f64>,
    /// number of fitted documents
    doc_num: u64,
}

impl TfIdfModel {
    /// Learn vocabulary and IDF weights from a document collection.
    /// Inputs are lowercased; each document counts a term at most once for
    /// document frequency.
    pub fn fit<S: AsRef<str>>(n_grams: usize, strings: &[S]) -> Result<Self, MatchError> {
        if strings.is_empty() {
            return Err(MatchError::EmptyFitInput);
        }
        let mut df: HashMap<Box<str>, u64> = HashMap::new();
        for s in strings {
            let lc = s.as_ref().to_lowercase();
            let grams: HashSet<String> = ngram::ngrams(&lc, n_grams).into_iter().collect();
            for gram in grams {
                *df.entry(gram.into_boxed_str()).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(Box<str>, u64)> = df.into_iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let doc_num = strings.len() as u64;
        let mut vocab = IndexMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (i, (term, df_t)) in terms.into_iter().enumerate() {
            vocab.insert(term, i as u32);
            idf.push(((1.0 + doc_num as f64) / (1.0 + df_t as f64)).ln() + 1.0);
        }
        debug!(terms = idf.len(), documents = doc_num, "fitted idf weights");

        Ok(Self {
            n_grams,
            vocab,
            idf,
            doc_num,
        })
    }

    /// Vectorize a string collection into sparse TF-IDF rows.
    /// Terms unseen at fit time contribute nothing; a string with no
    /// in-vocabulary term becomes the zero vector.
    pub fn transform<S: AsRef<str> + Sync>(&self, strings: &[S]) -> CsrMatrix {
        let rows: Vec<Vec<(u32, f64)>> = strings
            .par_iter()
            .map(|s| self.transform_one(s.as_ref()))
            .collect();
        CsrMatrix::from_rows(self.vocab.len(), rows)
    }

    fn transform_one(&self, s: &str) -> Vec<(u32, f64)> {
        let lc = s.to_lowercase();
        let mut counts: HashMap<u32, u64> = HashMap::new();
        for gram in ngram::ngrams(&lc, self.n_grams) {
            if let Some(&ix) = self.vocab.get(gram.as_str()) {
                *counts.entry(ix).or_insert(0) += 1;
            }
        }
        let mut row: Vec<(u32, f64)> = counts
            .into_iter()
            .map(|(ix, count)| (ix, count as f64 * self.idf[ix as usize]))
            .collect();
        row.sort_unstable_by_key(|&(ix, _)| ix);

        let norm = row.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        // zero-norm rows stay zero
        if norm > 0.0 {
            for (_, w) in &mut row {
                *w /= norm;
            }
        }
        row
    }

    /// n-gram size this model was fitted with.
    #[inline]
    pub fn n_grams(&self) -> usize {
        self.n_grams
    }

    /// Number of distinct terms in the vocabulary.
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }

    /// Number of documents the model was fitted on.
    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    /// IDF weight of a term, if it is in the vocabulary.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocab.get(term).map(|&ix| self.idf[ix as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm_of(row: (&[u32], &[f64])) -> f64 {
        row.1.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    #[test]
    fn fit_rejects_empty_input() {
        let strings: Vec<&str> = Vec::new();
        assert_eq!(
            TfIdfModel::fit(3, &strings).unwrap_err(),
            MatchError::EmptyFitInput
        );
    }

    #[test]
    fn fit_builds_sorted_vocabulary() {
        let model = TfIdfModel::fit(3, &["zebra", "abbey"]).unwrap();
        // grams: zebra -> zeb, ebr, bra; abbey -> abb, bbe, bey
        assert_eq!(model.vocab_size(), 6);
        let terms: Vec<&str> = model.vocab.keys().map(|k| k.as_ref()).collect();
        let mut sorted = terms.clone();
        sorted.sort_unstable();
        assert_eq!(terms, sorted);
    }

    #[test]
    fn idf_follows_smoothed_formula() {
        // "app" appears in both documents, "ple" in one
        let model = TfIdfModel::fit(3, &["apple", "appla"]).unwrap();
        let d = 2.0f64;
        assert_eq!(model.idf("app").unwrap(), ((1.0 + d) / (1.0 + 2.0)).ln() + 1.0);
        assert_eq!(model.idf("ple").unwrap(), ((1.0 + d) / (1.0 + 1.0)).ln() + 1.0);
        assert_eq!(model.idf("xyz"), None);
    }

    #[test]
    fn document_frequency_counts_each_document_once() {
        // "aaaa" holds "aa" twice as a window but df must count it once
        let model = TfIdfModel::fit(2, &["aaaa", "bb"]).unwrap();
        let d = 2.0f64;
        assert_eq!(model.idf("aa").unwrap(), ((1.0 + d) / (1.0 + 1.0)).ln() + 1.0);
    }

    #[test]
    fn fit_lowercases_input() {
        let model = TfIdfModel::fit(3, &["APPLE"]).unwrap();
        assert!(model.idf("app").is_some());
        assert!(model.idf("APP").is_none());
    }

    #[test]
    fn transform_rows_are_unit_norm() {
        let model = TfIdfModel::fit(3, &["apple inc", "banana co"]).unwrap();
        let m = model.transform(&["apple inc", "banana"]);
        for i in 0..m.n_rows {
            assert!((norm_of(m.row(i)) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn out_of_vocabulary_transforms_to_zero_vector() {
        let model = TfIdfModel::fit(3, &["hello world"]).unwrap();
        let m = model.transform(&["xyzqw"]);
        assert_eq!(m.nnz(), 0);
        // empty strings are valid input and vectorize to zero
        let m = model.transform(&[""]);
        assert_eq!(m.nnz(), 0);
        assert_eq!(m.n_rows, 1);
    }

    #[test]
    fn repeated_terms_scale_with_count() {
        let model = TfIdfModel::fit(2, &["abab", "cd"]).unwrap();
        // in "ababab": "ab" x3, "ba" x2; both share one idf, so the
        // normalized weights must be in a 3:2 ratio
        let m = model.transform(&["ababab"]);
        let (inds, vals) = m.row(0);
        assert_eq!(inds.len(), 2);
        let w_ab = vals[0].max(vals[1]);
        let w_ba = vals[0].min(vals[1]);
        assert!((w_ab / w_ba - 1.5).abs() < 1e-12);
    }

    #[test]
    fn transform_indices_are_ascending() {
        let model = TfIdfModel::fit(3, &["apple inc", "banana co"]).unwrap();
        let m = model.transform(&["apple banana"]);
        let (inds, _) = m.row(0);
        assert!(inds.windows(2).all(|w| w[0] < w[1]));
    }
}
