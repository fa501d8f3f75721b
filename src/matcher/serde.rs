use std::io::{Read, Write};

use crate::matcher::FuzzyMatcher;

/// Opaque-blob persistence for the whole matcher state: n-gram size,
/// vocabulary, IDF weights, corpus strings and corpus matrix. A restored
/// matcher reproduces matching behavior byte for byte.
impl FuzzyMatcher {
    /// Serialize the matcher state to a CBOR byte blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    /// Restore a matcher from a blob produced by [`FuzzyMatcher::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }

    /// Write the matcher state to `writer` (CBOR).
    pub fn save_state<W: Write>(&self, writer: W) -> Result<(), serde_cbor::Error> {
        serde_cbor::to_writer(writer, self)
    }

    /// Read a matcher state previously written with
    /// [`FuzzyMatcher::save_state`].
    pub fn load_state<R: Read>(reader: R) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_reader(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted_matcher() -> FuzzyMatcher {
        let mut matcher = FuzzyMatcher::new(3);
        matcher.fit(&["apple inc", "apple gmbh", "banana co"]).unwrap();
        matcher
            .add_corpus(&["apple inc", "aple inc", "banana co", "banana corp"])
            .unwrap();
        matcher
    }

    #[test]
    fn round_trip_restores_matching_behavior() {
        let matcher = fitted_matcher();
        let queries = ["apple", "banana c", "zzz"];
        let before = matcher.match_against_corpus(&queries, 3, 0.1).unwrap();

        let restored = FuzzyMatcher::from_bytes(&matcher.to_bytes().unwrap()).unwrap();
        assert!(restored.is_fitted());
        assert!(restored.has_corpus());
        assert_eq!(restored.n_grams(), matcher.n_grams());

        let after = restored.match_against_corpus(&queries, 3, 0.1).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn round_trip_preserves_scores_exactly() {
        let matcher = fitted_matcher();
        let restored = FuzzyMatcher::from_bytes(&matcher.to_bytes().unwrap()).unwrap();
        let before = matcher.score_pair("apple inc", "aple inc").unwrap();
        let after = restored.score_pair("apple inc", "aple inc").unwrap();
        // identical bits, not merely close
        assert_eq!(before.to_bits(), after.to_bits());
    }

    #[test]
    fn unfitted_matcher_round_trips_too() {
        let matcher = FuzzyMatcher::new(4);
        let restored = FuzzyMatcher::from_bytes(&matcher.to_bytes().unwrap()).unwrap();
        assert!(!restored.is_fitted());
        assert!(!restored.has_corpus());
        assert_eq!(restored.n_grams(), 4);
    }

    #[test]
    fn stream_variants_match_byte_variants() {
        let matcher = fitted_matcher();
        let mut buf = Vec::new();
        matcher.save_state(&mut buf).unwrap();
        assert_eq!(buf, matcher.to_bytes().unwrap());

        let restored = FuzzyMatcher::load_state(buf.as_slice()).unwrap();
        let queries = ["apple"];
        assert_eq!(
            restored.match_against_corpus(&queries, 5, 0.0).unwrap(),
            matcher.match_against_corpus(&queries, 5, 0.0).unwrap()
        );
    }
}
