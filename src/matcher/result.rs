use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::sparse::CsrMatrix;

/// A single ranked match: similarity score, corpus index, corpus string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    /// Cosine similarity in [0, 1].
    pub score: f64,
    /// Position of the matched string in the corpus/right-hand set.
    pub index: usize,
    /// The matched string itself.
    pub value: String,
}

/// Ranked matches for one query string.
/// Queries with no match above the threshold still get an entry with an
/// empty list; they are never dropped from the output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Matches {
    pub query: String,
    /// Descending by score; score ties sit at the lower corpus index.
    pub entries: Vec<MatchEntry>,
}

impl Debug for Matches {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each entry on a new line
            writeln!(f, "{:?} [", self.query)?;
            for entry in &self.entries {
                writeln!(f, "    {:.6} #{} {:?}", entry.score, entry.index, entry.value)?;
            }
            write!(f, "]")
        } else {
            f.debug_struct("Matches")
                .field("query", &self.query)
                .field("entries", &self.entries)
                .finish()
        }
    }
}

/// Regroup the matcher's sparse result rows into one ranked list per query
/// string, substituting string values for row/column indices. Row entry
/// order (descending score) is preserved as produced.
pub fn assemble<L, R>(left: &[L], right: &[R], result: &CsrMatrix) -> Vec<Matches>
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    debug_assert_eq!(left.len(), result.n_rows);
    debug_assert_eq!(right.len(), result.n_cols);
    (0..result.n_rows)
        .map(|i| {
            let (inds, vals) = result.row(i);
            let entries = inds
                .iter()
                .zip(vals)
                .map(|(&col, &score)| MatchEntry {
                    score,
                    index: col as usize,
                    value: right[col as usize].as_ref().to_string(),
                })
                .collect();
            Matches {
                query: left[i].as_ref().to_string(),
                entries,
            }
        })
        .collect()
}
