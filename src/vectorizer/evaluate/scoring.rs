use std::{fmt, fmt::Debug, iter, marker::PhantomData};

use num::Float;
use rayon::prelude::*;
use serde::{ser::SerializeMap, Serialize, Serializer};

use crate::{
    error::{DedupError, Result},
    preprocess::token::TokenSet,
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        DocumentVectorMatrix, VectorSpaceBuilder,
    },
};

/// Default duplicate threshold
pub const DEFAULT_THRESHOLD: f64 = 0.6;

pub const TOO_SIMILAR_MESSAGE: &str = "input text is too similar to an existing entry";
pub const DISTINCT_MESSAGE: &str = "input text is sufficiently distinct";

/// One ranked hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitEntry<K> {
    pub key: K,
    pub score: f64,
}

/// Structure to store search results
pub struct Hits<K> {
    /// (key, score)
    pub list: Vec<HitEntry<K>>,
}

impl<K> Hits<K> {
    /// Create a new Hits instance
    pub fn new(list: Vec<HitEntry<K>>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score
    /// ties keep their original order
    pub fn sort_by_score(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|h| !h.score.is_nan());
        // stable sort
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// keep the first `n` entries
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitEntry<K>> {
        self.list.iter()
    }

    /// Replace each key, e.g. corpus index -> question text.
    pub fn map_keys<T, F>(self, mut f: F) -> Hits<T>
    where
        F: FnMut(K) -> T,
    {
        Hits {
            list: self
                .list
                .into_iter()
                .map(|h| HitEntry { key: f(h.key), score: h.score })
                .collect(),
        }
    }
}

impl<K> Debug for Hits<K>
where
    K: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {:?}: {:.6}", hit.key, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl<K> fmt::Display for Hits<K>
where
    K: fmt::Display,
{
    /// `score<TAB>key` per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for hit in &self.list {
            writeln!(f, "{:.6}\t{}", hit.score, hit.key)?;
        }
        Ok(())
    }
}

impl<K> Serialize for Hits<K>
where
    K: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.list.serialize(serializer)
    }
}

/// Two corpus rows whose similarity exceeded the threshold, `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub left: usize,
    pub right: usize,
    pub score: f64,
}

/// Outcome of checking one query against the corpus.
///
/// Serializes to `{"error": .., "similarity_score": ..}` when too similar,
/// otherwise `{"message": .., "similarity_score": ..}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityVerdict {
    /// best cosine against any corpus row
    pub max_score: f64,
    /// first corpus row reaching `max_score`
    pub best_index: Option<usize>,
    pub threshold: f64,
}

impl SimilarityVerdict {
    #[inline]
    pub fn is_too_similar(&self) -> bool {
        self.max_score > self.threshold
    }

    pub fn message(&self) -> &'static str {
        if self.is_too_similar() {
            TOO_SIMILAR_MESSAGE
        } else {
            DISTINCT_MESSAGE
        }
    }
}

impl Serialize for SimilarityVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        if self.is_too_similar() {
            map.serialize_entry("error", TOO_SIMILAR_MESSAGE)?;
        } else {
            map.serialize_entry("message", DISTINCT_MESSAGE)?;
        }
        map.serialize_entry("similarity_score", &self.max_score)?;
        map.end()
    }
}

/// Cosine similarity over a [`DocumentVectorMatrix`].
///
/// Holds the vectorizer settings and the threshold; every call fits a
/// fresh vector space over the token sets it is given, so there is no
/// cached state to invalidate between calls.
#[derive(Debug, Clone)]
pub struct SimilarityEngine<N = f64, E = DefaultTFIDFEngine> {
    builder: VectorSpaceBuilder<E>,
    threshold: f64,
    _marker: PhantomData<N>,
}

impl Default for SimilarityEngine<f64, DefaultTFIDFEngine> {
    fn default() -> Self {
        Self::new(VectorSpaceBuilder::default(), DEFAULT_THRESHOLD)
    }
}

impl<N, E> SimilarityEngine<N, E>
where
    N: Float + Into<f64> + Send + Sync,
    E: TFIDFEngine<N>,
{
    pub fn new(builder: VectorSpaceBuilder<E>, threshold: f64) -> Self {
        Self {
            builder,
            threshold,
            _marker: PhantomData,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn builder(&self) -> &VectorSpaceBuilder<E> {
        &self.builder
    }

    /// Every pair `(i, j)`, `i < j`, whose cosine strictly exceeds `threshold`.
    ///
    /// Output is ordered by `i` then `j`.
    pub fn scan_matrix(matrix: &DocumentVectorMatrix<N>, threshold: f64) -> Vec<DuplicatePair> {
        let rows = matrix.rows();
        let norms: Vec<f64> = rows.par_iter().map(ZeroSpVec::norm).collect();
        let n = rows.len();
        (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let norms = &norms;
                (i + 1..n).filter_map(move |j| {
                    let score = cosine_with_norms(&rows[i], &rows[j], norms[i], norms[j]);
                    (score > threshold).then_some(DuplicatePair { left: i, right: j, score })
                })
            })
            .collect()
    }

    /// Vectorize `corpus` and report every near-duplicate pair.
    pub fn pairwise_duplicates(&self, corpus: &[TokenSet]) -> Result<Vec<DuplicatePair>> {
        let matrix: DocumentVectorMatrix<N> = self.builder.build(corpus)?;
        let pairs = Self::scan_matrix(&matrix, self.threshold);
        tracing::info!(
            "pairwise scan over {} rows found {} pairs above {}",
            corpus.len(),
            pairs.len(),
            self.threshold
        );
        Ok(pairs)
    }

    /// Cosine of `query` against each corpus row, corpus order.
    ///
    /// The vector space is fitted over the corpus plus the query, so the
    /// query's terms take part in the idf.
    pub fn query_scores(&self, corpus: &[TokenSet], query: &TokenSet) -> Result<Vec<f64>> {
        if corpus.is_empty() {
            return Err(DedupError::EmptyCorpus);
        }
        let matrix: DocumentVectorMatrix<N> =
            self.builder.build(corpus.iter().chain(iter::once(query)))?;
        let rows = matrix.rows();
        let (query_row, corpus_rows) = rows
            .split_last()
            .ok_or(DedupError::EmptyCorpus)?;
        let query_norm = query_row.norm();
        Ok(corpus_rows
            .par_iter()
            .map(|row| cosine_with_norms(query_row, row, query_norm, row.norm()))
            .collect())
    }

    /// Is `query` a near-duplicate of anything in `corpus`?
    pub fn check(&self, corpus: &[TokenSet], query: &TokenSet) -> Result<SimilarityVerdict> {
        let scores = self.query_scores(corpus, query)?;
        let mut best: Option<(usize, f64)> = None;
        for (i, &score) in scores.iter().enumerate() {
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((i, score));
            }
        }
        let verdict = SimilarityVerdict {
            max_score: best.map_or(0.0, |(_, s)| s),
            best_index: best.map(|(i, _)| i),
            threshold: self.threshold,
        };
        tracing::debug!("check verdict: {:?}", verdict);
        Ok(verdict)
    }

    /// The `top_n` corpus rows most similar to `query`, best first.
    /// Equal scores keep corpus order.
    pub fn rank(&self, corpus: &[TokenSet], query: &TokenSet, top_n: usize) -> Result<Hits<usize>> {
        let scores = self.query_scores(corpus, query)?;
        let mut hits = Hits::new(
            scores
                .into_iter()
                .enumerate()
                .map(|(key, score)| HitEntry { key, score })
                .collect(),
        );
        hits.sort_by_score().truncate(top_n);
        Ok(hits)
    }
}

/// weights are non-negative, so the score lives in [0, 1]
#[inline]
fn cosine_with_norms<N>(a: &ZeroSpVec<N>, b: &ZeroSpVec<N>, norm_a: f64, norm_b: f64) -> f64
where
    N: Float + Into<f64>,
{
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(0.0, 1.0)
}
