pub mod analyzer;
pub mod evaluate;
pub mod tfidf;

use std::collections::BTreeSet;
use std::marker::PhantomData;

use indexmap::IndexMap;
use num::Float;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    error::{DedupError, Result},
    preprocess::token::TokenSet,
    utils::math::vector::ZeroSpVec,
    vectorizer::{
        analyzer::term_counts,
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
    },
};

/// Per-term weight in a document vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeightMode {
    /// count × smoothed idf, optionally L2-normalized per row
    #[default]
    #[serde(rename = "tfidf")]
    TfIdf,
    /// raw term occurrence count
    #[serde(rename = "raw_count")]
    RawCount,
}

/// Inclusive n-gram span `(min, max)`
///
/// Serialized as a two-element array, e.g. `ngram_range = [1, 2]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange(pub usize, pub usize);

impl NgramRange {
    pub fn new(min: usize, max: usize) -> Self {
        NgramRange(min, max)
    }

    #[inline]
    pub fn min(&self) -> usize {
        self.0
    }

    #[inline]
    pub fn max(&self) -> usize {
        self.1
    }

    pub fn validate(&self) -> Result<()> {
        if self.0 == 0 || self.0 > self.1 {
            return Err(DedupError::Vectorization(format!(
                "invalid ngram_range ({}, {}): need 1 <= min <= max",
                self.0, self.1
            )));
        }
        Ok(())
    }
}

impl Default for NgramRange {
    fn default() -> Self {
        NgramRange(1, 1)
    }
}

/// Vector space options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerConfig {
    #[serde(default)]
    pub mode: WeightMode,

    #[serde(default)]
    pub ngram_range: NgramRange,

    /// case-fold terms before counting
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// L2-normalize TF-IDF rows (ignored for raw counts)
    #[serde(default = "default_true")]
    pub normalize: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            mode: WeightMode::TfIdf,
            ngram_range: NgramRange::default(),
            lowercase: true,
            normalize: true,
        }
    }
}

/// Document-term matrix
/// row `i` is the vector of the `i`-th input document
///
/// Columns are the corpus vocabulary, sorted lexicographically, so the
/// same input always yields the same column layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentVectorMatrix<N = f64>
where
    N: Float,
{
    /// term -> document frequency, column order
    vocabulary: IndexMap<Box<str>, u64>,
    rows: Vec<ZeroSpVec<N>>,
    /// None for raw counts
    idf: Option<Vec<f64>>,
    mode: WeightMode,
}

impl<N> DocumentVectorMatrix<N>
where
    N: Float + Into<f64>,
{
    /// 文書数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// vocabulary size
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn mode(&self) -> WeightMode {
        self.mode
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&ZeroSpVec<N>> {
        self.rows.get(index)
    }

    pub fn rows(&self) -> &[ZeroSpVec<N>] {
        &self.rows
    }

    /// terms in column order
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> + '_ {
        self.vocabulary.keys().map(|k| k.as_ref())
    }

    pub fn column_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get_index_of(term)
    }

    pub fn term_at(&self, column: usize) -> Option<&str> {
        self.vocabulary.get_index(column).map(|(k, _)| k.as_ref())
    }

    pub fn document_frequency(&self, term: &str) -> Option<u64> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self) -> Option<&[f64]> {
        self.idf.as_deref()
    }

    /// Weight of `term` in row `index`; 0 when absent from the document.
    pub fn weight(&self, index: usize, term: &str) -> Option<f64> {
        let col = self.column_of(term)?;
        self.rows.get(index)?.get(col).map(Into::<f64>::into)
    }

    /// 行間のコサイン類似度
    pub fn cosine(&self, a: usize, b: usize) -> Option<f64> {
        Some(self.rows.get(a)?.cosine_similarity(self.rows.get(b)?))
    }

    /// Terms carrying a weight strictly above `threshold` in at least one row.
    ///
    /// # Arguments
    /// * `threshold` - minimum weight (exclusive)
    ///
    /// # Returns
    /// * `BTreeSet<String>` - keyword set, lexicographic order
    pub fn keywords(&self, threshold: f64) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        for row in &self.rows {
            for (col, v) in row.raw_iter() {
                if Into::<f64>::into(v) > threshold {
                    columns.insert(col);
                }
            }
        }
        columns
            .into_iter()
            .filter_map(|col| self.term_at(col).map(str::to_string))
            .collect()
    }
}

/// Builds a [`DocumentVectorMatrix`] from token sets.
///
/// Every token set is rendered to its space-joined form and split back on
/// whitespace, so the vectorizer only ever sees terms the preprocessor
/// produced. `E` selects the weighting scheme.
#[derive(Debug, Clone)]
pub struct VectorSpaceBuilder<E = DefaultTFIDFEngine> {
    config: VectorizerConfig,
    _marker: PhantomData<E>,
}

impl Default for VectorSpaceBuilder<DefaultTFIDFEngine> {
    fn default() -> Self {
        Self::new(VectorizerConfig::default())
    }
}

impl<E> VectorSpaceBuilder<E> {
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    pub fn with_mode(mut self, mode: WeightMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn with_ngram_range(mut self, ngram: NgramRange) -> Self {
        self.config.ngram_range = ngram;
        self
    }

    /// Fit the vocabulary (and idf) over `docs` and vectorize each of them.
    ///
    /// Row order follows input order.
    ///
    /// # Errors
    /// * `EmptyCorpus` - no documents
    /// * `Vectorization` - invalid n-gram span
    ///
    /// Documents without any term become all-zero rows; when no document
    /// has a term the matrix simply has zero columns.
    pub fn build<'a, N, I>(&self, docs: I) -> Result<DocumentVectorMatrix<N>>
    where
        N: Float + Into<f64> + Send + Sync,
        E: TFIDFEngine<N>,
        I: IntoIterator<Item = &'a TokenSet>,
    {
        let ngram = self.config.ngram_range;
        ngram.validate()?;
        let lowercase = self.config.lowercase;

        let rendered: Vec<String> = docs.into_iter().map(TokenSet::render).collect();
        if rendered.is_empty() {
            return Err(DedupError::EmptyCorpus);
        }

        let counts: Vec<IndexMap<Box<str>, u32>> = rendered
            .par_iter()
            .map(|doc| term_counts(doc, lowercase, ngram))
            .collect();

        // document frequency
        let mut vocabulary: IndexMap<Box<str>, u64> = IndexMap::new();
        for doc in &counts {
            for term in doc.keys() {
                *vocabulary.entry(term.clone()).or_insert(0) += 1;
            }
        }
        // 語彙が空でも各行はゼロベクトルとして表現する
        vocabulary.sort_keys();

        let dim = vocabulary.len();
        let doc_num = counts.len() as u64;
        let idf = match self.config.mode {
            WeightMode::TfIdf => {
                let dfs: Vec<u64> = vocabulary.values().copied().collect();
                Some(E::idf_vec(&dfs, doc_num))
            }
            WeightMode::RawCount => None,
        };

        let normalize = self.config.normalize;
        let rows: Vec<ZeroSpVec<N>> = counts
            .par_iter()
            .map(|doc| {
                let mut pairs: Vec<(usize, u32)> = doc
                    .iter()
                    .filter_map(|(term, &count)| {
                        vocabulary.get_index_of(term).map(|col| (col, count))
                    })
                    .collect();
                pairs.sort_unstable_by_key(|&(col, _)| col);
                match &idf {
                    Some(idf) => E::tf_idf_vec(&pairs, idf, dim, normalize),
                    None => E::count_vec(&pairs, dim),
                }
            })
            .collect();

        tracing::debug!(
            "vectorized {} documents over {} terms ({:?})",
            rows.len(),
            dim,
            self.config.mode
        );

        Ok(DocumentVectorMatrix {
            vocabulary,
            rows,
            idf,
            mode: self.config.mode,
        })
    }
}
