/// This crate is a near-duplicate detector for short mixed Chinese/Latin texts
/// built on a TF-IDF vector space.
pub mod config;
pub mod corpus;
pub mod error;
pub mod preprocess;
pub mod service;
pub mod utils;
pub mod vectorizer;

/// Token Set
/// The canonical form of one text after preprocessing: a set of unique,
/// non-empty tokens.
///
/// Iteration and rendering follow lexicographic order, so the space-joined
/// form written to the words-set CSV is stable across runs.
///
/// ```
/// use text_dedup_vectorizer::TokenSet;
///
/// let set = TokenSet::parse("网络 超时 网络");
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.render(), "网络 超时");
/// ```
pub use preprocess::token::TokenSet;

/// Preprocessor
/// Raw text -> `TokenSet`.
/// It runs, in this fixed order:
/// - special pattern extraction (`A/B`, `I/O` kept verbatim)
/// - full-width -> half-width folding
/// - symbol, digit and whitespace cleanup
/// - word segmentation (`Tokenizer`, jieba by default)
/// - stop word filtering
/// - IPv4 sentinel marking
///
/// The same instance must serve both the batch path (building the
/// reference corpus) and the query path.
pub use preprocess::Preprocessor;

/// Stop Word Set
/// Loaded once from a newline-delimited file and shared read-only.
/// A missing file yields an empty set.
pub use preprocess::stop_words::StopWordSet;

/// Word segmenter seam
/// `JiebaTokenizer` for Chinese, `WhitespaceTokenizer` for pre-split text.
pub use preprocess::tokenizer::{JiebaTokenizer, Tokenizer, WhitespaceTokenizer};

/// Text normalization
/// Returns the normalized text and the special tokens extracted from it.
pub use preprocess::normalizer::{normalize, NormalizedText};

/// Vector Space Builder
/// Fits a vocabulary over a collection of token sets and produces one
/// weighted sparse row per set (`TfIdf` or `RawCount`).
///
/// `VectorSpaceBuilder<E>` has the following generic parameter:
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
///
/// The vocabulary is rebuilt on every call; nothing is cached between
/// builds.
pub use vectorizer::{DocumentVectorMatrix, NgramRange, VectorSpaceBuilder, VectorizerConfig, WeightMode};

/// TF-IDF Engine
/// Weighting scheme trait and its default smoothed implementation.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Similarity Engine
/// Cosine similarity over a `DocumentVectorMatrix`:
/// - pairwise duplicate scan over a corpus
/// - query-vs-corpus duplicate check
/// - top-N ranking
pub use vectorizer::evaluate::scoring::{
    DuplicatePair, HitEntry, Hits, SimilarityEngine, SimilarityVerdict,
};

/// Reference corpus and raw question table
pub use corpus::{
    raw::{DuplicateReport, RawTable},
    Corpus,
};

pub use config::Config;
pub use error::{DedupError, ErrorKind, Result};
pub use service::{DedupService, QueryInput};
