//! Configuration management
//!
//! Loads settings from a TOML file. Every field has a default, so an empty
//! file (or no file at all) yields a working configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DedupError, Result};
use crate::vectorizer::{NgramRange, VectorizerConfig, WeightMode};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourceConfig,

    #[serde(default)]
    pub preprocess: PreprocessConfig,

    #[serde(default)]
    pub vectorizer: VectorizerConfig,

    #[serde(default)]
    pub similarity: SimilarityConfig,

    #[serde(default)]
    pub columns: CsvColumns,
}

/// Resource file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// newline-delimited stop word list (missing file = no filtering)
    #[serde(default = "default_stop_words_path")]
    pub stop_words: PathBuf,

    /// preprocessed reference corpus (`Question`, `Processed Words Set`)
    #[serde(default = "default_corpus_path")]
    pub corpus: PathBuf,

    /// raw question table used to resolve duplicate pairs back to IDs
    #[serde(default = "default_raw_data_path")]
    pub raw_data: PathBuf,
}

fn default_stop_words_path() -> PathBuf {
    PathBuf::from("dat/stop_words/stop_words_full.txt")
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("dat/words_set/words_set.csv")
}

fn default_raw_data_path() -> PathBuf {
    PathBuf::from("dat/raw_data/testdata.csv")
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words_path(),
            corpus: default_corpus_path(),
            raw_data: default_raw_data_path(),
        }
    }
}

/// Preprocessing options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// token appended when an IPv4-shaped substring is present
    /// empty string disables the marker
    #[serde(default = "default_ip_sentinel")]
    pub ip_sentinel: String,

    /// let the segmenter guess words missing from its dictionary
    #[serde(default = "default_true")]
    pub hmm: bool,
}

fn default_ip_sentinel() -> String {
    "%ip".to_string()
}

fn default_true() -> bool {
    true
}

impl PreprocessConfig {
    pub fn sentinel(&self) -> Option<&str> {
        if self.ip_sentinel.is_empty() {
            None
        } else {
            Some(self.ip_sentinel.as_str())
        }
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            ip_sentinel: default_ip_sentinel(),
            hmm: true,
        }
    }
}

/// Similarity thresholds and result sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// a pair (or query) is a duplicate when cosine strictly exceeds this
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// minimum weight for a term to count as a keyword
    #[serde(default = "default_keyword_threshold")]
    pub keyword_threshold: f64,
}

fn default_threshold() -> f64 {
    0.6
}

fn default_top_n() -> usize {
    5
}

fn default_keyword_threshold() -> f64 {
    0.1
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            top_n: default_top_n(),
            keyword_threshold: default_keyword_threshold(),
        }
    }
}

/// CSV header names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvColumns {
    #[serde(default = "default_question_column")]
    pub question: String,

    #[serde(default = "default_tokens_column")]
    pub tokens: String,

    #[serde(default = "default_raw_id_column")]
    pub raw_id: String,

    #[serde(default = "default_raw_text_column")]
    pub raw_text: String,
}

fn default_question_column() -> String {
    "Question".to_string()
}

fn default_tokens_column() -> String {
    "Processed Words Set".to_string()
}

fn default_raw_id_column() -> String {
    "问题ID".to_string()
}

fn default_raw_text_column() -> String {
    "问题描述".to_string()
}

impl Default for CsvColumns {
    fn default() -> Self {
        Self {
            question: default_question_column(),
            tokens: default_tokens_column(),
            raw_id: default_raw_id_column(),
            raw_text: default_raw_text_column(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(DedupError::ResourceMissing { path: path.to_path_buf() });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let sim = &self.similarity;
        if !(0.0..=1.0).contains(&sim.threshold) {
            return Err(DedupError::Config(format!(
                "similarity.threshold must be within [0, 1], got {}",
                sim.threshold
            )));
        }
        if !(0.0..=1.0).contains(&sim.keyword_threshold) {
            return Err(DedupError::Config(format!(
                "similarity.keyword_threshold must be within [0, 1], got {}",
                sim.keyword_threshold
            )));
        }
        if sim.top_n == 0 {
            return Err(DedupError::Config("similarity.top_n must be positive".to_string()));
        }
        self.vectorizer
            .ngram_range
            .validate()
            .map_err(|e| DedupError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn weight_mode(&self) -> WeightMode {
        self.vectorizer.mode
    }

    pub fn ngram_range(&self) -> NgramRange {
        self.vectorizer.ngram_range
    }
}
