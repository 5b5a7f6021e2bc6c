//! Entry points shared by the CLI and library callers.

use std::{collections::BTreeSet, path::Path, sync::Arc};

use serde::Serialize;

use crate::{
    config::Config,
    corpus::{
        raw::{DuplicateReport, RawTable},
        Corpus,
    },
    error::{DedupError, Result},
    preprocess::{
        stop_words::StopWordSet,
        token::TokenSet,
        tokenizer::{JiebaTokenizer, Tokenizer},
        Preprocessor,
    },
    vectorizer::{
        evaluate::scoring::{Hits, SimilarityEngine, SimilarityVerdict},
        DocumentVectorMatrix, VectorSpaceBuilder,
    },
};

/// Query text for the similarity entry points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    /// run through the preprocessing pipeline
    Raw(String),
    /// already space-joined tokens
    Tokens(String),
}

impl QueryInput {
    pub fn new<S: Into<String>>(text: S, pre_tokenized: bool) -> Self {
        if pre_tokenized {
            QueryInput::Tokens(text.into())
        } else {
            QueryInput::Raw(text.into())
        }
    }
}

/// `{"processed_text": [...]}`
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedText {
    pub processed_text: TokenSet,
}

/// Preprocessing plus similarity with one configuration.
pub struct DedupService<T = JiebaTokenizer>
where
    T: Tokenizer,
{
    config: Config,
    preprocessor: Preprocessor<T>,
    engine: SimilarityEngine,
}

impl DedupService<JiebaTokenizer> {
    /// Load the stop word list named in `config` (missing file = no filtering).
    pub fn from_config(config: Config) -> Result<Self> {
        let stop_words = StopWordSet::load(&config.resources.stop_words)?;
        let preprocessor = Preprocessor::from_config(&config.preprocess, Arc::new(stop_words));
        Ok(Self::with_preprocessor(config, preprocessor))
    }
}

impl<T> DedupService<T>
where
    T: Tokenizer,
{
    pub fn with_preprocessor(config: Config, preprocessor: Preprocessor<T>) -> Self {
        let builder = VectorSpaceBuilder::new(config.vectorizer.clone());
        let engine = SimilarityEngine::new(builder, config.similarity.threshold);
        Self {
            config,
            preprocessor,
            engine,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor<T> {
        &self.preprocessor
    }

    pub fn engine(&self) -> &SimilarityEngine {
        &self.engine
    }

    /// Preprocessing entry point
    pub fn preprocess(&self, raw: &str) -> Result<ProcessedText> {
        Ok(ProcessedText {
            processed_text: self.preprocessor.process(raw)?,
        })
    }

    pub fn query_tokens(&self, input: &QueryInput) -> Result<TokenSet> {
        match input {
            QueryInput::Raw(text) => self.preprocessor.process(text),
            QueryInput::Tokens(joined) => {
                if joined.trim().is_empty() {
                    return Err(DedupError::EmptyInput("no tokens provided".to_string()));
                }
                Ok(TokenSet::parse(joined))
            }
        }
    }

    /// Corpus named in the configuration
    pub fn load_corpus(&self) -> Result<Corpus> {
        Corpus::load_csv(&self.config.resources.corpus, &self.config.columns)
    }

    /// Batch path: raw question CSV -> words-set CSV
    pub fn build_words_set(&self, input: &Path, output: &Path) -> Result<Corpus> {
        let raw = RawTable::load_csv(input, &self.config.columns)?;
        let corpus = Corpus::from_raw_texts(&self.preprocessor, raw.texts());
        corpus.write_csv(output, &self.config.columns)?;
        Ok(corpus)
    }

    /// Pairwise duplicate scan; IDs are attached when `raw` is given.
    pub fn scan(&self, corpus: &Corpus, raw: Option<&RawTable>) -> Result<Vec<DuplicateReport>> {
        let pairs = self.engine.pairwise_duplicates(corpus.token_sets())?;
        Ok(RawTable::resolve(raw, corpus, &pairs))
    }

    pub fn check(&self, corpus: &Corpus, input: &QueryInput) -> Result<SimilarityVerdict> {
        let query = self.query_tokens(input)?;
        self.engine.check(corpus.token_sets(), &query)
    }

    /// Top `top_n` corpus texts, best first
    pub fn similar(&self, corpus: &Corpus, input: &QueryInput, top_n: usize) -> Result<Hits<String>> {
        let query = self.query_tokens(input)?;
        let hits = self.engine.rank(corpus.token_sets(), &query, top_n)?;
        Ok(hits.map_keys(|i| corpus.text(i).unwrap_or_default().to_string()))
    }

    /// Terms weighing more than `threshold` in any corpus row
    pub fn keywords(&self, corpus: &Corpus, threshold: f64) -> Result<BTreeSet<String>> {
        let matrix: DocumentVectorMatrix = self.engine.builder().build(corpus.token_sets())?;
        Ok(matrix.keywords(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::tokenizer::WhitespaceTokenizer;

    fn service() -> DedupService<WhitespaceTokenizer> {
        let pre = Preprocessor::new(Arc::new(StopWordSet::empty()), WhitespaceTokenizer)
            .with_ip_sentinel(Some("%ip".to_string()));
        DedupService::with_preprocessor(Config::default(), pre)
    }

    fn corpus() -> Corpus {
        let mut corpus = Corpus::new();
        corpus.push("disk is full", TokenSet::parse("disk is full"));
        corpus.push("printer jam", TokenSet::parse("printer jam"));
        corpus.push("disk is full!", TokenSet::parse("disk is full"));
        corpus
    }

    #[test]
    fn pre_tokenized_and_raw_agree() {
        let svc = service();
        let raw = svc.query_tokens(&QueryInput::Raw("printer jam!".into())).unwrap();
        let tokens = svc.query_tokens(&QueryInput::new("jam printer", true)).unwrap();
        assert_eq!(raw, tokens);
        assert!(matches!(
            svc.query_tokens(&QueryInput::Tokens("  ".into())),
            Err(DedupError::EmptyInput(_))
        ));
    }

    #[test]
    fn scan_reports_texts() {
        let svc = service();
        let reports = svc.scan(&corpus(), None).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].left.text, "disk is full");
        assert_eq!(reports[0].right.index, 2);
    }

    #[test]
    fn similar_returns_texts() {
        let svc = service();
        let hits = svc
            .similar(&corpus(), &QueryInput::Raw("printer jam".into()), 1)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits.list[0].key, "printer jam");
    }

    #[test]
    fn check_verdict() {
        let svc = service();
        let verdict = svc.check(&corpus(), &QueryInput::Raw("disk is full".into())).unwrap();
        assert!(verdict.is_too_similar());
        let verdict = svc.check(&corpus(), &QueryInput::Raw("mail bounce".into())).unwrap();
        assert!(!verdict.is_too_similar());
    }

    #[test]
    fn keywords_use_threshold() {
        let svc = service();
        let kw = svc.keywords(&corpus(), 0.1).unwrap();
        assert!(kw.contains("printer"));
        assert!(kw.contains("disk"));
    }

    #[test]
    fn preprocess_output_shape() {
        let svc = service();
        let out = svc.preprocess("10.0.0.1 unreachable").unwrap();
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["processed_text"], serde_json::json!(["%ip", "unreachable"]));
    }

    #[test]
    fn batch_words_set_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw.csv");
        let output = dir.path().join("words_set.csv");
        std::fs::write(&input, "问题ID,问题描述\nQ1,disk is full\nQ2,\nQ3,printer jam\n").unwrap();

        let svc = service();
        let built = svc.build_words_set(&input, &output).unwrap();
        assert_eq!(built.len(), 2);
        let loaded = Corpus::load_csv(&output, &svc.config().columns).unwrap();
        assert_eq!(loaded, built);
    }
}
