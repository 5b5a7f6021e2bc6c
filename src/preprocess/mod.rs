pub mod normalizer;
pub mod stop_words;
pub mod token;
pub mod tokenizer;

use std::sync::Arc;

use crate::{
    config::PreprocessConfig,
    error::{DedupError, Result},
    preprocess::{
        normalizer::{find_ip_addresses, normalize},
        stop_words::StopWordSet,
        token::{filter_tokens, TokenSet},
        tokenizer::{JiebaTokenizer, Tokenizer},
    },
};

/// Raw text -> canonical [`TokenSet`].
///
/// The batch path (building the reference corpus) and the query path
/// (checking one incoming text) must both go through the same instance
/// configuration, which is what keeps their vocabularies aligned.
///
/// Holds no per-call state: every stage result is passed along by value.
#[derive(Debug, Clone)]
pub struct Preprocessor<T = JiebaTokenizer>
where
    T: Tokenizer,
{
    stop_words: Arc<StopWordSet>,
    tokenizer: T,
    ip_sentinel: Option<String>,
}

impl Preprocessor<JiebaTokenizer> {
    /// Build from configuration with the jieba segmenter
    pub fn from_config(config: &PreprocessConfig, stop_words: Arc<StopWordSet>) -> Self {
        Self::new(stop_words, JiebaTokenizer::new(config.hmm))
            .with_ip_sentinel(config.sentinel().map(str::to_string))
    }
}

impl<T> Preprocessor<T>
where
    T: Tokenizer,
{
    pub fn new(stop_words: Arc<StopWordSet>, tokenizer: T) -> Self {
        Self {
            stop_words,
            tokenizer,
            ip_sentinel: None,
        }
    }

    /// set the token appended when an IPv4 address is detected
    pub fn with_ip_sentinel(mut self, sentinel: Option<String>) -> Self {
        self.ip_sentinel = sentinel.filter(|s| !s.trim().is_empty());
        self
    }

    /// Run the full pipeline
    /// normalize -> segment -> filter (+ special tokens) -> IP marker
    pub fn preprocess(&self, raw: &str) -> TokenSet {
        let (normalized, special) = normalize(raw);
        let tokens = self.tokenizer.tokenize(normalized.as_str());
        let mut set = filter_tokens(tokens, &self.stop_words, special);

        if let Some(sentinel) = &self.ip_sentinel {
            let ips = find_ip_addresses(raw);
            if !ips.is_empty() {
                tracing::info!("IP addresses detected: {:?}", ips);
                set.insert(sentinel.as_str());
            }
        }
        set
    }

    /// Entry-point variant: blank input is rejected instead of producing
    /// an empty set
    pub fn process(&self, raw: &str) -> Result<TokenSet> {
        if raw.trim().is_empty() {
            return Err(DedupError::EmptyInput("no text provided".to_string()));
        }
        Ok(self.preprocess(raw))
    }
}
