use std::sync::OnceLock;

use jieba_rs::Jieba;

/// Segmenter seam.
///
/// Implementations must be deterministic: the same input always yields the
/// same token sequence, otherwise corpus rows and queries stop sharing a
/// vocabulary. Whitespace-only tokens are allowed in the output; the
/// filter stage drops them.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// 辞書のロードは重いので全体で一度だけ
static JIEBA: OnceLock<Jieba> = OnceLock::new();

fn jieba() -> &'static Jieba {
    JIEBA.get_or_init(Jieba::new)
}

/// Dictionary-based Chinese segmenter (jieba), also handles Latin runs
#[derive(Debug, Clone, Copy)]
pub struct JiebaTokenizer {
    /// HMM で未登録語を推定する
    hmm: bool,
}

impl JiebaTokenizer {
    pub fn new(hmm: bool) -> Self {
        Self { hmm }
    }
}

impl Default for JiebaTokenizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Tokenizer for JiebaTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return Vec::new();
        }
        jieba().cut(text, self.hmm)
    }
}

/// Splits on whitespace only; for inputs that are already segmented
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace().collect()
    }
}
