use indexmap::IndexMap;

use crate::vectorizer::NgramRange;

/// Split a rendered token string into vocabulary terms.
///
/// Words are whitespace-separated; for each `n` in the range every run of
/// `n` consecutive words becomes one term (joined by a single space).
///
/// # Arguments
/// * `doc` - space-joined token set
/// * `lowercase` - fold ASCII/Unicode case before splitting
/// * `ngram` - n-gram span (inclusive)
pub fn analyze(doc: &str, lowercase: bool, ngram: NgramRange) -> Vec<String> {
    let folded;
    let doc = if lowercase {
        folded = doc.to_lowercase();
        folded.as_str()
    } else {
        doc
    };
    let words: Vec<&str> = doc.split_whitespace().collect();
    if ngram.max() == 1 {
        return words.into_iter().map(str::to_string).collect();
    }

    let mut terms = Vec::new();
    let upper = ngram.max().min(words.len());
    for n in ngram.min()..=upper {
        for window in words.windows(n) {
            terms.push(window.join(" "));
        }
    }
    terms
}

/// 文書中の term 出現回数 (出現順を保持)
pub fn term_counts(doc: &str, lowercase: bool, ngram: NgramRange) -> IndexMap<Box<str>, u32> {
    let mut counts: IndexMap<Box<str>, u32> = IndexMap::new();
    for term in analyze(doc, lowercase, ngram) {
        *counts.entry(term.into_boxed_str()).or_insert(0) += 1;
    }
    counts
}
