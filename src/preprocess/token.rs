use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::preprocess::stop_words::StopWordSet;

/// TokenSet 構造体
/// One corpus entry (or query) reduced to its unique canonical tokens.
///
/// Backed by an ordered set so that rendering is identical no matter which
/// entry point produced it: the batch path and the query path render the
/// same tokens into the same string.
///
/// # Examples
/// ```
/// use text_dedup_vectorizer::TokenSet;
/// let set: TokenSet = ["网络", "服务器", "网络"].into_iter().collect();
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.render(), "服务器 网络");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSet {
    tokens: BTreeSet<String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted, space-joined token string
    pub fn parse(joined: &str) -> Self {
        joined.split_whitespace().collect()
    }

    /// tokenを追加する
    /// empty / whitespace-only tokens are ignored
    #[inline]
    pub fn insert<S: Into<String>>(&mut self, token: S) -> bool {
        let token = token.into();
        if token.trim().is_empty() {
            return false;
        }
        self.tokens.insert(token)
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Space-joined form, used both for persistence and for vectorization
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.tokens.iter().map(|t| t.len() + 1).sum());
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(token);
        }
        out
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tokens.into_iter().collect()
    }
}

impl<S> FromIterator<S> for TokenSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TokenSet::new();
        set.extend(iter);
        set
    }
}

impl<S> Extend<S> for TokenSet
where
    S: Into<String>,
{
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token);
        }
    }
}

impl IntoIterator for TokenSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Drop stop words and blank tokens, then merge the protected special tokens.
///
/// # Arguments
/// * `tokens` - segmenter output
/// * `stop_words` - tokens to exclude
/// * `special` - tokens pulled out before normalization, merged verbatim
///
/// # Returns
/// * `TokenSet` - may be empty, which is a valid result
pub fn filter_tokens<'a, I, S>(tokens: I, stop_words: &StopWordSet, special: S) -> TokenSet
where
    I: IntoIterator<Item = &'a str>,
    S: IntoIterator<Item = String>,
{
    let mut set: TokenSet = tokens
        .into_iter()
        .filter(|token| !stop_words.contains(token))
        .filter(|token| !token.trim().is_empty())
        .collect();
    set.extend(special);
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_never_enter() {
        let mut set = TokenSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("   "));
        assert!(set.insert("网络"));
        assert!(!set.insert("网络"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn render_and_parse_agree() {
        let set = TokenSet::parse("  连接  服务器 网络 服务器 ");
        assert_eq!(set.len(), 3);
        assert_eq!(TokenSet::parse(&set.render()), set);
    }

    #[test]
    fn serializes_as_plain_list() {
        let set: TokenSet = ["b", "a"].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
        let back: TokenSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn filter_drops_stop_words_and_blanks() {
        let stop: StopWordSet = ["的", "了"].into_iter().collect();
        let tokens = vec!["服务器", " ", "的", "网络", "", "了"];
        let set = filter_tokens(tokens, &stop, vec!["I/O".to_string()]);
        let expected: TokenSet = ["服务器", "网络", "I/O"].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn everything_filtered_is_empty_not_error() {
        let stop: StopWordSet = ["的"].into_iter().collect();
        let set = filter_tokens(vec!["的", " "], &stop, Vec::new());
        assert!(set.is_empty());
        assert_eq!(set.render(), "");
    }

    #[test]
    fn filtering_is_idempotent() {
        let stop: StopWordSet = ["的", "是"].into_iter().collect();
        let once = filter_tokens(vec!["这", "是", "网络", "的", "问题"], &stop, Vec::new());
        let twice = filter_tokens(once.iter(), &stop, Vec::new());
        assert_eq!(once, twice);
    }

    #[test]
    fn special_tokens_survive_stop_words() {
        // special tokens are merged after filtering
        let stop: StopWordSet = ["A/B"].into_iter().collect();
        let set = filter_tokens(vec!["test"], &stop, vec!["A/B".to_string()]);
        assert!(set.contains("A/B"));
    }
}
