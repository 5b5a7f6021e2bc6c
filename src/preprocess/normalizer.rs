use std::{collections::BTreeSet, fmt, sync::OnceLock};

use regex::Regex;

/// `<Latin letter><one non-word, non-space char><Latin letter>`, e.g. `I/O`, `A/B`
static SPECIAL_PATTERN: OnceLock<Regex> = OnceLock::new();
static SYMBOL: OnceLock<Regex> = OnceLock::new();
static DIGITS: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static IPV4: OnceLock<Regex> = OnceLock::new();

fn special_pattern() -> &'static Regex {
    SPECIAL_PATTERN.get_or_init(|| Regex::new(r"[A-Za-z][^\w\s][A-Za-z]").expect("special pattern regex"))
}

fn symbol() -> &'static Regex {
    SYMBOL.get_or_init(|| Regex::new(r"[^\w\s]").expect("symbol regex"))
}

fn digits() -> &'static Regex {
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex"))
}

fn ipv4() -> &'static Regex {
    IPV4.get_or_init(|| Regex::new(r"\b(?:[0-9]{1,3}\.){3}[0-9]{1,3}\b").expect("ipv4 regex"))
}

/// Text after one full normalization pass.
///
/// Contains no full-width ASCII variants, no digits, no symbol characters,
/// and words are separated by exactly one space with no leading/trailing
/// whitespace. Only [`normalize`] constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NormalizedText(String);

impl NormalizedText {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize raw text.
///
/// Stage order is fixed: special patterns are pulled out of the original
/// text before any folding or stripping, otherwise the symbol/digit passes
/// would destroy them.
///
/// # Returns
/// * `NormalizedText` - scrubbed text
/// * `BTreeSet<String>` - protected special tokens, verbatim from `raw`
pub fn normalize(raw: &str) -> (NormalizedText, BTreeSet<String>) {
    let (text, special) = extract_special_patterns(raw);
    let text = full_to_half(text);
    let text = replace_symbols(text);
    let text = replace_digits(text);
    let text = collapse_whitespace(text);
    tracing::debug!("normalized {:?} -> {:?} (special: {:?})", raw, text, special);
    (NormalizedText(text), special)
}

/// 特殊パターンを抽出し、テキストからリテラル置換で削除する
/// 同じ値が複数回現れた場合はすべて削除される
pub fn extract_special_patterns(raw: &str) -> (String, BTreeSet<String>) {
    let found: Vec<&str> = special_pattern().find_iter(raw).map(|m| m.as_str()).collect();
    if found.is_empty() {
        return (raw.to_string(), BTreeSet::new());
    }
    let mut text = raw.to_string();
    for pattern in &found {
        text = text.replace(pattern, "");
    }
    (text, found.into_iter().map(str::to_string).collect())
}

/// Full-width ASCII variants (U+FF01..=U+FF5E) and the ideographic space
/// (U+3000) to their half-width forms.
pub fn full_to_half(text: String) -> String {
    if !text.chars().any(is_full_width) {
        return text;
    }
    text.chars()
        .map(|c| match c as u32 {
            0xFF01..=0xFF5E => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            0x3000 => ' ',
            _ => c,
        })
        .collect()
}

#[inline]
fn is_full_width(c: char) -> bool {
    matches!(c as u32, 0xFF01..=0xFF5E | 0x3000)
}

/// 単語文字・空白以外をスペースへ
pub fn replace_symbols(text: String) -> String {
    symbol().replace_all(&text, " ").into_owned()
}

/// 数字の連続をスペースへ
pub fn replace_digits(text: String) -> String {
    digits().replace_all(&text, " ").into_owned()
}

pub fn collapse_whitespace(text: String) -> String {
    whitespace().replace_all(&text, " ").trim().to_string()
}

/// IPv4-shaped substrings of `raw`, in order of appearance
///
/// `\b` is Unicode-aware, so an address glued to CJK characters
/// (`服务器192.168.1.1超时`) is not detected.
pub fn find_ip_addresses(raw: &str) -> Vec<&str> {
    ipv4().find_iter(raw).map(|m| m.as_str()).collect()
}
