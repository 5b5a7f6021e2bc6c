use std::{collections::HashSet, fs, io, path::Path};

/// Filler tokens excluded from the similarity vocabulary.
///
/// Loaded once and never mutated afterwards, so a single instance can be
/// shared (e.g. behind an `Arc`) between any number of callers.
#[derive(Debug, Clone, Default)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    /// 空のセット (フィルタリングなし)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a newline-delimited list
    /// A missing file yields an empty set with a warning, not an error.
    ///
    /// # Arguments
    /// * `path` - stop word file (UTF-8, one word per line)
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let set = Self::parse(&content);
                tracing::info!("loaded {} stop words from {}", set.len(), path.display());
                Ok(set)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("stop word file not found: {}, filtering disabled", path.display());
                Ok(Self::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// 各行を trim し、空行は無視する
    pub fn parse(content: &str) -> Self {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[inline]
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S> FromIterator<S> for StopWordSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_trims_and_dedups() {
        let set = StopWordSet::parse("的\n  了 \n\n的\r\n是\n");
        assert_eq!(set.len(), 3);
        assert!(set.contains("的"));
        assert!(set.contains("了"));
        assert!(set.contains("是"));
        assert!(!set.contains(""));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "the\nof\n无法").unwrap();
        let set = StopWordSet::load(file.path()).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("无法"));
    }

    #[test]
    fn missing_file_degrades_to_empty() {
        let set = StopWordSet::load("/no/such/stop_words.txt").unwrap();
        assert!(set.is_empty());
    }
}
