pub mod raw;

use std::{
    fs::File,
    io,
    path::Path,
};

use crate::{
    config::CsvColumns,
    error::{DedupError, Result},
    preprocess::{token::TokenSet, tokenizer::Tokenizer, Preprocessor},
};

/// Reference corpus
/// ordered (original text, token set) pairs
///
/// Position is the entry's identity: duplicate pairs and ranked hits are
/// reported as row indices into this structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    texts: Vec<String>,
    token_sets: Vec<TokenSet>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, text: S, tokens: TokenSet) {
        self.texts.push(text.into());
        self.token_sets.push(tokens);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn token_sets(&self) -> &[TokenSet] {
        &self.token_sets
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<(&str, &TokenSet)> {
        Some((self.texts.get(index)?.as_str(), self.token_sets.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenSet)> {
        self.texts.iter().map(String::as_str).zip(self.token_sets.iter())
    }

    /// Batch path: preprocess every non-blank text.
    ///
    /// # Arguments
    /// * `preprocessor` - same instance the query path uses
    /// * `texts` - raw question texts
    pub fn from_raw_texts<T, I, S>(preprocessor: &Preprocessor<T>, texts: I) -> Self
    where
        T: Tokenizer,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = Corpus::new();
        let mut skipped = 0usize;
        for text in texts {
            let text = text.as_ref().trim();
            if text.is_empty() {
                skipped += 1;
                continue;
            }
            corpus.push(text, preprocessor.preprocess(text));
        }
        if skipped > 0 {
            tracing::warn!("skipped {} blank rows", skipped);
        }
        tracing::info!("preprocessed {} texts", corpus.len());
        corpus
    }

    /// Load a words-set CSV.
    ///
    /// # Errors
    /// * `ResourceMissing` - file does not exist
    /// * `Vectorization` - malformed CSV or missing column
    pub fn load_csv<P: AsRef<Path>>(path: P, columns: &CsvColumns) -> Result<Self> {
        let path = path.as_ref();
        let file = open_resource(path)?;
        let corpus = Self::from_reader(file, columns)?;
        tracing::info!("loaded {} corpus entries from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn from_reader<R: io::Read>(reader: R, columns: &CsvColumns) -> Result<Self> {
        let mut rdr = csv_reader(reader);
        let headers = rdr.headers()?.clone();
        let question = column_index(&headers, &columns.question)?;
        let tokens = column_index(&headers, &columns.tokens)?;

        let mut corpus = Corpus::new();
        for record in rdr.records() {
            let record = record?;
            let text = record.get(question).unwrap_or("");
            let joined = record.get(tokens).unwrap_or("");
            if text.is_empty() && joined.is_empty() {
                continue;
            }
            corpus.push(text, TokenSet::parse(joined));
        }
        Ok(corpus)
    }

    /// Write as a words-set CSV (tokens space-joined).
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, columns: &CsvColumns) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.to_writer(File::create(path)?, columns)?;
        tracing::info!("wrote {} entries to {}", self.len(), path.display());
        Ok(())
    }

    pub fn to_writer<W: io::Write>(&self, writer: W, columns: &CsvColumns) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([columns.question.as_str(), columns.tokens.as_str()])?;
        for (text, tokens) in self.iter() {
            wtr.write_record([text, tokens.render().as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

pub(crate) fn open_resource(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DedupError::ResourceMissing { path: path.to_path_buf() },
        _ => DedupError::Io(e),
    })
}

pub(crate) fn csv_reader<R: io::Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// ヘッダー名の余計な空白・BOM・`"` を除去
pub(crate) fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').replace('"', "").trim().to_string()
}

pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| clean_header(h) == name)
        .ok_or_else(|| {
            DedupError::Vectorization(format!(
                "column '{}' not found in CSV header {:?}",
                name,
                headers.iter().map(clean_header).collect::<Vec<_>>()
            ))
        })
}
