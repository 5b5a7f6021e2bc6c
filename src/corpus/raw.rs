use std::{io, path::Path};

use serde::Serialize;

use crate::{
    config::CsvColumns,
    corpus::{column_index, csv_reader, open_resource, Corpus},
    error::Result,
    vectorizer::evaluate::scoring::DuplicatePair,
};

/// Raw question table (`问题ID`, `问题描述` by default)
///
/// Source of the batch path, and the lookup used to turn duplicate pairs
/// back into question IDs.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    ids: Vec<String>,
    texts: Vec<String>,
}

/// One side of a resolved duplicate pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntry {
    pub index: usize,
    pub text: String,
    /// None when no raw row contains the text
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateReport {
    pub left: ResolvedEntry,
    pub right: ResolvedEntry,
    pub score: f64,
}

impl RawTable {
    pub fn load_csv<P: AsRef<Path>>(path: P, columns: &CsvColumns) -> Result<Self> {
        let path = path.as_ref();
        let table = Self::from_reader(open_resource(path)?, columns)?;
        tracing::info!("loaded {} raw rows from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: io::Read>(reader: R, columns: &CsvColumns) -> Result<Self> {
        let mut rdr = csv_reader(reader);
        let headers = rdr.headers()?.clone();
        let id = column_index(&headers, &columns.raw_id)?;
        let text = column_index(&headers, &columns.raw_text)?;

        let mut table = RawTable::default();
        for record in rdr.records() {
            let record = record?;
            table.ids.push(record.get(id).unwrap_or("").to_string());
            table.texts.push(record.get(text).unwrap_or("").to_string());
        }
        Ok(table)
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

    /// ID of the first row whose description contains `text`.
    pub fn find_id(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        self.texts
            .iter()
            .position(|t| t.contains(text))
            .map(|i| self.ids[i].as_str())
    }

    /// Attach texts and, when a table is given, IDs to duplicate pairs.
    pub fn resolve(
        raw: Option<&RawTable>,
        corpus: &Corpus,
        pairs: &[DuplicatePair],
    ) -> Vec<DuplicateReport> {
        let side = |index: usize| {
            let text = corpus.text(index).unwrap_or("").to_string();
            let id = raw.and_then(|raw| {
                let found = raw.find_id(&text);
                if found.is_none() {
                    tracing::warn!("no raw row matches corpus entry {}: {:?}", index, text);
                }
                found.map(str::to_string)
            });
            ResolvedEntry { index, text, id }
        };
        pairs
            .iter()
            .map(|pair| DuplicateReport {
                left: side(pair.left),
                right: side(pair.right),
                score: pair.score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::token::TokenSet;

    const RAW: &str = "问题ID,问题描述\nQ001,服务器无法连接网络\nQ002,服务器无法连接网络！请处理\nQ003,打印机卡纸\n";

    #[test]
    fn find_id_by_containment() {
        let table = RawTable::from_reader(RAW.as_bytes(), &CsvColumns::default()).unwrap();
        assert_eq!(table.len(), 3);
        // first row containing the text wins
        assert_eq!(table.find_id("服务器无法连接网络"), Some("Q001"));
        assert_eq!(table.find_id("请处理"), Some("Q002"));
        assert_eq!(table.find_id("邮箱"), None);
        assert_eq!(table.find_id(""), None);
    }

    #[test]
    fn resolve_pairs() {
        let table = RawTable::from_reader(RAW.as_bytes(), &CsvColumns::default()).unwrap();
        let mut corpus = Corpus::new();
        corpus.push("打印机卡纸", TokenSet::parse("打印机 卡纸"));
        corpus.push("不存在的问题", TokenSet::parse("打印机 卡纸"));
        let pairs = [DuplicatePair { left: 0, right: 1, score: 1.0 }];

        let reports = RawTable::resolve(Some(&table), &corpus, &pairs);
        assert_eq!(reports[0].left.id.as_deref(), Some("Q003"));
        assert_eq!(reports[0].right.id, None);

        let bare = RawTable::resolve(None, &corpus, &pairs);
        assert_eq!(bare[0].left.text, "打印机卡纸");
        assert_eq!(bare[0].left.id, None);
    }
}
