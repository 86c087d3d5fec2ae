use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult, FileError, InputError};
use crate::models::detail_record::DetailRecord;
use crate::models::journal::JournalEntry;
use crate::models::verdict::JournalSummary;

/// Load the input journal list (a JSON array)
pub async fn load_journal_list(path: &Path) -> AppResult<Vec<JournalEntry>> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let journals: Vec<JournalEntry> =
        serde_json::from_str(&content).map_err(|source| InputError::MalformedJournalList {
            path: path.display().to_string(),
            source,
        })?;

    tracing::info!("Loaded {} journals from {}", journals.len(), path.display());
    Ok(journals)
}

/// Journal names already present in the summary log, lowercased
#[derive(Debug, Clone, Default)]
pub struct SkipSet {
    names: HashSet<String>,
}

impl SkipSet {
    /// Read `journal_name` and `source_name` of every summary line.
    ///
    /// A missing file is an empty set; unparsable lines are ignored.
    pub async fn load(summary_path: &Path) -> AppResult<Self> {
        let mut set = Self::default();
        for summary in read_jsonl::<JournalSummary>(summary_path).await? {
            set.insert_summary(&summary);
        }
        tracing::debug!("{} known journal names in {}", set.len(), summary_path.display());
        Ok(set)
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = name.trim().to_lowercase();
        !key.is_empty() && self.names.contains(&key)
    }

    pub fn insert(&mut self, name: &str) {
        let key = name.trim().to_lowercase();
        if !key.is_empty() {
            self.names.insert(key);
        }
    }

    pub fn insert_summary(&mut self, summary: &JournalSummary) {
        self.insert(&summary.journal_name);
        if let Some(source) = summary.source_name.as_deref() {
            self.insert(source);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub async fn read_summary_log(path: &Path) -> AppResult<Vec<JournalSummary>> {
    read_jsonl(path).await
}

pub async fn read_detail_log(path: &Path) -> AppResult<Vec<DetailRecord>> {
    read_jsonl(path).await
}

/// Parse a JSONL file, skipping blank and malformed lines. Missing file → empty.
async fn read_jsonl<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::debug!("{}:{} skipped: {}", path.display(), line_no + 1, e),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_journal_list(&dir.path().join("nope.json")).await.unwrap_err();
        assert!(matches!(err, AppError::File(FileError::NotFound { .. })));
    }

    #[tokio::test]
    async fn non_array_input_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journals.json");
        std::fs::write(&path, r#"{"journal_name": "Test J"}"#).unwrap();

        let err = load_journal_list(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MalformedJournalList { .. })));
    }

    #[tokio::test]
    async fn record_without_name_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journals.json");
        std::fs::write(
            &path,
            r#"[{"journal_name": "Test J", "issn": "1234-5678"}, {"issn": "8765-4321"}]"#,
        )
        .unwrap();

        let err = load_journal_list(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::MalformedJournalList { .. })));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn journal_list_accepts_partial_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journals.json");
        std::fs::write(
            &path,
            r#"[{"journal_name": "Test J", "issn": "1234-5678"}, {"journal_name": "Other", "journal_url": "https://x/other"}]"#,
        )
        .unwrap();

        let journals = load_journal_list(&path).await.unwrap();
        assert_eq!(journals.len(), 2);
        assert_eq!(journals[0].chosen_issn(), Some("1234-5678"));
        assert_eq!(journals[1].chosen_issn(), None);
    }

    #[tokio::test]
    async fn skip_set_collects_both_names_and_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"journal_name\":\"Journal of Tests\",\"dp_journal_name\":\"Test J\",\"issn\":\"1234-5678\",\"total\":1,\"accessible\":1,\"correct\":1}\n",
                "\n",
                "not json\n",
                "{\"journal_name\":\"  Second Journal \",\"source_name\":null,\"issn\":\"1111-2222\",\"total\":0,\"accessible\":0,\"correct\":0}\n",
            ),
        )
        .unwrap();

        let set = SkipSet::load(&path).await.unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains("journal of tests"));
        assert!(set.contains("TEST J"));
        assert!(set.contains("second journal"));
        assert!(!set.contains(""));
    }

    #[tokio::test]
    async fn missing_summary_is_empty_skip_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = SkipSet::load(&dir.path().join("summary.jsonl")).await.unwrap();
        assert!(set.is_empty());
    }
}
