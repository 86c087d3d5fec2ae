//! Audit log writer - service layer
//!
//! Appends JSON lines to the summary and detail logs. Every record is flushed
//! on its own so an interrupted run never loses finished work.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{ArticleVerdict, DetailRecord, JournalSummary, LogEvent};

/// Append-only JSONL file
#[derive(Debug, Clone)]
pub struct JsonlWriter {
    path: PathBuf,
}

impl JsonlWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line
    pub fn append<T: Serialize>(&self, record: &T) -> AppResult<()> {
        let write_error = |e| AppError::file_write_failed(self.path.display().to_string(), e);

        let mut line = serde_json::to_string(record)
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;
        file.write_all(line.as_bytes()).map_err(write_error)?;
        file.flush().map_err(write_error)?;

        debug!("Appended {} bytes to {}", line.len(), self.path.display());
        Ok(())
    }
}

/// Summary + detail logs of one run
#[derive(Debug, Clone)]
pub struct AuditLog {
    summary: JsonlWriter,
    detail: JsonlWriter,
}

impl AuditLog {
    pub fn new(summary_path: impl Into<PathBuf>, detail_path: impl Into<PathBuf>) -> Self {
        Self {
            summary: JsonlWriter::new(summary_path),
            detail: JsonlWriter::new(detail_path),
        }
    }

    pub fn summary_path(&self) -> &Path {
        self.summary.path()
    }

    pub fn detail_path(&self) -> &Path {
        self.detail.path()
    }

    pub fn event(&self, event: LogEvent) -> AppResult<()> {
        self.detail.append(&DetailRecord::Event(event))
    }

    pub fn verdict(&self, verdict: &ArticleVerdict) -> AppResult<()> {
        self.detail.append(verdict)
    }

    pub fn summary(&self, summary: &JournalSummary) -> AppResult<()> {
        self.summary.append(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{read_detail_log, EventKind};

    #[tokio::test]
    async fn appends_lines_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(
            dir.path().join("out/summary.jsonl"),
            dir.path().join("out/detail.jsonl"),
        );

        log.event(LogEvent::info(EventKind::Start).issn("1234-5678").total(0))
            .unwrap();
        log.event(LogEvent::warn(EventKind::SkipNoIssn).source_name(Some("Test J")))
            .unwrap();

        let content = std::fs::read_to_string(log.detail_path()).unwrap();
        assert_eq!(content.lines().count(), 2);

        let records = read_detail_log(log.detail_path()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.as_event().is_some()));
        assert!(!log.summary_path().exists());
    }
}
