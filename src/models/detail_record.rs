//! Shapes written to the detail log
//!
//! The detail log mixes structured events and per-article verdicts. They carry
//! no explicit tag: events have `level`/`event`, verdicts have `doi`/`trials`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::verdict::ArticleVerdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// Journal processing started
    Start,
    /// Registry journal name already summarized
    SkipExisting,
    /// Input journal name already summarized
    FastSkipName,
    /// Input record has neither ISSN nor e-ISSN
    SkipNoIssn,
    /// ISSN already processed in this run
    SkipDupIssn,
    /// Metadata API request failed
    MetadataError,
}

/// Structured event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: EventLevel,
    pub event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "dp_journal_name")]
    pub source_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idx: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl LogEvent {
    pub fn new(level: EventLevel, event: EventKind) -> Self {
        Self {
            level,
            event,
            ts: Some(Utc::now()),
            issn: None,
            journal_name: None,
            source_name: None,
            idx: None,
            api_url: None,
            total: None,
            msg: None,
        }
    }

    pub fn info(event: EventKind) -> Self {
        Self::new(EventLevel::Info, event)
    }

    pub fn warn(event: EventKind) -> Self {
        Self::new(EventLevel::Warn, event)
    }

    pub fn error(event: EventKind) -> Self {
        Self::new(EventLevel::Error, event)
    }

    pub fn issn(mut self, issn: impl Into<String>) -> Self {
        self.issn = Some(issn.into());
        self
    }

    pub fn journal_name(mut self, name: impl Into<String>) -> Self {
        self.journal_name = Some(name.into());
        self
    }

    pub fn source_name(mut self, name: Option<&str>) -> Self {
        self.source_name = name.map(str::to_string);
        self
    }

    pub fn idx(mut self, idx: usize) -> Self {
        self.idx = Some(idx);
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn msg(mut self, msg: impl Into<String>) -> Self {
        self.msg = Some(msg.into());
        self
    }
}

/// Any line of the detail log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailRecord {
    Event(LogEvent),
    Verdict(ArticleVerdict),
}

impl DetailRecord {
    pub fn as_verdict(&self) -> Option<&ArticleVerdict> {
        match self {
            DetailRecord::Verdict(v) => Some(v),
            DetailRecord::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&LogEvent> {
        match self {
            DetailRecord::Event(e) => Some(e),
            DetailRecord::Verdict(_) => None,
        }
    }
}
