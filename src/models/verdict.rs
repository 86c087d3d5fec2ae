//! Candidates, trials and the verdicts persisted to the audit logs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a candidate URL came from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateLabel {
    #[serde(rename = "resource.primary.URL")]
    PrimaryResource,
    #[serde(rename = "URL")]
    RegistryUrl,
    #[serde(rename = "DOI")]
    DoiResolved,
}

impl CandidateLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateLabel::PrimaryResource => "resource.primary.URL",
            CandidateLabel::RegistryUrl => "URL",
            CandidateLabel::DoiResolved => "DOI",
        }
    }
}

impl fmt::Display for CandidateLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unique URL to try for an article
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub label: CandidateLabel,
    pub url: String,
    pub alias_labels: Vec<CandidateLabel>,
}

/// Outcome of checking a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub status: u16,
    pub has_title: bool,
    pub info: String,
    pub is_accessible: bool,
}

impl Verification {
    pub fn new(status: u16, has_title: bool, info: impl Into<String>, is_accessible: bool) -> Self {
        Self {
            status,
            has_title,
            info: info.into(),
            is_accessible,
        }
    }
}

/// One attempted candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trial {
    pub label: CandidateLabel,
    #[serde(default)]
    pub aliases: Vec<CandidateLabel>,
    pub url: String,
    pub status: u16,
    pub has_title: bool,
    pub is_accessible: bool,
    pub info: String,
}

impl Trial {
    pub fn new(candidate: &Candidate, verification: Verification) -> Self {
        Self {
            label: candidate.label,
            aliases: candidate.alias_labels.clone(),
            url: candidate.url.clone(),
            status: verification.status,
            has_title: verification.has_title,
            is_accessible: verification.is_accessible,
            info: verification.info,
        }
    }

    pub fn is_pass(&self) -> bool {
        self.status == 200 && self.has_title
    }
}

/// Per-article detail record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleVerdict {
    pub journal_name: String,
    #[serde(default, alias = "dp_journal_name")]
    pub source_name: Option<String>,
    pub issn: String,
    pub idx: usize,
    pub total: usize,
    pub doi: String,
    pub title: String,
    pub passed: bool,
    pub accessible: bool,
    pub trials: Vec<Trial>,
}

impl ArticleVerdict {
    /// Label of the trial that passed, if any
    pub fn passing_label(&self) -> Option<CandidateLabel> {
        self.trials.iter().find(|t| t.is_pass()).map(|t| t.label)
    }
}

/// Which fetch adapter produced a summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    #[default]
    #[serde(alias = "selenium")]
    Browser,
    Http,
}

impl fmt::Display for FetcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetcherKind::Browser => f.write_str("browser"),
            FetcherKind::Http => f.write_str("http"),
        }
    }
}

/// Per-journal summary record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    #[serde(default)]
    pub journal_name: String,
    #[serde(default, alias = "dp_journal_name")]
    pub source_name: Option<String>,
    #[serde(default)]
    pub issn: String,
    #[serde(default)]
    pub total: usize,
    #[serde(rename = "accessible", default)]
    pub accessible_count: usize,
    #[serde(rename = "correct", default)]
    pub correct_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetcher: Option<FetcherKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl JournalSummary {
    pub fn access_rate(&self) -> f64 {
        percentage(self.accessible_count, self.total)
    }

    pub fn correct_rate(&self) -> f64 {
        percentage(self.correct_count, self.total)
    }
}

pub(crate) fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
