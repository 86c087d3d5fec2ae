//! Journal processor - orchestration layer
//!
//! One journal: fetch its works → skip if already summarized → verify every
//! article → append the summary.
//!
//! Each verdict is written as soon as the article is done; the summary is
//! written last, so an interrupted journal is retried on the next run.

use tracing::{error, info, warn};

use crate::clients::MetadataSource;
use crate::error::AppResult;
use crate::models::{
    resolve_journal_name, ArticleRecord, EventKind, JournalSummary, LogEvent, SkipSet,
};
use crate::services::page_fetcher::PageFetcher;
use crate::services::AuditLog;
use crate::utils::logging;
use crate::workflow::{ArticleCtx, ArticleFlow};

/// A journal scheduled for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalJob {
    pub issn: String,
    /// Name from the input list
    pub source_name: Option<String>,
}

impl JournalJob {
    pub fn new(issn: impl Into<String>, source_name: Option<String>) -> Self {
        Self {
            issn: issn.into(),
            source_name,
        }
    }
}

/// How a journal invocation ended
#[derive(Debug, Clone, PartialEq)]
pub enum JournalOutcome {
    Completed(JournalSummary),
    /// Registry name was already in the summary log
    AlreadyProcessed { journal_name: String },
    /// Metadata request failed; nothing but an error event was written
    MetadataFailed,
}

/// Process one journal
///
/// # Arguments
/// - `job`: ISSN and input name
/// - `source`: article metadata provider
/// - `fetcher`: page fetch adapter shared by the whole run
/// - `audit`: summary/detail logs
/// - `skip`: names already summarized; extended on completion
/// - `flow`: per-article verification flow
///
/// # Returns
/// The outcome; `Err` only when the audit log cannot be written.
pub async fn process_journal<M, F>(
    job: &JournalJob,
    source: &M,
    fetcher: &mut F,
    audit: &AuditLog,
    skip: &mut SkipSet,
    flow: &ArticleFlow,
) -> AppResult<JournalOutcome>
where
    M: MetadataSource + ?Sized,
    F: PageFetcher + ?Sized,
{
    let source_name = job.source_name.as_deref();
    let api_url = source.endpoint(&job.issn);

    let works = match source.fetch_works(&job.issn).await {
        Ok(works) => works,
        Err(e) => {
            error!("❌ [ISSN {}] metadata request failed: {}", job.issn, e);
            audit.event(
                LogEvent::error(EventKind::MetadataError)
                    .issn(&job.issn)
                    .source_name(source_name)
                    .api_url(&api_url)
                    .msg(e.to_string()),
            )?;
            return Ok(JournalOutcome::MetadataFailed);
        }
    };

    let journal_name = resolve_journal_name(&works);

    if skip.contains(&journal_name) {
        info!("⏭️ [ISSN {}] {} already summarized", job.issn, journal_name);
        audit.event(
            LogEvent::info(EventKind::SkipExisting)
                .issn(&job.issn)
                .journal_name(&journal_name)
                .source_name(source_name)
                .msg("journal_name already present in summary log"),
        )?;
        return Ok(JournalOutcome::AlreadyProcessed { journal_name });
    }

    let total = works.len();
    if total == 0 {
        warn!("⚠️ [ISSN {}] no works returned", job.issn);
    }
    audit.event(
        LogEvent::info(EventKind::Start)
            .issn(&job.issn)
            .journal_name(&journal_name)
            .source_name(source_name)
            .api_url(&api_url)
            .total(total),
    )?;

    let mut accessible_count = 0;
    let mut correct_count = 0;

    for (index, work) in works.iter().enumerate() {
        let record = ArticleRecord::from(work);
        let ctx = ArticleCtx::new(
            &job.issn,
            &journal_name,
            job.source_name.clone(),
            index + 1,
            total,
        );

        let verdict = flow.run(&mut *fetcher, &record, &ctx).await;
        if verdict.accessible {
            accessible_count += 1;
        }
        if verdict.passed {
            correct_count += 1;
        }
        audit.verdict(&verdict)?;
    }

    let summary = JournalSummary {
        journal_name: journal_name.clone(),
        source_name: job.source_name.clone(),
        issn: job.issn.clone(),
        total,
        accessible_count,
        correct_count,
        fetcher: Some(fetcher.kind()),
        checked_at: Some(chrono::Utc::now()),
    };
    audit.summary(&summary)?;
    skip.insert_summary(&summary);

    logging::log_journal_done(&journal_name, &job.issn, total, accessible_count, correct_count);
    Ok(JournalOutcome::Completed(summary))
}
