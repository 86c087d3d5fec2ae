//! Batch journal processor - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Setup**: skip set, metadata client, fetch adapter (browser or HTTP)
//! 2. **Selection**: start offset, journal cap, name fast-skip, ISSN choice,
//!    in-run ISSN dedup
//! 3. **Delegation**: one `process_journal` call per selected journal
//! 4. **Teardown**: optional pause, then the browser session is released
//!
//! The run is strictly sequential: one page, one journal, one URL at a time.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncBufReadExt;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::clients::{CrossrefClient, MetadataSource, PdfClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::BrowserSession;
use crate::models::{EventKind, FetcherKind, JournalEntry, LogEvent, SkipSet};
use crate::orchestrator::journal_processor::{process_journal, JournalJob, JournalOutcome};
use crate::services::page_fetcher::{BrowserFetcher, FetchResponse, HttpFetcher, PageFetcher};
use crate::services::AuditLog;
use crate::utils::logging;
use crate::workflow::ArticleFlow;

/// Which part of the input list to process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// 1-based index of the first journal; 0 is treated as 1
    pub start: usize,
    /// Cap on journal invocations, 0 = unlimited
    pub max: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { start: 1, max: 0 }
    }
}

/// Counters of one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Journals handed to the journal processor
    pub invocations: usize,
    pub completed: usize,
    /// Fast-skipped, already processed, missing ISSN or duplicate ISSN
    pub skipped: usize,
    pub metadata_failed: usize,
}

/// Run the selection rules over `journals` and process every selected one
///
/// # Arguments
/// - `journals`: input list in file order
/// - `options`: start offset and journal cap
/// - `source` / `fetcher`: metadata provider and fetch adapter
/// - `audit`: summary/detail logs
/// - `skip`: names already summarized
/// - `flow`: per-article flow (carries the per-trial delay)
/// - `journal_delay`: pause after every journal invocation
#[allow(clippy::too_many_arguments)]
pub async fn run_batch<M, F>(
    journals: &[JournalEntry],
    options: BatchOptions,
    source: &M,
    fetcher: &mut F,
    audit: &AuditLog,
    skip: &mut SkipSet,
    flow: &ArticleFlow,
    journal_delay: Duration,
) -> AppResult<BatchStats>
where
    M: MetadataSource + ?Sized,
    F: PageFetcher + ?Sized,
{
    let start = options.start.max(1);
    let total = journals.len();
    let mut seen_issns: HashSet<String> = HashSet::new();
    let mut stats = BatchStats::default();

    for (offset, entry) in journals.iter().enumerate() {
        let idx = offset + 1;
        if options.max > 0 && stats.invocations >= options.max {
            break;
        }
        if idx < start {
            continue;
        }

        let name = entry.name();
        let source_name = (!name.is_empty()).then(|| name.to_string());

        if skip.contains(name) {
            info!("[FAST-SKIP] already in summary log: {}", name);
            audit.event(
                LogEvent::info(EventKind::FastSkipName)
                    .source_name(Some(name))
                    .idx(idx),
            )?;
            stats.skipped += 1;
            continue;
        }

        let Some(issn) = entry.chosen_issn() else {
            warn!("[SKIP] no ISSN or e-ISSN: {}", name);
            audit.event(
                LogEvent::warn(EventKind::SkipNoIssn)
                    .source_name(Some(name))
                    .idx(idx),
            )?;
            stats.skipped += 1;
            continue;
        };

        if seen_issns.contains(issn) {
            info!("[SKIP] ISSN already processed in this run: {} ({})", issn, name);
            audit.event(
                LogEvent::info(EventKind::SkipDupIssn)
                    .issn(issn)
                    .source_name(Some(name))
                    .idx(idx),
            )?;
            stats.skipped += 1;
            continue;
        }

        logging::log_journal_start(idx, total, name, issn);
        let job = JournalJob::new(issn, source_name);
        match process_journal(&job, source, &mut *fetcher, audit, skip, flow).await {
            Ok(JournalOutcome::Completed(_)) => stats.completed += 1,
            Ok(JournalOutcome::AlreadyProcessed { .. }) => stats.skipped += 1,
            Ok(JournalOutcome::MetadataFailed) => stats.metadata_failed += 1,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("❌ [ISSN {}] journal aborted: {}", issn, e);
                stats.metadata_failed += 1;
            }
        }
        seen_issns.insert(issn.to_string());
        stats.invocations += 1;

        sleep(journal_delay).await;
    }

    Ok(stats)
}

/// Fetch adapter selected for the run
pub enum ActiveFetcher {
    Browser(BrowserFetcher),
    Http(HttpFetcher),
}

impl ActiveFetcher {
    /// Launch or attach to the browser, or build the HTTP client.
    pub async fn acquire(kind: FetcherKind, config: &Config) -> AppResult<Self> {
        match kind {
            FetcherKind::Browser => {
                let session = BrowserSession::acquire(config).await?;
                let pdf = PdfClient::new(config)?;
                Ok(Self::Browser(BrowserFetcher::new(session, pdf, config)))
            }
            FetcherKind::Http => Ok(Self::Http(HttpFetcher::new(config)?)),
        }
    }

    pub async fn shutdown(self) {
        if let Self::Browser(fetcher) = self {
            fetcher.shutdown().await;
        }
    }
}

#[async_trait]
impl PageFetcher for ActiveFetcher {
    fn kind(&self) -> FetcherKind {
        match self {
            Self::Browser(f) => f.kind(),
            Self::Http(f) => f.kind(),
        }
    }

    async fn fetch(&mut self, url: &str) -> FetchResponse {
        match self {
            Self::Browser(f) => f.fetch(url).await,
            Self::Http(f) => f.fetch(url).await,
        }
    }
}

/// Application: owns every resource of a run
pub struct App {
    config: Config,
    audit: AuditLog,
    skip: SkipSet,
    source: CrossrefClient,
    fetcher: ActiveFetcher,
    flow: ArticleFlow,
}

impl App {
    /// Load the skip set and acquire the fetch adapter
    ///
    /// # Arguments
    /// - `config`: runtime configuration
    /// - `audit`: summary/detail logs (the summary log seeds the skip set)
    /// - `kind`: browser or plain HTTP fetching
    pub async fn initialize(config: Config, audit: AuditLog, kind: FetcherKind) -> AppResult<Self> {
        let skip = SkipSet::load(audit.summary_path()).await?;
        info!("📚 {} journal names already summarized", skip.len());

        let source = CrossrefClient::new(&config)?;
        let fetcher = ActiveFetcher::acquire(kind, &config).await?;
        info!("🌐 Fetcher ready: {}", fetcher.kind());

        let flow = ArticleFlow::new(Duration::from_millis(config.polite_delay_ms));
        Ok(Self {
            config,
            audit,
            skip,
            source,
            fetcher,
            flow,
        })
    }

    /// Process an input list
    pub async fn run(&mut self, journals: &[JournalEntry], options: BatchOptions) -> AppResult<BatchStats> {
        logging::log_startup(journals.len(), options.start.max(1), options.max);

        let stats = run_batch(
            journals,
            options,
            &self.source,
            &mut self.fetcher,
            &self.audit,
            &mut self.skip,
            &self.flow,
            Duration::from_millis(self.config.polite_delay_ms),
        )
        .await?;

        logging::print_final_stats(
            stats.completed,
            stats.skipped,
            stats.metadata_failed,
            &self.audit.summary_path().display().to_string(),
            &self.audit.detail_path().display().to_string(),
        );
        Ok(stats)
    }

    /// Process a single ISSN with the same logs and skip rules
    pub async fn check(&mut self, issn: &str, source_name: Option<String>) -> AppResult<JournalOutcome> {
        let job = JournalJob::new(issn.trim(), source_name);
        logging::log_journal_start(1, 1, job.source_name.as_deref().unwrap_or("-"), &job.issn);
        process_journal(
            &job,
            &self.source,
            &mut self.fetcher,
            &self.audit,
            &mut self.skip,
            &self.flow,
        )
        .await
    }

    /// Optionally wait for Enter, then release the fetch adapter
    pub async fn shutdown(self, pause: bool) {
        if pause && self.config.pause_before_exit && self.fetcher.kind() == FetcherKind::Browser {
            wait_for_enter().await;
        }
        self.fetcher.shutdown().await;
        info!("👋 Browser session released");
    }
}

async fn wait_for_enter() {
    info!("Browser is still open. Press Enter to close it...");
    let mut line = String::new();
    let mut stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = stdin.read_line(&mut line).await {
        warn!("Cannot read stdin: {}", e);
    }
}
