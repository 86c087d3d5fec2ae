//! Command entry points behind the CLI

use anyhow::Context as _;
use tracing::info;

use crate::cli::{CheckArgs, LogArgs, RunArgs};
use crate::config::Config;
use crate::models::load_journal_list;
use crate::orchestrator::{App, BatchOptions, JournalOutcome};
use crate::report::load as load_report;
use crate::services::AuditLog;

fn audit_log(logs: &LogArgs) -> AuditLog {
    AuditLog::new(&logs.summary, &logs.detail)
}

/// Verify every journal of the input list
pub async fn run(logs: LogArgs, args: RunArgs) -> anyhow::Result<()> {
    let config = Config::load(logs.config.as_deref()).context("load configuration")?;

    // input problems abort before a browser is started
    let journals = load_journal_list(&args.input)
        .await
        .with_context(|| format!("load journal list {}", args.input.display()))?;

    let mut app = App::initialize(config, audit_log(&logs), logs.fetcher)
        .await
        .context("initialize")?;

    let result = app
        .run(
            &journals,
            BatchOptions {
                start: args.start,
                max: args.max,
            },
        )
        .await;
    app.shutdown(!logs.no_pause).await;

    result.context("run journals")?;
    Ok(())
}

/// Verify a single ISSN
pub async fn check(logs: LogArgs, args: CheckArgs) -> anyhow::Result<()> {
    let config = Config::load(logs.config.as_deref()).context("load configuration")?;
    let mut app = App::initialize(config, audit_log(&logs), logs.fetcher)
        .await
        .context("initialize")?;

    let result = app.check(&args.issn, args.name).await;
    app.shutdown(!logs.no_pause).await;

    match result.with_context(|| format!("check {}", args.issn))? {
        JournalOutcome::Completed(summary) => info!(
            "✅ {}: {}/{} accessible, {}/{} correct",
            summary.journal_name,
            summary.accessible_count,
            summary.total,
            summary.correct_count,
            summary.total
        ),
        JournalOutcome::AlreadyProcessed { journal_name } => {
            info!("⏭️ {} is already in {}", journal_name, logs.summary.display())
        }
        JournalOutcome::MetadataFailed => info!("❌ metadata request failed, see {}", logs.detail.display()),
    }
    Ok(())
}

/// Print statistics over the logs
pub async fn report(logs: LogArgs) -> anyhow::Result<()> {
    let report = load_report(&logs.summary, &logs.detail)
        .await
        .with_context(|| format!("read {}", logs.summary.display()))?;
    println!("{}", report.render());
    Ok(())
}
