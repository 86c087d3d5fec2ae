/// Logging helpers
///
/// Subscriber setup and the banner lines printed around a batch run.
use anyhow::Context as _;
use tracing::info;

/// Install the global `tracing` subscriber (stdout, `RUST_LOG` or `info`)
pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}

/// Log run start
///
/// # Arguments
/// - `total`: number of journals in the input list
/// - `start`: 1-based start offset
/// - `max`: journal cap (0 = unlimited)
pub fn log_startup(total: usize, start: usize, max: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 Link verification started - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("📋 Journals in input: {}", total);
    info!("▶️ Start offset: {}", start);
    if max > 0 {
        info!("🔢 Journal cap: {}", max);
    }
    info!("{}", "=".repeat(60));
}

/// Log the start of one journal
pub fn log_journal_start(idx: usize, total: usize, name: &str, issn: &str) {
    info!("\n{}", "─".repeat(60));
    info!("[RUN] {}/{}  {}  → ISSN={}", idx, total, name, issn);
}

/// Log journal completion
pub fn log_journal_done(journal_name: &str, issn: &str, total: usize, accessible: usize, correct: usize) {
    info!(
        "[DONE] {} | ISSN={} | total={} | accessible={} | correct={}",
        journal_name, issn, total, accessible, correct
    );
}

/// Print final batch statistics
///
/// # Arguments
/// - `completed`: journals summarized in this run
/// - `skipped`: journals skipped (already summarized, duplicate or missing ISSN)
/// - `failed`: journals whose metadata fetch failed
/// - `summary_path` / `detail_path`: where the audit trail went
pub fn print_final_stats(
    completed: usize,
    skipped: usize,
    failed: usize,
    summary_path: &str,
    detail_path: &str,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Run finished - {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("✅ Completed: {}", completed);
    info!("⏭️ Skipped: {}", skipped);
    info!("❌ Metadata failures: {}", failed);
    info!("{}", "=".repeat(60));
    info!("summary → {}", summary_path);
    info!("detail  → {}", detail_path);
}
