use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio_test::assert_ok;

use linkcheck::clients::MetadataSource;
use linkcheck::models::{
    load_journal_list, read_detail_log, read_summary_log, ArticleVerdict, CrossrefWork, DetailRecord,
    EventKind, FetcherKind, SkipSet,
};
use linkcheck::services::FetchResponse;
use linkcheck::{
    process_journal, run_batch, AppResult, ArticleFlow, AuditLog, BatchOptions, JournalJob,
    JournalOutcome, PageFetcher,
};

/// Metadata API returning one article for every ISSN
struct OneArticle;

#[async_trait]
impl MetadataSource for OneArticle {
    fn endpoint(&self, issn: &str) -> String {
        format!("http://metadata.test/journals/{issn}/works")
    }

    async fn fetch_works(&self, _issn: &str) -> AppResult<Vec<CrossrefWork>> {
        Ok(vec![serde_json::from_value(serde_json::json!({
            "DOI": "10.1/abc",
            "title": ["Sample Title"],
            "resource": { "primary": { "URL": "https://journal.example/article/1" } },
            "container-title": ["Journal of Tests"]
        }))
        .unwrap()])
    }
}

/// Serves one body for every URL and counts requests
struct FixedPage {
    body: &'static str,
    requests: usize,
}

impl FixedPage {
    fn new(body: &'static str) -> Self {
        Self { body, requests: 0 }
    }
}

#[async_trait]
impl PageFetcher for FixedPage {
    fn kind(&self) -> FetcherKind {
        FetcherKind::Http
    }

    async fn fetch(&mut self, url: &str) -> FetchResponse {
        self.requests += 1;
        FetchResponse {
            status: 200,
            body: self.body.to_string(),
            final_url: url.to_string(),
            content_type: "text/html".to_string(),
        }
    }
}

fn write_input(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("journals.json");
    std::fs::write(&path, r#"[{"journal_name": "Test J", "issn": "1234-5678"}]"#).unwrap();
    path
}

async fn run_once(dir: &Path, fetcher: &mut FixedPage) -> AuditLog {
    let audit = AuditLog::new(dir.join("summary.jsonl"), dir.join("detail.jsonl"));
    let journals = assert_ok!(load_journal_list(&write_input(dir)).await);
    let mut skip = assert_ok!(SkipSet::load(audit.summary_path()).await);

    assert_ok!(
        run_batch(
            &journals,
            BatchOptions::default(),
            &OneArticle,
            fetcher,
            &audit,
            &mut skip,
            &ArticleFlow::new(Duration::ZERO),
            Duration::ZERO,
        )
        .await
    );
    audit
}

fn verdicts(records: &[DetailRecord]) -> Vec<&ArticleVerdict> {
    records.iter().filter_map(DetailRecord::as_verdict).collect()
}

#[tokio::test]
async fn title_on_primary_page_passes_on_first_trial() {
    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = FixedPage::new("<html><h1>... Sample Title ...</h1></html>");

    let audit = run_once(dir.path(), &mut fetcher).await;

    let detail = read_detail_log(audit.detail_path()).await.unwrap();
    let verdicts = verdicts(&detail);
    assert_eq!(verdicts.len(), 1);
    assert!(verdicts[0].passed);
    assert!(verdicts[0].accessible);
    assert_eq!(verdicts[0].trials.len(), 1);
    assert_eq!(verdicts[0].source_name.as_deref(), Some("Test J"));
    assert_eq!(fetcher.requests, 1);

    let summaries = read_summary_log(audit.summary_path()).await.unwrap();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!((summary.total, summary.accessible_count, summary.correct_count), (1, 1, 1));
    assert_eq!(summary.journal_name, "Journal of Tests");
    assert_eq!(summary.fetcher, Some(FetcherKind::Http));
}

#[tokio::test]
async fn soft_404_page_is_neither_accessible_nor_correct() {
    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = FixedPage::new("<html><body>404 Not Found page</body></html>");

    let audit = run_once(dir.path(), &mut fetcher).await;

    let detail = read_detail_log(audit.detail_path()).await.unwrap();
    let verdicts = verdicts(&detail);
    assert_eq!(verdicts.len(), 1);
    assert!(!verdicts[0].passed);
    assert!(!verdicts[0].accessible);
    assert!(verdicts[0].trials.iter().all(|t| t.status == 404));

    let summaries = read_summary_log(audit.summary_path()).await.unwrap();
    assert_eq!((summaries[0].accessible_count, summaries[0].correct_count), (0, 0));
}

#[tokio::test]
async fn second_run_only_logs_a_skip() {
    let dir = tempfile::tempdir().unwrap();
    let mut fetcher = FixedPage::new("<p>Sample Title</p>");

    run_once(dir.path(), &mut fetcher).await;
    let audit = run_once(dir.path(), &mut fetcher).await;

    assert_eq!(fetcher.requests, 1);
    assert_eq!(read_summary_log(audit.summary_path()).await.unwrap().len(), 1);

    let detail = read_detail_log(audit.detail_path()).await.unwrap();
    assert_eq!(verdicts(&detail).len(), 1);
    let last = detail.last().and_then(DetailRecord::as_event).unwrap();
    assert_eq!(last.event, EventKind::FastSkipName);
}

#[tokio::test]
async fn journal_processor_twice_for_same_issn_skips_by_registry_name() {
    let dir = tempfile::tempdir().unwrap();
    let audit = AuditLog::new(dir.path().join("summary.jsonl"), dir.path().join("detail.jsonl"));
    let flow = ArticleFlow::new(Duration::ZERO);
    let mut fetcher = FixedPage::new("<p>Sample Title</p>");
    let job = JournalJob::new("1234-5678", None);

    let mut skip = SkipSet::default();
    let first = assert_ok!(process_journal(&job, &OneArticle, &mut fetcher, &audit, &mut skip, &flow).await);
    assert!(matches!(first, JournalOutcome::Completed(_)));

    // fresh skip set, as a new process would build it
    let mut skip = assert_ok!(SkipSet::load(audit.summary_path()).await);
    let second = assert_ok!(process_journal(&job, &OneArticle, &mut fetcher, &audit, &mut skip, &flow).await);
    assert_eq!(
        second,
        JournalOutcome::AlreadyProcessed {
            journal_name: "Journal of Tests".to_string()
        }
    );

    assert_eq!(read_summary_log(audit.summary_path()).await.unwrap().len(), 1);
    let detail = read_detail_log(audit.detail_path()).await.unwrap();
    assert_eq!(verdicts(&detail).len(), 1);
    let last = detail.last().and_then(DetailRecord::as_event).unwrap();
    assert_eq!(last.event, EventKind::SkipExisting);
}
