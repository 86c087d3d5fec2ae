pub mod article;
pub mod detail_record;
pub mod journal;
pub mod loaders;
pub mod verdict;

pub use article::{resolve_journal_name, ArticleRecord, CrossrefWork, WorksEnvelope, UNKNOWN_JOURNAL};
pub use detail_record::{DetailRecord, EventKind, EventLevel, LogEvent};
pub use journal::JournalEntry;
pub use loaders::{load_journal_list, read_detail_log, read_summary_log, SkipSet};
pub use verdict::{
    ArticleVerdict, Candidate, CandidateLabel, FetcherKind, JournalSummary, Trial, Verification,
};
