pub mod json_loader;

pub use json_loader::{load_journal_list, read_detail_log, read_summary_log, SkipSet};
