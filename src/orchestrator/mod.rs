//! Orchestration layer
//!
//! ## Modules
//!
//! ### `batch_processor`
//! - owns the run: skip set, metadata client, fetch adapter
//! - applies the selection rules over the input list
//! - prints the final statistics and releases the browser
//!
//! ### `journal_processor`
//! - one ISSN: metadata → skip check → every article → summary
//!
//! ## Layering
//!
//! ```text
//! batch_processor (Vec<JournalEntry>)
//!     ↓
//! journal_processor (Vec<CrossrefWork>)
//!     ↓
//! workflow::ArticleFlow (one article)
//!     ↓
//! services (candidates / verifier / fetchers / audit log)
//!     ↓
//! infrastructure (BrowserSession)
//! ```

pub mod batch_processor;
pub mod journal_processor;

pub use batch_processor::{run_batch, ActiveFetcher, App, BatchOptions, BatchStats};
pub use journal_processor::{process_journal, JournalJob, JournalOutcome};
