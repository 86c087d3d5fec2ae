//! # linkcheck
//!
//! Verifies that the articles a journal registers with Crossref are
//! reachable under the registered URLs and that each landing page carries
//! the article title.
//!
//! ## Architecture
//!
//! ### ① Infrastructure
//! - `browser/` - launch a headless Chromium or attach to a debug port
//! - `infrastructure/` - `BrowserSession`, the only owner of the page and its
//!   network log
//!
//! ### ② Clients and services
//! - `clients/` - Crossref works API, direct PDF download
//! - `services/` - candidate resolution, fetch adapters, URL verifier, audit log
//!
//! ### ③ Workflow
//! - `workflow/` - `ArticleFlow`: one article, candidates in priority order,
//!   stop at the first page with status 200 and the title
//!
//! ### ④ Orchestration
//! - `orchestrator/journal_processor` - one ISSN end to end
//! - `orchestrator/batch_processor` - input list, skip rules, resource lifetime
//!
//! `report` aggregates the audit logs after the fact.

pub mod browser;
pub mod cli;
pub mod clients;
pub mod commands;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod services;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::BrowserSession;
pub use orchestrator::{process_journal, run_batch, App, BatchOptions, JournalJob, JournalOutcome};
pub use services::{AuditLog, PageFetcher};
pub use workflow::{ArticleCtx, ArticleFlow};
