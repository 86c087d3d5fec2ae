//! Article verification flow - workflow layer
//!
//! One article: resolve candidates → verify each in priority order → stop at
//! the first 200 page that carries the title.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::models::{ArticleRecord, ArticleVerdict, Trial};
use crate::services::page_fetcher::PageFetcher;
use crate::services::{resolve_candidates, url_verifier};
use crate::utils::{normalize, truncate_text};
use crate::workflow::article_ctx::ArticleCtx;

pub struct ArticleFlow {
    polite_delay: Duration,
}

impl ArticleFlow {
    pub fn new(polite_delay: Duration) -> Self {
        Self { polite_delay }
    }

    pub async fn run<F: PageFetcher + ?Sized>(
        &self,
        fetcher: &mut F,
        record: &ArticleRecord,
        ctx: &ArticleCtx,
    ) -> ArticleVerdict {
        let title_norm = normalize(&record.title);
        let candidates = resolve_candidates(record);
        debug!(
            "{} {} | {} candidates | {}",
            ctx,
            record.doi,
            candidates.len(),
            truncate_text(&record.title, 80)
        );

        let mut trials: Vec<Trial> = Vec::with_capacity(candidates.len());
        let mut passed = false;
        let mut accessible = false;

        for candidate in &candidates {
            let verification = url_verifier::verify(&mut *fetcher, &candidate.url, &title_norm).await;
            let trial = Trial::new(candidate, verification);
            debug!(
                "{} {} {} → {} ({})",
                ctx, trial.label, trial.url, trial.status, trial.info
            );

            accessible |= trial.is_accessible;
            let is_pass = trial.is_pass();
            trials.push(trial);

            if is_pass {
                passed = true;
                break;
            }
            sleep(self.polite_delay).await;
        }

        let mark = if passed {
            "✅"
        } else if accessible {
            "⚠️"
        } else {
            "❌"
        };
        info!(
            "{} {} {} | trials={} accessible={} passed={}",
            ctx,
            mark,
            record.doi,
            trials.len(),
            accessible,
            passed
        );

        ArticleVerdict {
            journal_name: ctx.journal_name.clone(),
            source_name: ctx.source_name.clone(),
            issn: ctx.issn.clone(),
            idx: ctx.idx,
            total: ctx.total,
            doi: record.doi.clone(),
            title: record.title.clone(),
            passed,
            accessible,
            trials,
        }
    }
}
