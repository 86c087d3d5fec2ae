//! Browser session - infrastructure layer
//!
//! Owns the single browser page shared by the whole run and the network
//! response log recorded for it. Knows nothing about articles or journals.

use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventResponseReceived, ResourceType,
};
use chromiumoxide::listeners::EventStream;
use chromiumoxide::{Browser, Page};
use futures::{FutureExt, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser;
use crate::config::Config;
use crate::error::{AppResult, BrowserError};

/// Status and MIME type of a document response seen on the network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentResponse {
    pub url: String,
    pub status: u16,
    pub mime_type: String,
}

/// Browser session
///
/// - holds the only `Page`
/// - records `Network.responseReceived` events for it
/// - is released explicitly with [`BrowserSession::close`]
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    responses: EventStream<EventResponseReceived>,
    handler_task: JoinHandle<()>,
    /// Launched by us, so ours to close
    owned: bool,
}

impl BrowserSession {
    /// Connect to the configured debug port, or launch a new browser.
    pub async fn acquire(config: &Config) -> AppResult<Self> {
        let (browser, page, handler_task, owned) = match config.browser_debug_port {
            Some(port) => {
                let (b, p, h) = browser::connect_to_browser(port).await?;
                (b, p, h, false)
            }
            None => {
                let (b, p, h) = browser::launch_browser(config).await?;
                (b, p, h, true)
            }
        };

        let page_error = |e: chromiumoxide::error::CdpError| BrowserError::PageCreationFailed {
            source: Box::new(e),
        };
        page.execute(EnableParams::default()).await.map_err(page_error)?;
        let responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(page_error)?;

        Ok(Self {
            browser,
            page,
            responses,
            handler_task,
            owned,
        })
    }

    /// Discard recorded responses so the next navigation starts clean.
    pub fn drain_network_log(&mut self) -> usize {
        let mut dropped = 0;
        while let Some(Some(_)) = self.responses.next().now_or_never() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Dropped {} stale network events", dropped);
        }
        dropped
    }

    /// Navigate and wait for the load, bounded by `timeout`.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> AppResult<()> {
        let navigation_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            BrowserError::NavigationFailed {
                url: url.to_string(),
                source,
            }
        };

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(navigation_error(Box::new(e)).into()),
            Err(elapsed) => Err(navigation_error(Box::new(elapsed)).into()),
        }
    }

    /// Document responses recorded since the last drain, in arrival order.
    pub async fn document_responses(&mut self) -> Vec<DocumentResponse> {
        // let the CDP handler deliver events queued during the load
        tokio::task::yield_now().await;

        let mut documents = Vec::new();
        while let Some(Some(event)) = self.responses.next().now_or_never() {
            if let Some(doc) = document_response(&event) {
                documents.push(doc);
            }
        }
        documents
    }

    /// Post-redirect URL of the page
    pub async fn current_url(&self) -> Option<String> {
        match self.page.url().await {
            Ok(url) => url,
            Err(e) => {
                debug!("Cannot read page URL: {}", e);
                None
            }
        }
    }

    /// Rendered page source
    pub async fn page_source(&self) -> AppResult<String> {
        self.page.content().await.map_err(|e| {
            BrowserError::NavigationFailed {
                url: String::new(),
                source: Box::new(e),
            }
            .into()
        })
    }

    /// Release the browser. A browser we only connected to is left running.
    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            debug!("Closing page failed: {}", e);
        }
        if self.owned {
            if let Err(e) = self.browser.close().await {
                warn!("Closing browser failed: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("Waiting for browser exit failed: {}", e);
            }
        }
        self.handler_task.abort();
    }
}

fn document_response(event: &Arc<EventResponseReceived>) -> Option<DocumentResponse> {
    if event.r#type != ResourceType::Document {
        return None;
    }
    Some(DocumentResponse {
        url: event.response.url.clone(),
        status: u16::try_from(event.response.status).unwrap_or(0),
        mime_type: event.response.mime_type.clone(),
    })
}

/// Pick the response for `final_url`, falling back to the last document seen.
pub fn select_document_response<'a>(
    documents: &'a [DocumentResponse],
    final_url: &str,
) -> Option<&'a DocumentResponse> {
    documents
        .iter()
        .rev()
        .find(|d| d.url == final_url)
        .or_else(|| documents.last())
}
