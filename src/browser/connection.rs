use std::time::Duration;

use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::{AppError, AppResult, BrowserError};

/// Connect to a browser started with `--remote-debugging-port` and open a fresh page
pub async fn connect_to_browser(port: u16) -> AppResult<(Browser, Page, JoinHandle<()>)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("Connecting to browser: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("Browser connection failed: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("Browser connected");

    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    sleep(Duration::from_millis(300)).await;

    // a dedicated tab keeps the user's pages untouched
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("Cannot create page: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;

    info!("✓ Connected, verification tab opened");
    Ok((browser, page, handler_task))
}
