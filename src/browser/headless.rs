use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};

/// Launch a browser for link checking and open a blank page
pub async fn launch_browser(config: &Config) -> AppResult<(Browser, Page, JoinHandle<()>)> {
    info!("🚀 Launching browser...");

    let mut builder = BrowserConfig::builder()
        .window_size(1400, 900)
        .request_timeout(Duration::from_secs(config.page_load_timeout_secs.max(1) * 6))
        .args(vec![
            "--no-sandbox",            // sandbox breaks in containers
            "--disable-dev-shm-usage", // small /dev/shm
            "--disable-gpu",
            "--lang=tr-TR",
            "--disable-blink-features=AutomationControlled",
        ]);

    builder = if config.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = config.chrome_executable.as_deref() {
        debug!("Chrome executable: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }

    let browser_config = builder.build().map_err(|message| {
        error!("Browser configuration failed: {}", message);
        BrowserError::ConfigurationFailed { message }
    })?;

    let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
        error!("Browser launch failed: {}", e);
        AppError::browser_launch_failed(e)
    })?;
    debug!("Browser launched");

    // CDP events are pumped in the background
    let handler_task = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // let the browser settle before opening a target
    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("Cannot create page: {}", e);
        BrowserError::PageCreationFailed {
            source: Box::new(e),
        }
    })?;

    info!("✅ Browser ready");
    Ok((browser, page, handler_task))
}
