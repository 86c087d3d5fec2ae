/// Direct PDF download client
///
/// Fetches a PDF outside the browser and turns it into plain text.
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};

pub struct PdfClient {
    http: reqwest::Client,
}

impl PdfClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.pdf_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("pdf client", e))?;
        Ok(Self { http })
    }

    /// Download `url` and extract its text.
    ///
    /// # Returns
    /// `(status, text)`; status 0 on transport failure, empty text on any
    /// non-200 status or empty payload.
    pub async fn fetch_text(&self, url: &str) -> (u16, String) {
        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("PDF request failed {}: {}", url, e);
                return (0, String::new());
            }
        };

        let status = response.status().as_u16();
        if status != 200 {
            return (status, String::new());
        }

        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => (status, extract_pdf_text(bytes.to_vec()).await),
            Ok(_) => (status, String::new()),
            Err(e) => {
                debug!("PDF body read failed {}: {}", url, e);
                (0, String::new())
            }
        }
    }
}

/// Extract text from PDF bytes, falling back to a Latin-1 decode of the raw
/// payload when the document cannot be parsed.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> String {
    let result = tokio::task::spawn_blocking(move || {
        text_or_raw(&bytes, |b| pdf_extract::extract_text_from_mem(b))
    })
    .await;

    result.unwrap_or_else(|e| {
        debug!("PDF text extraction task failed: {}", e);
        String::new()
    })
}

/// Run `extract`; an error or a panic yields the raw Latin-1 text instead.
fn text_or_raw<E, F>(bytes: &[u8], extract: F) -> String
where
    E: std::fmt::Display,
    F: FnOnce(&[u8]) -> Result<String, E>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(|| extract(bytes))) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            debug!("PDF text extraction failed, using raw decode: {}", e);
            latin1_decode(bytes)
        }
        Err(_) => {
            debug!("PDF parser panicked, using raw decode");
            latin1_decode(bytes)
        }
    }
}

fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
