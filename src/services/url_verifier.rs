//! URL verification service
//!
//! Decides, for one URL and one normalized title, whether the page is
//! reachable and whether it carries the title. Pages served with HTTP 200
//! whose text says "404 Not Found" are reclassified as 404.

use tracing::debug;

use crate::models::Verification;
use crate::services::page_fetcher::PageFetcher;
use crate::utils::text::{is_soft_404, normalize};

pub const INFO_EMPTY_URL: &str = "empty url";
pub const INFO_CONNECTION_ERROR: &str = "connection error";
pub const INFO_EMPTY_BODY: &str = "empty body";
pub const INFO_OK: &str = "200 OK";
pub const INFO_OK_PDF: &str = "200 OK (PDF)";
pub const INFO_SOFT_404: &str = "200 but body contains '404 not found'";
pub const INFO_SOFT_404_PDF: &str = "PDF 200 but body contains '404 not found'";

/// Verify `url` against an already-normalized title.
pub async fn verify<F: PageFetcher + ?Sized>(
    fetcher: &mut F,
    url: &str,
    normalized_title: &str,
) -> Verification {
    if url.is_empty() {
        return Verification::new(0, false, INFO_EMPTY_URL, false);
    }

    let response = fetcher.fetch(url).await;
    if response.is_failure() {
        return Verification::new(0, false, INFO_CONNECTION_ERROR, false);
    }

    let text = normalize(&response.body);

    if response.is_pdf() {
        debug!("PDF payload from {}", response.final_url);
        return if response.status == 200 {
            if is_soft_404(&text) {
                Verification::new(404, false, INFO_SOFT_404_PDF, false)
            } else {
                Verification::new(200, contains_title(&text, normalized_title), INFO_OK_PDF, true)
            }
        } else {
            Verification::new(
                response.status,
                false,
                format!("HTTP {} (PDF)", response.status),
                false,
            )
        };
    }

    if response.body.is_empty() {
        let status = if response.status == 0 { 404 } else { response.status };
        return Verification::new(status, false, INFO_EMPTY_BODY, false);
    }

    // content loaded without a recorded document response
    let status = match response.status {
        0 if is_soft_404(&text) => 404,
        0 => 200,
        status => status,
    };

    if status == 200 {
        if is_soft_404(&text) {
            return Verification::new(404, false, INFO_SOFT_404, false);
        }
        return Verification::new(200, contains_title(&text, normalized_title), INFO_OK, true);
    }

    Verification::new(status, false, format!("HTTP {}", status), false)
}

fn contains_title(text: &str, normalized_title: &str) -> bool {
    !normalized_title.is_empty() && text.contains(normalized_title)
}
