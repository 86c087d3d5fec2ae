//! Page fetch adapters - service layer
//!
//! Turn a URL into `(status, body, final URL, content type)`. The browser
//! adapter reads the status from the network log of the shared session; the
//! HTTP adapter is a plain GET. Both hand PDF payloads to [`PdfClient`] and
//! report the extracted text as the body.
//!
//! Fetch adapters never fail: any transport or automation error becomes
//! [`FetchResponse::failed`], status 0 with everything empty.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::clients::pdf_client::{extract_pdf_text, PdfClient};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::{select_document_response, BrowserSession, DocumentResponse};
use crate::models::FetcherKind;

const PDF_MIME: &str = "application/pdf";

/// Raw result of loading a URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    /// Document status, 0 when unknown
    pub status: u16,
    pub body: String,
    pub final_url: String,
    pub content_type: String,
}

impl FetchResponse {
    pub fn failed() -> Self {
        Self::default()
    }

    /// No status, no body, no URL: the fetch did not happen at all.
    pub fn is_failure(&self) -> bool {
        self.status == 0 && self.body.is_empty() && self.final_url.is_empty()
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_payload(&self.content_type, &self.final_url)
    }
}

pub fn is_pdf_payload(content_type: &str, url: &str) -> bool {
    content_type.to_lowercase().contains(PDF_MIME) || url.to_lowercase().ends_with(".pdf")
}

/// Status reported for a PDF: direct fetch status, then the navigation status, then 200.
fn pdf_status(direct: u16, navigation: u16) -> u16 {
    if direct != 0 {
        direct
    } else if navigation != 0 {
        navigation
    } else {
        200
    }
}

/// Fetch capability used by the URL verifier
#[async_trait]
pub trait PageFetcher: Send {
    fn kind(&self) -> FetcherKind;

    async fn fetch(&mut self, url: &str) -> FetchResponse;
}

/// Browser-backed fetcher
pub struct BrowserFetcher {
    session: BrowserSession,
    pdf: PdfClient,
    page_load_timeout: Duration,
}

impl BrowserFetcher {
    pub fn new(session: BrowserSession, pdf: PdfClient, config: &Config) -> Self {
        Self {
            session,
            pdf,
            page_load_timeout: Duration::from_secs(config.page_load_timeout_secs),
        }
    }

    /// Release the browser session
    pub async fn shutdown(self) {
        self.session.close().await;
    }

    async fn fetch_pdf(&self, final_url: &str, navigation_status: u16) -> FetchResponse {
        debug!("PDF payload, fetching directly: {}", final_url);
        let (direct_status, text) = self.pdf.fetch_text(final_url).await;
        FetchResponse {
            status: pdf_status(direct_status, navigation_status),
            body: text,
            final_url: final_url.to_string(),
            content_type: PDF_MIME.to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn kind(&self) -> FetcherKind {
        FetcherKind::Browser
    }

    async fn fetch(&mut self, url: &str) -> FetchResponse {
        if url.is_empty() {
            return FetchResponse::failed();
        }

        // stale entries from the previous URL would leak into this lookup
        self.session.drain_network_log();

        let navigation = self.session.navigate(url, self.page_load_timeout).await;
        if let Err(e) = &navigation {
            debug!("Navigation failed: {}", e);
        }
        let documents = self.session.document_responses().await;
        let current_url = match navigation {
            Ok(()) => Some(self.session.current_url().await),
            Err(_) => None,
        };

        match plan_fetch(url, current_url, &documents) {
            FetchPlan::Pdf {
                url,
                navigation_status,
            } => self.fetch_pdf(&url, navigation_status).await,
            FetchPlan::Page {
                status,
                final_url,
                content_type,
            } => match self.session.page_source().await {
                Ok(body) => FetchResponse {
                    status,
                    body,
                    final_url,
                    content_type,
                },
                Err(e) => {
                    debug!("Cannot read page source: {}", e);
                    FetchResponse::failed()
                }
            },
            FetchPlan::Failed => FetchResponse::failed(),
        }
    }
}

/// What to do with a finished navigation
#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchPlan {
    /// Download the PDF directly
    Pdf { url: String, navigation_status: u16 },
    /// Read the rendered page source
    Page {
        status: u16,
        final_url: String,
        content_type: String,
    },
    Failed,
}

/// Decide how to finish a browser fetch
///
/// # Arguments
/// - `requested_url`: URL passed to the navigation
/// - `current_url`: `None` when the navigation failed, otherwise the page URL
///   as reported by the browser (which may itself be unknown)
/// - `documents`: document responses recorded during this navigation
fn plan_fetch(
    requested_url: &str,
    current_url: Option<Option<String>>,
    documents: &[DocumentResponse],
) -> FetchPlan {
    let Some(current_url) = current_url else {
        // headless Chromium aborts navigations that end in a download
        return match documents
            .iter()
            .rev()
            .find(|d| is_pdf_payload(&d.mime_type, &d.url))
        {
            Some(pdf) => FetchPlan::Pdf {
                url: pdf.url.clone(),
                navigation_status: pdf.status,
            },
            None => FetchPlan::Failed,
        };
    };

    let final_url = current_url
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| requested_url.to_string());

    let (status, mime_type) = select_document_response(documents, &final_url)
        .map(|d| (d.status, d.mime_type.clone()))
        .unwrap_or_default();

    if is_pdf_payload(&mime_type, &final_url) {
        return FetchPlan::Pdf {
            url: final_url,
            navigation_status: status,
        };
    }

    FetchPlan::Page {
        status,
        final_url,
        content_type: mime_type,
    }
}

/// Plain HTTP fetcher (no JavaScript, no browser)
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.page_load_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed("http fetcher", e))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn kind(&self) -> FetcherKind {
        FetcherKind::Http
    }

    async fn fetch(&mut self, url: &str) -> FetchResponse {
        if url.is_empty() {
            return FetchResponse::failed();
        }

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("HTTP fetch failed {}: {}", url, e);
                return FetchResponse::failed();
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if is_pdf_payload(&content_type, &final_url) {
            let body = match response.bytes().await {
                Ok(bytes) if status == 200 && !bytes.is_empty() => {
                    extract_pdf_text(bytes.to_vec()).await
                }
                _ => String::new(),
            };
            return FetchResponse {
                status: pdf_status(status, 0),
                body,
                final_url,
                content_type: PDF_MIME.to_string(),
            };
        }

        let body = response.text().await.unwrap_or_default();
        FetchResponse {
            status,
            body,
            final_url,
            content_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn serve(
        routes: Vec<(&'static str, u16, &'static str, &'static str)>,
        requests: usize,
    ) -> (String, thread::JoinHandle<()>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            for _ in 0..requests {
                let Ok(request) = server.recv() else { break };
                let path = request.url().to_string();
                let (status, content_type, body) = routes
                    .iter()
                    .find(|(p, ..)| *p == path)
                    .map(|(_, s, c, b)| (*s, *c, *b))
                    .unwrap_or((404, "text/html", "<h1>Not Found</h1>"));
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes())
                        .expect("header");
                let _ = request.respond(
                    tiny_http::Response::from_string(body)
                        .with_status_code(status)
                        .with_header(header),
                );
            }
        });
        (base, handle)
    }

    #[test]
    fn pdf_detection_uses_mime_or_extension() {
        assert!(is_pdf_payload("application/pdf; charset=binary", "https://x/view"));
        assert!(is_pdf_payload("", "https://x/article/FILE.PDF"));
        assert!(!is_pdf_payload("text/html", "https://x/article/1"));
    }

    #[test]
    fn pdf_status_falls_back_in_order() {
        assert_eq!(pdf_status(404, 200), 404);
        assert_eq!(pdf_status(0, 403), 403);
        assert_eq!(pdf_status(0, 0), 200);
    }

    fn doc(url: &str, status: u16, mime: &str) -> DocumentResponse {
        DocumentResponse {
            url: url.to_string(),
            status,
            mime_type: mime.to_string(),
        }
    }

    const ARTICLE: &str = "https://journal.example/article/1";

    #[test]
    fn html_page_takes_status_of_final_document() {
        let docs = vec![
            doc("https://doi.org/10.1/abc", 302, "text/html"),
            doc(ARTICLE, 200, "text/html"),
        ];
        assert_eq!(
            plan_fetch("https://doi.org/10.1/abc", Some(Some(ARTICLE.to_string())), &docs),
            FetchPlan::Page {
                status: 200,
                final_url: ARTICLE.to_string(),
                content_type: "text/html".to_string(),
            }
        );
    }

    #[test]
    fn unknown_page_url_falls_back_to_requested_url() {
        let plan = plan_fetch(ARTICLE, Some(None), &[]);
        assert_eq!(
            plan,
            FetchPlan::Page {
                status: 0,
                final_url: ARTICLE.to_string(),
                content_type: String::new(),
            }
        );
        assert_eq!(
            plan_fetch(ARTICLE, Some(Some(String::new())), &[doc(ARTICLE, 404, "text/html")]),
            FetchPlan::Page {
                status: 404,
                final_url: ARTICLE.to_string(),
                content_type: "text/html".to_string(),
            }
        );
    }

    #[test]
    fn pdf_document_is_fetched_directly() {
        // by MIME type
        let docs = vec![doc("https://journal.example/download/1", 200, "application/pdf")];
        assert_eq!(
            plan_fetch(ARTICLE, Some(Some("https://journal.example/download/1".to_string())), &docs),
            FetchPlan::Pdf {
                url: "https://journal.example/download/1".to_string(),
                navigation_status: 200,
            }
        );

        // by extension, without a recorded response
        assert_eq!(
            plan_fetch(ARTICLE, Some(Some("https://journal.example/1.pdf".to_string())), &[]),
            FetchPlan::Pdf {
                url: "https://journal.example/1.pdf".to_string(),
                navigation_status: 0,
            }
        );
    }

    #[test]
    fn aborted_navigation_is_rescued_by_pdf_response() {
        let docs = vec![
            doc(ARTICLE, 302, "text/html"),
            doc("https://journal.example/files/1.pdf", 200, "application/octet-stream"),
        ];
        assert_eq!(
            plan_fetch(ARTICLE, None, &docs),
            FetchPlan::Pdf {
                url: "https://journal.example/files/1.pdf".to_string(),
                navigation_status: 200,
            }
        );
    }

    #[test]
    fn aborted_navigation_without_pdf_fails() {
        assert_eq!(plan_fetch(ARTICLE, None, &[]), FetchPlan::Failed);
        assert_eq!(
            plan_fetch(ARTICLE, None, &[doc(ARTICLE, 500, "text/html")]),
            FetchPlan::Failed
        );
    }

    #[test]
    fn failure_means_nothing_came_back() {
        assert!(FetchResponse::failed().is_failure());
        let soft = FetchResponse {
            status: 0,
            body: "<html></html>".to_string(),
            final_url: "https://x/".to_string(),
            content_type: String::new(),
        };
        assert!(!soft.is_failure());
    }

    #[tokio::test]
    async fn http_fetcher_reports_status_body_and_type() {
        let (base, handle) = serve(
            vec![("/article/1", 200, "text/html; charset=utf-8", "<h1>Sample Title</h1>")],
            2,
        );
        let mut fetcher = HttpFetcher::new(&Config::default()).unwrap();

        let page = fetcher.fetch(&format!("{base}/article/1")).await;
        assert_eq!(page.status, 200);
        assert!(page.body.contains("Sample Title"));
        assert!(page.content_type.starts_with("text/html"));
        assert_eq!(page.final_url, format!("{base}/article/1"));

        let missing = fetcher.fetch(&format!("{base}/article/2")).await;
        assert_eq!(missing.status, 404);
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn http_fetcher_routes_pdf_through_text_extraction() {
        let (base, handle) = serve(vec![("/files/1.pdf", 200, "application/pdf", "%PDF-broken Sample Title")], 1);
        let mut fetcher = HttpFetcher::new(&Config::default()).unwrap();

        let page = fetcher.fetch(&format!("{base}/files/1.pdf")).await;
        assert!(page.is_pdf());
        assert_eq!(page.status, 200);
        assert!(page.body.contains("Sample Title"));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_is_total_failure() {
        let mut fetcher = HttpFetcher::new(&Config::default()).unwrap();
        assert!(fetcher.fetch("http://127.0.0.1:1/").await.is_failure());
        assert!(fetcher.fetch("").await.is_failure());
    }
}
