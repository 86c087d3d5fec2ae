/// Crossref API client
///
/// Wraps the `journals/{issn}/works` query used to list a journal's articles.
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::models::article::{CrossrefWork, WorksEnvelope};

const SELECT_FIELDS: &str = "DOI,prefix,title,publisher,type,resource,URL,ISSN,created,container-title";

/// Source of article metadata for a journal
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Request URL for `issn` (recorded in the audit log)
    fn endpoint(&self, issn: &str) -> String;

    /// Works of the journal, oldest first
    async fn fetch_works(&self, issn: &str) -> AppResult<Vec<CrossrefWork>>;
}

pub struct CrossrefClient {
    http: reqwest::Client,
    base_url: String,
    rows: usize,
    mailto: Option<String>,
}

impl CrossrefClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| AppError::api_request_failed(config.crossref_api_base.clone(), e))?;

        Ok(Self {
            http,
            base_url: config.crossref_api_base.trim_end_matches('/').to_string(),
            rows: config.crossref_rows,
            mailto: config.crossref_mailto.clone(),
        })
    }
}

#[async_trait]
impl MetadataSource for CrossrefClient {
    fn endpoint(&self, issn: &str) -> String {
        let mut url = format!(
            "{}/journals/{}/works?select={}&rows={}&sort=created&order=asc",
            self.base_url, issn, SELECT_FIELDS, self.rows
        );
        if let Some(mailto) = self.mailto.as_deref() {
            url.push_str("&mailto=");
            url.push_str(mailto);
        }
        url
    }

    async fn fetch_works(&self, issn: &str) -> AppResult<Vec<CrossrefWork>> {
        let endpoint = self.endpoint(issn);
        debug!("Crossref request: {}", endpoint);

        let response = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint,
                status: status.as_u16(),
            }
            .into());
        }

        let envelope: WorksEnvelope =
            response
                .json()
                .await
                .map_err(|e| ApiError::JsonParseFailed {
                    endpoint: endpoint.clone(),
                    source: Box::new(e),
                })?;

        let items = envelope.into_items();
        debug!("Crossref returned {} works for {}", items.len(), issn);
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn config_for(base: &str) -> Config {
        Config {
            crossref_api_base: base.to_string(),
            crossref_rows: 5,
            ..Config::default()
        }
    }

    /// Serve a single request with the given status and body
    fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let base = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || {
            let request = server.recv().expect("request");
            let url = request.url().to_string();
            let _ = request.respond(tiny_http::Response::from_string(body).with_status_code(status));
            url
        });
        (base, handle)
    }

    #[test]
    fn endpoint_carries_query_contract() {
        let mut config = config_for("https://api.crossref.org/");
        config.crossref_mailto = Some("ops@example.org".to_string());
        let client = CrossrefClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint("1234-5678"),
            "https://api.crossref.org/journals/1234-5678/works?select=DOI,prefix,title,publisher,type,resource,URL,ISSN,created,container-title&rows=5&sort=created&order=asc&mailto=ops@example.org"
        );
    }

    #[tokio::test]
    async fn parses_items_from_message() {
        let (base, handle) = serve_once(
            200,
            r#"{"status":"ok","message":{"items":[{"DOI":"10.1/abc","title":["Sample Title"],"container-title":["Journal of Tests"]}]}}"#,
        );
        let client = CrossrefClient::new(&config_for(&base)).unwrap();

        let works = client.fetch_works("1234-5678").await.unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].doi.as_deref(), Some("10.1/abc"));

        let path = handle.join().unwrap();
        assert!(path.starts_with("/journals/1234-5678/works?"));
        assert!(path.contains("sort=created&order=asc"));
    }

    #[tokio::test]
    async fn http_error_is_bad_status() {
        let (base, handle) = serve_once(404, "Resource not found.");
        let client = CrossrefClient::new(&config_for(&base)).unwrap();

        let err = client.fetch_works("0000-0000").await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::BadStatus { status: 404, .. })));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn garbage_body_is_parse_error() {
        let (base, handle) = serve_once(200, "<html>maintenance</html>");
        let client = CrossrefClient::new(&config_for(&base)).unwrap();

        let err = client.fetch_works("1234-5678").await.unwrap_err();
        assert!(matches!(err, AppError::Api(ApiError::JsonParseFailed { .. })));
        handle.join().unwrap();
    }
}
