pub mod audit_log;
pub mod candidate_resolver;
pub mod page_fetcher;
pub mod url_verifier;

pub use audit_log::{AuditLog, JsonlWriter};
pub use candidate_resolver::{build_doi_url, resolve_candidates};
pub use page_fetcher::{BrowserFetcher, FetchResponse, HttpFetcher, PageFetcher};
pub use url_verifier::verify;
