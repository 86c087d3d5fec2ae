pub mod browser_session;

pub use browser_session::{select_document_response, BrowserSession, DocumentResponse};
