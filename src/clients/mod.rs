pub mod crossref_client;
pub mod pdf_client;

pub use crossref_client::{CrossrefClient, MetadataSource};
pub use pdf_client::PdfClient;
