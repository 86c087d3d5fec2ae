//! Crossref work items and the article records derived from them

use serde::Deserialize;

/// Journal name used when the registry gives neither a container title nor a publisher
pub const UNKNOWN_JOURNAL: &str = "Unknown Journal";

/// `GET /journals/{issn}/works` response envelope
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorksEnvelope {
    #[serde(default)]
    pub message: Option<WorksMessage>,
}

impl WorksEnvelope {
    pub fn into_items(self) -> Vec<CrossrefWork> {
        self.message.and_then(|m| m.items).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorksMessage {
    #[serde(default)]
    pub items: Option<Vec<CrossrefWork>>,
}

/// One work item, restricted to the selected fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrossrefWork {
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub title: Option<Vec<String>>,
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
    #[serde(default)]
    pub resource: Option<WorkResource>,
    #[serde(rename = "container-title", default)]
    pub container_title: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkResource {
    #[serde(default)]
    pub primary: Option<PrimaryResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrimaryResource {
    #[serde(rename = "URL", default)]
    pub url: Option<String>,
}

/// Article as seen by the verifier
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleRecord {
    pub doi: String,
    pub title: String,
    pub primary_resource_url: Option<String>,
    pub registry_url: Option<String>,
}

impl From<&CrossrefWork> for ArticleRecord {
    fn from(work: &CrossrefWork) -> Self {
        let title = work
            .title
            .as_ref()
            .and_then(|titles| titles.first())
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        let primary_resource_url = work
            .resource
            .as_ref()
            .and_then(|r| r.primary.as_ref())
            .and_then(|p| p.url.as_deref())
            .and_then(non_empty);

        Self {
            doi: work.doi.as_deref().map(str::trim).unwrap_or_default().to_string(),
            title,
            primary_resource_url,
            registry_url: work.url.as_deref().and_then(non_empty),
        }
    }
}

/// Registry-side journal name: first item's container title, then its publisher.
pub fn resolve_journal_name(items: &[CrossrefWork]) -> String {
    let Some(first) = items.first() else {
        return UNKNOWN_JOURNAL.to_string();
    };

    first
        .container_title
        .as_ref()
        .and_then(|titles| titles.first())
        .and_then(|t| non_empty(t))
        .or_else(|| first.publisher.as_deref().and_then(non_empty))
        .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
