use serde::Deserialize;

/// One entry of the input journal list
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JournalEntry {
    /// Required; a record without it makes the whole list malformed
    pub journal_name: String,
    #[serde(default)]
    pub journal_url: Option<String>,
    #[serde(default)]
    pub issn: Option<String>,
    #[serde(default)]
    pub eissn: Option<String>,
}

impl JournalEntry {
    /// Trimmed source name
    pub fn name(&self) -> &str {
        self.journal_name.trim()
    }

    /// Print ISSN if present, otherwise the e-ISSN
    pub fn chosen_issn(&self) -> Option<&str> {
        [self.issn.as_deref(), self.eissn.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }
}
