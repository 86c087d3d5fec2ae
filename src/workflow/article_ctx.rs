//! Article processing context
//!
//! Which journal and which position in its work list an article belongs to.

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct ArticleCtx {
    pub issn: String,

    /// Registry-side journal name
    pub journal_name: String,

    /// Name from the input list
    pub source_name: Option<String>,

    /// Position in the API response (1-based)
    pub idx: usize,

    pub total: usize,
}

impl ArticleCtx {
    pub fn new(
        issn: impl Into<String>,
        journal_name: impl Into<String>,
        source_name: Option<String>,
        idx: usize,
        total: usize,
    ) -> Self {
        Self {
            issn: issn.into(),
            journal_name: journal_name.into(),
            source_name,
            idx,
            total,
        }
    }
}

impl Display for ArticleCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[ISSN {} article {}/{}]", self.issn, self.idx, self.total)
    }
}
