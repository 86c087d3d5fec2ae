//! Candidate URL resolution

use crate::models::{ArticleRecord, Candidate, CandidateLabel};

/// DOI resolver base
pub const DOI_RESOLVER_BASE: &str = "https://doi.org/";

pub fn build_doi_url(doi: &str) -> String {
    let doi = doi.trim();
    if doi.is_empty() {
        String::new()
    } else {
        format!("{}{}", DOI_RESOLVER_BASE, doi)
    }
}

/// Ordered, de-duplicated candidate URLs for an article.
///
/// Priority: primary resource URL, registry URL, DOI resolver URL. Identical
/// URLs collapse into the first candidate; later labels become its aliases.
pub fn resolve_candidates(record: &ArticleRecord) -> Vec<Candidate> {
    let raw = [
        (
            CandidateLabel::PrimaryResource,
            record.primary_resource_url.clone().unwrap_or_default(),
        ),
        (
            CandidateLabel::RegistryUrl,
            record.registry_url.clone().unwrap_or_default(),
        ),
        (CandidateLabel::DoiResolved, build_doi_url(&record.doi)),
    ];

    let mut candidates: Vec<Candidate> = Vec::with_capacity(raw.len());
    for (label, url) in raw {
        if url.is_empty() {
            continue;
        }
        match candidates.iter_mut().find(|c| c.url == url) {
            Some(existing) => existing.alias_labels.push(label),
            None => candidates.push(Candidate {
                label,
                url,
                alias_labels: Vec::new(),
            }),
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(doi: &str, primary: Option<&str>, registry: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            doi: doi.to_string(),
            title: "Sample Title".to_string(),
            primary_resource_url: primary.map(str::to_string),
            registry_url: registry.map(str::to_string),
        }
    }

    #[test]
    fn identical_urls_collapse_into_aliases() {
        let candidates = resolve_candidates(&record("10.1/abc", Some("https://x/y"), Some("https://x/y")));

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].label, CandidateLabel::PrimaryResource);
        assert_eq!(candidates[0].alias_labels, vec![CandidateLabel::RegistryUrl]);
        assert_eq!(candidates[1].label, CandidateLabel::DoiResolved);
        assert_eq!(candidates[1].url, "https://doi.org/10.1/abc");
    }

    #[test]
    fn nothing_to_try_yields_no_candidates() {
        assert!(resolve_candidates(&record("", None, None)).is_empty());
        assert!(resolve_candidates(&record("   ", None, None)).is_empty());
    }

    #[test]
    fn priority_order_is_kept() {
        let candidates = resolve_candidates(&record(
            " 10.1/abc ",
            Some("https://journal.example/article/1"),
            Some("https://dx.doi.org/10.1/abc"),
        ));

        let labels: Vec<_> = candidates.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            vec![
                CandidateLabel::PrimaryResource,
                CandidateLabel::RegistryUrl,
                CandidateLabel::DoiResolved
            ]
        );
        assert!(candidates.iter().all(|c| c.alias_labels.is_empty()));
    }

    #[test]
    fn registry_url_equal_to_doi_url_is_aliased() {
        let candidates =
            resolve_candidates(&record("10.1/abc", None, Some("https://doi.org/10.1/abc")));

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].label, CandidateLabel::RegistryUrl);
        assert_eq!(candidates[0].alias_labels, vec![CandidateLabel::DoiResolved]);
    }
}
