//! Statistics over the audit logs
//!
//! Access and title-match rates per journal, their distribution, and which
//! candidate URL kind produced the passing articles.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::AppResult;
use crate::models::verdict::percentage;
use crate::models::{read_detail_log, read_summary_log, CandidateLabel, DetailRecord, JournalSummary};

/// Access-rate buckets in display order
pub const BUCKETS: [&str; 6] = ["0%", "0-25%", "25-50%", "50-75%", "75-99%", "100%"];

pub fn bucket(access_rate: f64) -> &'static str {
    if access_rate <= 0.0 {
        BUCKETS[0]
    } else if access_rate < 25.0 {
        BUCKETS[1]
    } else if access_rate < 50.0 {
        BUCKETS[2]
    } else if access_rate < 75.0 {
        BUCKETS[3]
    } else if access_rate < 100.0 {
        BUCKETS[4]
    } else {
        BUCKETS[5]
    }
}

/// Pearson correlation; `None` with fewer than two points or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den_x = 0.0;
    let mut den_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let (dx, dy) = (x - mean_x, y - mean_y);
        num += dx * dy;
        den_x += dx * dx;
        den_y += dy * dy;
    }
    if den_x == 0.0 || den_y == 0.0 {
        return None;
    }
    Some(num / (den_x.sqrt() * den_y.sqrt()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketStats {
    pub label: &'static str,
    pub journals: usize,
    pub avg_correct_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub journals: usize,
    pub articles: usize,
    pub accessible: usize,
    pub correct: usize,
    pub full_access: Vec<JournalSummary>,
    pub zero_access: Vec<JournalSummary>,
    pub buckets: Vec<BucketStats>,
    pub correlation: Option<f64>,
    /// Journals sorted by access rate, highest first
    pub rows: Vec<JournalSummary>,
    /// Passing articles per candidate label; empty without a detail log
    pub pass_labels: BTreeMap<CandidateLabel, usize>,
}

impl Report {
    pub fn build(summaries: &[JournalSummary], detail: &[DetailRecord]) -> Self {
        let articles = summaries.iter().map(|s| s.total).sum();
        let accessible = summaries.iter().map(|s| s.accessible_count).sum();
        let correct = summaries.iter().map(|s| s.correct_count).sum();

        let full_access = summaries
            .iter()
            .filter(|s| s.access_rate() >= 100.0)
            .cloned()
            .collect();
        let zero_access = summaries
            .iter()
            .filter(|s| s.access_rate() <= 0.0)
            .cloned()
            .collect();

        let buckets = BUCKETS
            .iter()
            .map(|&label| {
                let rates: Vec<f64> = summaries
                    .iter()
                    .filter(|s| bucket(s.access_rate()) == label)
                    .map(JournalSummary::correct_rate)
                    .collect();
                let avg_correct_rate = if rates.is_empty() {
                    0.0
                } else {
                    rates.iter().sum::<f64>() / rates.len() as f64
                };
                BucketStats {
                    label,
                    journals: rates.len(),
                    avg_correct_rate,
                }
            })
            .collect();

        let xs: Vec<f64> = summaries.iter().map(JournalSummary::access_rate).collect();
        let ys: Vec<f64> = summaries.iter().map(JournalSummary::correct_rate).collect();

        let mut rows = summaries.to_vec();
        rows.sort_by(|a, b| b.access_rate().total_cmp(&a.access_rate()));

        let mut pass_labels = BTreeMap::new();
        for label in detail
            .iter()
            .filter_map(DetailRecord::as_verdict)
            .filter_map(|v| v.passing_label())
        {
            *pass_labels.entry(label).or_insert(0) += 1;
        }

        Self {
            journals: summaries.len(),
            articles,
            accessible,
            correct,
            full_access,
            zero_access,
            buckets,
            correlation: pearson(&xs, &ys),
            rows,
            pass_labels,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "📊 Overall statistics")?;
        writeln!(out, "{}", "=".repeat(60))?;
        writeln!(out, "Journals: {}", self.journals)?;
        writeln!(out, "Articles: {}", self.articles)?;
        if self.articles > 0 {
            writeln!(
                out,
                "Accessible articles: {} ({:.2}%)",
                self.accessible,
                percentage(self.accessible, self.articles)
            )?;
            writeln!(
                out,
                "Title-matched articles: {} ({:.2}%)",
                self.correct,
                percentage(self.correct, self.articles)
            )?;
        } else {
            writeln!(out, "Accessible articles: {}", self.accessible)?;
            writeln!(out, "Title-matched articles: {}", self.correct)?;
        }

        writeln!(out, "\n✅ Journals with 100% access: {}", self.full_access.len())?;
        for s in &self.full_access {
            writeln!(out, "   - {}\t{} ({} articles)", s.issn, s.journal_name, s.total)?;
        }
        writeln!(out, "\n🚫 Journals with 0% access: {}", self.zero_access.len())?;
        for s in &self.zero_access {
            writeln!(out, "   - {}\t{} ({} articles)", s.issn, s.journal_name, s.total)?;
        }

        writeln!(out, "\n📈 Access rate distribution:")?;
        for b in &self.buckets {
            writeln!(out, "{:>8}: {} journals", b.label, b.journals)?;
        }

        writeln!(out, "\n🔗 Access% vs correct%")?;
        match self.correlation {
            Some(r) => writeln!(out, "Pearson r: {:.4}", r)?,
            None => writeln!(out, "Pearson r: n/a")?,
        }
        writeln!(out, "\n🧮 Average correct% per access bucket:")?;
        for b in &self.buckets {
            writeln!(
                out,
                "{:>8}: journals={:3}, avg correct%={:6.2}",
                b.label, b.journals, b.avg_correct_rate
            )?;
        }

        if !self.pass_labels.is_empty() {
            writeln!(out, "\n🏷️ Passing candidate kinds:")?;
            for (label, count) in &self.pass_labels {
                writeln!(out, "{:>22}: {}", label.as_str(), count)?;
            }
        }

        writeln!(out, "\n📄 Per-journal rates:")?;
        writeln!(
            out,
            "{:<12}\t{:50} {:>6} {:>8} {:>8} {:>10} {:>10}",
            "ISSN", "Journal", "Total", "Access", "Correct", "Access%", "Correct%"
        )?;
        writeln!(out, "{}", "-".repeat(105))?;
        for s in &self.rows {
            let name: String = s.journal_name.chars().take(50).collect();
            writeln!(
                out,
                "{:<12}\t{:50} {:6} {:8} {:8} {:10.2} {:10.2}",
                s.issn,
                name,
                s.total,
                s.accessible_count,
                s.correct_count,
                s.access_rate(),
                s.correct_rate()
            )?;
        }
        Ok(())
    }
}

/// Build the report from the log files. A missing detail log only drops the label counts.
pub async fn load(summary_path: &Path, detail_path: &Path) -> AppResult<Report> {
    let summaries = read_summary_log(summary_path).await?;
    let detail = read_detail_log(detail_path).await?;
    Ok(Report::build(&summaries, &detail))
}
