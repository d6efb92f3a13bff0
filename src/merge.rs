//! Merging and citation ranking.
//!
//! Concatenates the three normalized tables, derives `Overall_Citations`
//! (the OpenAlex count where present, otherwise the generic count), and
//! selects the top rows by a stable descending sort so equal scores keep
//! their concatenation order.

use crate::record::{PaperRecord, SourceKind, YearValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Size of the consolidated ranking
pub const TOP_N: usize = 10;

/// Merged row with the derived ranking score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub source: SourceKind,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Authors")]
    pub authors: String,
    #[serde(rename = "Institution")]
    pub institution: String,
    #[serde(rename = "Year")]
    pub year: YearValue,
    #[serde(rename = "Type")]
    pub work_type: Option<String>,
    #[serde(rename = "Citations_OpenAlex")]
    pub citations_openalex: Option<f64>,
    #[serde(rename = "Citations")]
    pub citations: Option<f64>,
    #[serde(rename = "Overall_Citations")]
    pub overall_citations: f64,
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    pub url: Option<String>,
    pub download_pdf: Option<String>,
}

impl From<PaperRecord> for RankedRow {
    fn from(record: PaperRecord) -> Self {
        // Fallback chain: the OpenAlex-named column wins where populated;
        // rows from the other sources fall through to the generic column,
        // and a fully missing pair scores 0.
        let overall_citations = record
            .citations_openalex
            .or(record.citations)
            .unwrap_or(0.0);

        RankedRow {
            source: record.source,
            title: record.title,
            authors: record.authors,
            institution: record.institution,
            year: record.year,
            work_type: record.work_type,
            citations_openalex: record.citations_openalex,
            citations: record.citations,
            overall_citations,
            doi: record.doi,
            url: record.url,
            download_pdf: record.download_pdf,
        }
    }
}

/// Concatenate the three normalized tables in fixed source order
/// (OpenAlex, CrossRef, Semantic Scholar) and derive the ranking score.
pub fn merge(
    openalex: &[PaperRecord],
    crossref: &[PaperRecord],
    semanticscholar: &[PaperRecord],
) -> Vec<RankedRow> {
    openalex
        .iter()
        .chain(crossref.iter())
        .chain(semanticscholar.iter())
        .cloned()
        .map(RankedRow::from)
        .collect()
}

/// Stable descending sort by `Overall_Citations`, truncated to `n` rows.
/// Fewer than `n` rows returns everything, no padding.
pub fn rank_top(mut rows: Vec<RankedRow>, n: usize) -> Vec<RankedRow> {
    rows.sort_by(|a, b| {
        b.overall_citations
            .partial_cmp(&a.overall_citations)
            .unwrap_or(Ordering::Equal)
    });
    rows.truncate(n);
    rows
}
