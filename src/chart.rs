//! Yearly chart aggregation.
//!
//! Groups one source's normalized table by year, producing publication
//! counts and citation sums over a domain restricted to parseable,
//! non-placeholder years, ascending.

use crate::record::{PaperRecord, SourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One point of the per-source yearly series. Both series share the same
/// grouped-by-year partition, so they live on one point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    pub year: i64,
    pub publications: u64,
    pub citations: f64,
}

/// Group a per-source table by year. Rows whose year is the `"N/A"`
/// placeholder or fails numeric coercion are dropped from the domain.
/// The citation sum uses the OpenAlex-specific column for OpenAlex rows
/// and the generic column otherwise.
pub fn aggregate_by_year(rows: &[PaperRecord]) -> Vec<YearPoint> {
    let mut grouped: BTreeMap<i64, (u64, f64)> = BTreeMap::new();

    for row in rows {
        if row.year.is_na() {
            continue;
        }
        let Some(year) = row.year.as_numeric() else {
            continue;
        };

        let cited = match row.source {
            SourceKind::OpenAlex => row.citations_openalex,
            _ => row.citations,
        }
        .unwrap_or(0.0);

        let entry = grouped.entry(year).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += cited;
    }

    grouped
        .into_iter()
        .map(|(year, (publications, citations))| YearPoint {
            year,
            publications,
            citations,
        })
        .collect()
}
