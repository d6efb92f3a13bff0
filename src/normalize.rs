//! Citation-count normalization.
//!
//! Converts each per-source table into [`PaperRecord`]s, coercing that
//! table's own citation field to a number. Missing, null or unparsable
//! cells become `0`. OpenAlex counts land in `Citations_OpenAlex`; the
//! other two sources use the generic `Citations` column. Columns a source
//! never populates stay `None`, so downstream concatenation keeps those
//! cells missing rather than zero.
//!
//! The typed rows always carry their citation field, so the degenerate
//! case of an entirely absent column (an empty Semantic Scholar result
//! list) is well-defined by construction: an empty table normalizes to an
//! empty table.

use crate::record::{CrossrefRow, OpenAlexRow, PaperRecord, SemanticRow, SourceKind};

pub fn normalize_openalex(rows: Vec<OpenAlexRow>) -> Vec<PaperRecord> {
    rows.into_iter()
        .map(|row| PaperRecord {
            source: SourceKind::OpenAlex,
            title: row.title,
            authors: row.authors,
            institution: row.institution,
            year: row.year,
            work_type: Some(row.work_type),
            citations_openalex: Some(row.citations.coerce()),
            citations: None,
            doi: Some(row.doi),
            url: None,
            download_pdf: None,
        })
        .collect()
}

pub fn normalize_crossref(rows: Vec<CrossrefRow>) -> Vec<PaperRecord> {
    rows.into_iter()
        .map(|row| PaperRecord {
            source: SourceKind::CrossRef,
            title: row.title,
            authors: row.authors,
            institution: row.institution,
            year: row.year,
            work_type: Some(row.work_type),
            citations_openalex: None,
            citations: Some(row.citations.coerce()),
            doi: Some(row.doi),
            url: None,
            download_pdf: None,
        })
        .collect()
}

pub fn normalize_semanticscholar(rows: Vec<SemanticRow>) -> Vec<PaperRecord> {
    rows.into_iter()
        .map(|row| PaperRecord {
            source: SourceKind::SemanticScholar,
            title: row.title,
            authors: row.authors,
            institution: row.institution,
            year: row.year,
            work_type: None,
            citations_openalex: None,
            citations: Some(row.citations.coerce()),
            doi: None,
            url: Some(row.url),
            download_pdf: Some(row.download_pdf),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawCitations, YearValue, NA};
    use serde_json::json;

    fn openalex_row(citations: RawCitations) -> OpenAlexRow {
        OpenAlexRow {
            title: "T".to_string(),
            authors: String::new(),
            institution: String::new(),
            year: YearValue::Number(2020),
            work_type: "journal-article".to_string(),
            citations,
            doi: NA.to_string(),
        }
    }

    #[test]
    fn test_null_openalex_citations_become_zero() {
        let rows = normalize_openalex(vec![
            openalex_row(RawCitations::missing()),
            openalex_row(RawCitations::count(7)),
            openalex_row(RawCitations(Some(json!("bad")))),
        ]);

        let counts: Vec<f64> = rows
            .iter()
            .filter_map(|r| r.citations_openalex)
            .collect();
        assert_eq!(counts, vec![0.0, 7.0, 0.0]);

        // OpenAlex rows never populate the generic column.
        assert!(rows.iter().all(|r| r.citations.is_none()));
        // And the coerced cell is never null or NaN.
        assert!(rows
            .iter()
            .all(|r| r.citations_openalex.is_some_and(|c| c.is_finite() && c >= 0.0)));
    }

    #[test]
    fn test_crossref_uses_generic_column() {
        let rows = normalize_crossref(vec![CrossrefRow {
            title: "C".to_string(),
            authors: String::new(),
            institution: NA.to_string(),
            year: YearValue::na(),
            work_type: NA.to_string(),
            citations: RawCitations::count(3),
            doi: NA.to_string(),
        }]);

        assert_eq!(rows[0].citations, Some(3.0));
        assert!(rows[0].citations_openalex.is_none());
        assert_eq!(rows[0].source, SourceKind::CrossRef);
    }

    #[test]
    fn test_empty_semantic_table_stays_well_defined() {
        assert!(normalize_semanticscholar(Vec::new()).is_empty());
    }

    #[test]
    fn test_semantic_extras_carried() {
        let rows = normalize_semanticscholar(vec![SemanticRow {
            title: "S".to_string(),
            authors: String::new(),
            institution: "ICLR".to_string(),
            year: YearValue::Number(2018),
            citations: RawCitations::count(9),
            url: "u".to_string(),
            download_pdf: "p".to_string(),
        }]);

        assert_eq!(rows[0].url.as_deref(), Some("u"));
        assert_eq!(rows[0].download_pdf.as_deref(), Some("p"));
        assert!(rows[0].work_type.is_none());
        assert!(rows[0].doi.is_none());
    }
}
