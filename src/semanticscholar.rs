//! Semantic Scholar source adapter.
//!
//! Maps entries of the graph search `data` array into [`SemanticRow`]s,
//! skipping null entries. Venue maps to Institution; the row additionally
//! carries the landing URL and an open-access PDF URL.

use crate::error::{AssistantError, Result};
use crate::record::{RawCitations, SemanticRow, YearValue, NA, UNKNOWN};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Semantic Scholar graph API base URL
pub const SS_API_BASE: &str = "https://api.semanticscholar.org/graph/v1";

/// Fields requested from the search endpoint
pub const SEARCH_FIELDS: &str = "title,authors,year,venue,citationCount,url,openAccessPdf";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Option<SsPaper>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SsPaper {
    title: Option<String>,
    authors: Option<Vec<SsAuthor>>,
    year: Option<YearValue>,
    venue: Option<String>,
    #[serde(rename = "citationCount")]
    citation_count: RawCitations,
    url: Option<String>,
    #[serde(rename = "openAccessPdf")]
    open_access_pdf: Option<SsOpenAccessPdf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SsAuthor {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SsOpenAccessPdf {
    url: Option<String>,
}

/// Fetch and map Semantic Scholar results for a query.
///
/// Fetch failures degrade to an empty payload, which maps to an empty row
/// list.
pub async fn query(client: &Client, search: &str) -> Vec<SemanticRow> {
    debug!(query = search, "Fetching Semantic Scholar papers");

    let payload = match fetch(client, search).await {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Semantic Scholar fetch failed, continuing with empty payload");
            Value::Object(Default::default())
        }
    };

    let rows = map_response(&payload);
    info!(count = rows.len(), "Parsed Semantic Scholar results");
    rows
}

async fn fetch(client: &Client, search: &str) -> Result<Value> {
    let url = format!("{}/paper/search", SS_API_BASE);
    let response = client
        .get(&url)
        .query(&[("query", search), ("fields", SEARCH_FIELDS)])
        .send()
        .await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AssistantError::Api {
            code: status.as_u16() as i32,
            message: format!("Semantic Scholar API error: {}", status),
        });
    }

    Ok(response.json().await?)
}

/// Map a raw Semantic Scholar payload into rows, skipping null entries.
/// Pure; never fails.
pub fn map_response(payload: &Value) -> Vec<SemanticRow> {
    let response: SearchResponse = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Unexpected Semantic Scholar payload shape, treating as empty");
            SearchResponse::default()
        }
    };

    response.data.into_iter().flatten().map(map_paper).collect()
}

fn map_paper(paper: SsPaper) -> SemanticRow {
    let authors = paper
        .authors
        .unwrap_or_default()
        .iter()
        .map(|a| a.name.clone().unwrap_or_else(|| UNKNOWN.to_string()))
        .collect::<Vec<_>>()
        .join(", ");

    let citations = if paper.citation_count.is_missing() {
        RawCitations::count(0)
    } else {
        paper.citation_count
    };

    let download_pdf = paper
        .open_access_pdf
        .and_then(|p| p.url)
        .unwrap_or_else(|| NA.to_string());

    SemanticRow {
        title: paper.title.unwrap_or_else(|| NA.to_string()),
        authors,
        institution: paper.venue.unwrap_or_else(|| NA.to_string()),
        year: paper.year.unwrap_or_else(YearValue::na),
        citations,
        url: paper.url.unwrap_or_else(|| NA.to_string()),
        download_pdf,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_entries_skipped() {
        let payload = json!({"data": [null, {"title": "Y", "citationCount": 3}]});
        let rows = map_response(&payload);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Y");
        assert_eq!(rows[0].citations, RawCitations::count(3));
    }

    #[test]
    fn test_empty_payloads() {
        assert!(map_response(&json!({})).is_empty());
        assert!(map_response(&json!({"data": []})).is_empty());
        assert!(map_response(&json!({"data": [null, null]})).is_empty());
    }

    #[test]
    fn test_paper_defaults() {
        let payload = json!({"data": [{}]});
        let rows = map_response(&payload);
        let row = &rows[0];
        assert_eq!(row.title, "N/A");
        assert_eq!(row.authors, "");
        assert_eq!(row.institution, "N/A");
        assert!(row.year.is_na());
        assert_eq!(row.citations, RawCitations::count(0));
        assert_eq!(row.url, "N/A");
        assert_eq!(row.download_pdf, "N/A");
    }

    #[test]
    fn test_full_paper() {
        let payload = json!({
            "data": [{
                "title": "Graph Attention",
                "authors": [{"name": "Petar V."}, {}],
                "year": 2018,
                "venue": "ICLR",
                "citationCount": 900,
                "url": "https://example.org/p",
                "openAccessPdf": {"url": "https://example.org/p.pdf"}
            }]
        });

        let rows = map_response(&payload);
        let row = &rows[0];
        assert_eq!(row.authors, "Petar V., Unknown");
        assert_eq!(row.institution, "ICLR");
        assert_eq!(row.year, YearValue::Number(2018));
        assert_eq!(row.url, "https://example.org/p");
        assert_eq!(row.download_pdf, "https://example.org/p.pdf");
    }

    #[test]
    fn test_open_access_pdf_null() {
        let payload = json!({"data": [{"title": "T", "openAccessPdf": null}]});
        let rows = map_response(&payload);
        assert_eq!(rows[0].download_pdf, "N/A");
    }
}
