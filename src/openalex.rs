//! OpenAlex source adapter.
//!
//! Fetches works matching a free-text query and maps each entry into an
//! [`OpenAlexRow`]. The mapping is a pure function over the raw payload:
//! every field access has an explicit default, so a missing or malformed
//! payload yields an empty row set rather than an error.
//!
//! API notes (per OpenAlex docs):
//! - `mailto` in the user agent gets the polite pool (10 req/s vs 1 req/s)
//! - the search string may carry a trailing country filter, e.g.
//!   `machine learning,countries.sa`

use crate::error::{AssistantError, Result};
use crate::record::{OpenAlexRow, RawCitations, YearValue, NA, UNKNOWN};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

/// OpenAlex API base URL
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

/// Publication type assumed when OpenAlex omits `type`
const DEFAULT_WORK_TYPE: &str = "journal-article";

#[derive(Debug, Default, Deserialize)]
struct WorksResponse {
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OpenAlexWork {
    title: Option<String>,
    doi: Option<String>,
    publication_year: Option<YearValue>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    cited_by_count: RawCitations,
    authorships: Option<Vec<Authorship>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Authorship {
    author: Option<Author>,
    institutions: Option<Vec<Institution>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Author {
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Institution {
    display_name: Option<String>,
}

/// Fetch and map OpenAlex results for a query.
///
/// A fetch failure (network, non-2xx, body parse) is logged and degraded to
/// an empty payload; the caller always gets a row list.
pub async fn query(client: &Client, search: &str, country_filter: Option<&str>) -> Vec<OpenAlexRow> {
    let url = build_search_url(search, country_filter);
    debug!(url = %url, "Fetching OpenAlex works");

    let payload = match fetch(client, &url).await {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "OpenAlex fetch failed, continuing with empty payload");
            Value::Object(Default::default())
        }
    };

    let rows = map_response(&payload);
    info!(count = rows.len(), "Parsed OpenAlex results");
    rows
}

/// Build the works search URL. The optional country filter is appended to
/// the search string itself, matching the OpenAlex `search=` convention.
pub fn build_search_url(search: &str, country_filter: Option<&str>) -> String {
    let search_str = match country_filter {
        Some(filter) => format!("{},{}", search, filter),
        None => search.to_string(),
    };
    format!(
        "{}/works?search={}",
        OPENALEX_API_BASE,
        urlencoding::encode(&search_str)
    )
}

async fn fetch(client: &Client, url: &str) -> Result<Value> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(AssistantError::Api {
            code: status.as_u16() as i32,
            message: format!("OpenAlex API error: {}", status),
        });
    }

    Ok(response.json().await?)
}

/// Map a raw OpenAlex payload into rows. Pure; never fails.
pub fn map_response(payload: &Value) -> Vec<OpenAlexRow> {
    let response: WorksResponse = match serde_json::from_value(payload.clone()) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Unexpected OpenAlex payload shape, treating as empty");
            WorksResponse::default()
        }
    };

    response.results.into_iter().map(map_work).collect()
}

fn map_work(work: OpenAlexWork) -> OpenAlexRow {
    let authorships = work.authorships.unwrap_or_default();

    // One name per authorship; a missing author or display name becomes
    // "Unknown". No authorships at all joins to the empty string.
    let authors = authorships
        .iter()
        .map(|a| {
            a.author
                .as_ref()
                .and_then(|author| author.display_name.clone())
                .unwrap_or_else(|| UNKNOWN.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ");

    // Every institution display name across authorships; an authorship
    // without an institutions key contributes a single "Unknown".
    let mut institutions = Vec::new();
    for authorship in &authorships {
        match &authorship.institutions {
            Some(insts) => {
                for inst in insts {
                    institutions.push(
                        inst.display_name
                            .clone()
                            .unwrap_or_else(|| UNKNOWN.to_string()),
                    );
                }
            }
            None => institutions.push(UNKNOWN.to_string()),
        }
    }
    let institution = institutions.join(", ");

    let doi = work
        .doi
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| NA.to_string());

    OpenAlexRow {
        title: work.title.unwrap_or_else(|| NA.to_string()),
        authors,
        institution,
        year: work.publication_year.unwrap_or_else(YearValue::na),
        work_type: work
            .work_type
            .unwrap_or_else(|| DEFAULT_WORK_TYPE.to_string()),
        citations: work.cited_by_count,
        doi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_search_url() {
        let url = build_search_url("machine learning", None);
        assert!(url.contains("search=machine%20learning"));

        let url = build_search_url("machine learning", Some("countries.sa"));
        assert!(url.contains("machine%20learning%2Ccountries.sa"));
    }

    #[test]
    fn test_map_minimal_work() {
        let payload = json!({
            "results": [{
                "title": "X",
                "cited_by_count": 5,
                "doi": "d1",
                "publication_year": 2020
            }]
        });

        let rows = map_response(&payload);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.title, "X");
        assert_eq!(row.authors, "");
        assert_eq!(row.institution, "");
        assert_eq!(row.year, YearValue::Number(2020));
        assert_eq!(row.work_type, "journal-article");
        assert_eq!(row.citations, RawCitations::count(5));
        assert_eq!(row.doi, "d1");
    }

    #[test]
    fn test_map_empty_payload() {
        assert!(map_response(&json!({})).is_empty());
        assert!(map_response(&json!({"results": []})).is_empty());
        assert!(map_response(&json!("garbage")).is_empty());
    }

    #[test]
    fn test_null_citations_preserved() {
        let payload = json!({
            "results": [{"title": "Y", "cited_by_count": null}]
        });
        let rows = map_response(&payload);
        assert!(rows[0].citations.is_missing());
    }

    #[test]
    fn test_author_and_institution_defaults() {
        let payload = json!({
            "results": [{
                "title": "Z",
                "authorships": [
                    {"author": {"display_name": "Alice"},
                     "institutions": [{"display_name": "KAUST"}, {}]},
                    {"institutions": []},
                    {"author": {}}
                ]
            }]
        });

        let rows = map_response(&payload);
        let row = &rows[0];
        assert_eq!(row.authors, "Alice, Unknown, Unknown");
        // Second authorship has an institutions key (empty list), so it
        // contributes nothing; the third lacks the key entirely.
        assert_eq!(row.institution, "KAUST, Unknown, Unknown");
        assert_eq!(row.doi, "N/A");
        assert!(row.year.is_na());
    }

    #[test]
    fn test_empty_doi_becomes_placeholder() {
        let payload = json!({"results": [{"title": "W", "doi": ""}]});
        let rows = map_response(&payload);
        assert_eq!(rows[0].doi, "N/A");
    }
}
