//! Search pipeline: fetch, normalize, merge, rank, aggregate.
//!
//! Fetches execute sequentially in fixed order (OpenAlex, then CrossRef,
//! then Semantic Scholar); each source failure was already degraded to an
//! empty payload at the adapter boundary, so the pipeline itself never
//! fails. A degraded (empty or partially empty) result is always
//! preferable to an error.

use crate::chart::{aggregate_by_year, YearPoint};
use crate::error::{AssistantError, Result};
use crate::merge::{self, RankedRow, TOP_N};
use crate::normalize;
use crate::record::PaperRecord;
use crate::{crossref, openalex, semanticscholar};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Contact address for API polite pools
const POLITE_EMAIL: &str = "research-assistant@example.com";

/// Search parameters for one fetch action
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Free-text search string
    pub query: String,
    /// Optional OpenAlex country filter appended to the search string,
    /// e.g. `countries.sa`. `None` means global view.
    #[serde(default)]
    pub region_filter: Option<String>,
}

/// Per-source yearly chart series
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartData {
    pub openalex: Vec<YearPoint>,
    pub crossref: Vec<YearPoint>,
    pub semanticscholar: Vec<YearPoint>,
}

/// Everything one fetch action produces. Held only for the duration of
/// the request/render cycle; nothing here persists.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub openalex: Vec<PaperRecord>,
    pub crossref: Vec<PaperRecord>,
    pub semanticscholar: Vec<PaperRecord>,
    pub top_ranked: Vec<RankedRow>,
    pub charts: ChartData,
}

/// Build the shared HTTP client used by all three adapters.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(format!(
            "research-assistant/0.1 (mailto:{})",
            POLITE_EMAIL
        ))
        .build()
        .map_err(|e| AssistantError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Run the full fetch/normalize/merge/rank/chart pipeline for one query.
pub async fn run_search(client: &Client, params: &SearchParams) -> SearchOutcome {
    info!(
        query = %params.query,
        region = params.region_filter.as_deref().unwrap_or("global"),
        "Starting search pipeline"
    );

    let oa_rows = openalex::query(client, &params.query, params.region_filter.as_deref()).await;
    let cr_rows = crossref::query(client, &params.query).await;
    let ss_rows = semanticscholar::query(client, &params.query).await;

    let openalex = normalize::normalize_openalex(oa_rows);
    let crossref = normalize::normalize_crossref(cr_rows);
    let semanticscholar = normalize::normalize_semanticscholar(ss_rows);

    let merged = merge::merge(&openalex, &crossref, &semanticscholar);
    let top_ranked = merge::rank_top(merged, TOP_N);

    let charts = ChartData {
        openalex: aggregate_by_year(&openalex),
        crossref: aggregate_by_year(&crossref),
        semanticscholar: aggregate_by_year(&semanticscholar),
    };

    info!(
        openalex = openalex.len(),
        crossref = crossref.len(),
        semanticscholar = semanticscholar.len(),
        ranked = top_ranked.len(),
        "Search pipeline complete"
    );

    SearchOutcome {
        openalex,
        crossref,
        semanticscholar,
        top_ranked,
        charts,
    }
}
