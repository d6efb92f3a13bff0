//! # research-assistant
//!
//! Multi-Source Bibliometric Research Assistant
//!
//! ## Modules
//!
//! - [`openalex`] - OpenAlex works API client
//! - [`crossref`] - CrossRef works API client
//! - [`semanticscholar`] - Semantic Scholar graph API client
//! - [`normalize`] - Per-source row normalization
//! - [`merge`] - Cross-source merge and citation ranking
//! - [`chart`] - Publication/citation trend aggregation
//! - [`archive`] - SQLite research archive
//! - [`gemini`] - Gemini streaming client for PDF analysis
//! - [`session`] - PDF chat session state
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use research_assistant::pipeline::{self, SearchParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = pipeline::build_client()?;
//!     let params = SearchParams {
//!         query: "machine learning".to_string(),
//!         region_filter: None,
//!     };
//!     let outcome = pipeline::run_search(&client, &params).await;
//!     println!("Top papers: {}", outcome.top_ranked.len());
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod chart;
pub mod crossref;
pub mod error;
pub mod gemini;
pub mod merge;
pub mod normalize;
pub mod openalex;
pub mod pipeline;
pub mod prompts;
pub mod record;
pub mod semanticscholar;
pub mod session;

pub use error::{AssistantError, Result};
