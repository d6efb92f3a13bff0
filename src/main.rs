//! research-assistant - Multi-Source Bibliometric Research Assistant
//!
//! Queries OpenAlex, CrossRef and Semantic Scholar, merges and ranks the
//! results by citations, and chats about uploaded papers via Gemini.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! research-assistant search "machine learning" --region countries.sa
//! research-assistant analyze paper.pdf --question "What is the sample size?"
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! research-assistant serve --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use research_assistant::archive::{self, Archive, ArchiveRecord};
use research_assistant::gemini::{GeminiClient, DEFAULT_MODEL};
use research_assistant::pipeline::{self, SearchOutcome, SearchParams};
use research_assistant::prompts;
use research_assistant::session::{self, Session};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Multi-Source Bibliometric Research Assistant
#[derive(Parser)]
#[command(name = "research-assistant")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch research data from all sources and rank by citations
    Search {
        /// Search keywords
        query: String,

        /// OpenAlex region filter (e.g., "countries.sa"); omit for global view
        #[arg(long)]
        region: Option<String>,

        /// Output directory for CSV exports
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Append the ranked top 10 to the research archive
        #[arg(long)]
        archive: bool,

        /// Archive database file (default: ~/.research_archive.db)
        #[arg(long)]
        archive_path: Option<PathBuf>,
    },

    /// Analyze a research paper PDF with Gemini
    Analyze {
        /// Path to the PDF file
        pdf: PathBuf,

        /// Follow-up question asked after the initial analysis
        #[arg(short, long)]
        question: Option<String>,

        /// Gemini model id
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },

    /// List archived research data
    Archive {
        /// Archive database file (default: ~/.research_archive.db)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Search {
            query,
            region,
            output,
            archive,
            archive_path,
        } => run_search_cmd(query, region, output, archive, archive_path).await,
        Commands::Analyze {
            pdf,
            question,
            model,
        } => run_analyze_cmd(pdf, question, model).await,
        Commands::Archive { path } => list_archive(path),
        Commands::Serve { port, host } => run_server(host, port).await,
    }
}

// ============================================================================
// Search Command
// ============================================================================

async fn run_search_cmd(
    query: String,
    region: Option<String>,
    output_dir: PathBuf,
    archive: bool,
    archive_path: Option<PathBuf>,
) -> Result<()> {
    let client = pipeline::build_client()?;
    let params = SearchParams {
        query: query.clone(),
        region_filter: region,
    };

    let outcome = pipeline::run_search(&client, &params).await;

    println!(
        "OpenAlex: {} | CrossRef: {} | Semantic Scholar: {}",
        outcome.openalex.len(),
        outcome.crossref.len(),
        outcome.semanticscholar.len()
    );
    println!("Consolidated top 10: {} rows", outcome.top_ranked.len());

    // Create output folder
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let safe_keyword: String = query
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .replace(' ', "_");
    let output_folder = output_dir.join(format!("{}_{}", timestamp, safe_keyword));
    std::fs::create_dir_all(&output_folder).context("Failed to create output directory")?;

    save_csv(&output_folder.join("openalex.csv"), &outcome.openalex)?;
    save_csv(&output_folder.join("crossref.csv"), &outcome.crossref)?;
    save_csv(
        &output_folder.join("semanticscholar.csv"),
        &outcome.semanticscholar,
    )?;
    save_csv(&output_folder.join("top10.csv"), &outcome.top_ranked)?;

    if archive {
        let path = archive_path.unwrap_or_else(archive::default_path);
        let store = Archive::open(&path)?;
        let written = store.append_all(&outcome.top_ranked)?;
        println!("Archived {} rows to {:?}", written, path);
    }

    Ok(())
}

/// Save data to CSV file
fn save_csv<T: Serialize>(path: &Path, data: &[T]) -> Result<()> {
    if data.is_empty() {
        println!("No data to save to {:?}", path);
        return Ok(());
    }

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context("Failed to create CSV writer")?;

    for item in data {
        wtr.serialize(item).context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV")?;
    println!("Saved: {:?}", path);
    Ok(())
}

// ============================================================================
// Analyze Command
// ============================================================================

async fn run_analyze_cmd(pdf: PathBuf, question: Option<String>, model: String) -> Result<()> {
    let bytes = std::fs::read(&pdf).with_context(|| format!("Failed to read {:?}", pdf))?;
    let gemini = GeminiClient::from_env(Some(model))?;

    let mut chat = Session::new();
    chat.begin_analysis(session::encode_pdf(&bytes));
    let pdf_content = chat.pdf_content.clone().unwrap_or_default();

    println!("--- Analysis ---");
    let (tx, rx) = mpsc::channel::<String>(32);
    let printer = tokio::spawn(print_chunks(rx));
    let notes = gemini
        .analyze_pdf(&pdf_content, prompts::RESEARCH_PAPER, tx)
        .await?;
    printer.await.context("Printer task failed")?;
    chat.record_notes(notes);

    if let Some(query) = question {
        println!("\n--- Answer ---");
        chat.push_user(query.clone());
        let prompt = prompts::build_followup_prompt(chat.notes_or_empty(), &query);

        let (tx, rx) = mpsc::channel::<String>(32);
        let printer = tokio::spawn(print_chunks(rx));
        gemini.follow_up(&pdf_content, &prompt, tx).await;
        printer.await.context("Printer task failed")?;
    }

    println!();
    Ok(())
}

async fn print_chunks(mut rx: mpsc::Receiver<String>) {
    use std::io::Write;
    while let Some(chunk) = rx.recv().await {
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }
}

// ============================================================================
// Archive Command
// ============================================================================

fn list_archive(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(archive::default_path);
    let store = Archive::open(&path)?;
    let records = store.list()?;

    if records.is_empty() {
        println!("Archive is empty ({:?})", path);
        return Ok(());
    }

    for r in &records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            r.id, r.title, r.authors, r.year, r.work_type, r.citations, r.doi
        );
    }
    println!("{} archived records", records.len());
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

struct AppState {
    client: reqwest::Client,
    archive_path: PathBuf,
}

async fn run_server(host: String, port: u16) -> Result<()> {
    info!(host = %host, port = port, "Starting HTTP server");

    let app_state = Arc::new(AppState {
        client: pipeline::build_client()?,
        archive_path: archive::default_path(),
    });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/search", post(search_handler))
        .route("/archive", get(archive_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Search response
#[derive(Debug, Serialize)]
struct SearchResponse {
    status: String,
    #[serde(flatten)]
    outcome: SearchOutcome,
}

/// Search endpoint handler
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> Json<SearchResponse> {
    info!(query = %params.query, region = ?params.region_filter, "Search request");

    let outcome = pipeline::run_search(&state.client, &params).await;
    Json(SearchResponse {
        status: "success".to_string(),
        outcome,
    })
}

/// Archive listing response
#[derive(Debug, Serialize)]
struct ArchiveResponse {
    status: String,
    count: usize,
    records: Vec<ArchiveRecord>,
}

/// Archive listing handler
async fn archive_handler(State(state): State<Arc<AppState>>) -> Json<ArchiveResponse> {
    match Archive::open(&state.archive_path).and_then(|store| store.list()) {
        Ok(records) => Json(ArchiveResponse {
            status: "success".to_string(),
            count: records.len(),
            records,
        }),
        Err(e) => {
            error!(error = %e, "Archive read failed");
            Json(ArchiveResponse {
                status: format!("error: {}", e),
                count: 0,
                records: vec![],
            })
        }
    }
}
