use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use frontend::services::{HttpSearchBackend, SearchBackend, StaticBackend};
use frontend::{AppConfig, TablePage};
use shared::models::{ColumnDescriptor, PageResponse, ValueType};
use tracing::info;
use tracing_subscriber::EnvFilter;

const FIXTURE: &str = include_str!("../assets/fixtures/chegadas.json");

/// Renders one table page as HTML on stdout.
#[derive(Debug, Parser)]
#[command(name = "frontend", version)]
struct Args {
    /// Configuration file replacing the bundled default.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Query the configured API instead of the bundled fixture.
    #[arg(long)]
    live: bool,

    /// Column key sorted after loading.
    #[arg(long, value_name = "COLUMN")]
    sort: Option<String>,

    /// Free-text search sent to the backend.
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,
}

fn catalog() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("processo", "Processo"),
        ColumnDescriptor::new("data_chegada", "Chegada").with_type(ValueType::Date),
        ColumnDescriptor::new("status", "Situação").unsortable(),
    ]
}

async fn preview<B: SearchBackend>(backend: B, config: &AppConfig, args: &Args) -> Result<()> {
    let mut page = TablePage::new("chegadas", backend, config.tables.clone()).with_columns(catalog());

    let outcome = match &args.search {
        Some(text) => page.search_text(text).await,
        None => page.reload().await,
    };
    info!(?outcome, "Page loaded");

    if let Some(column) = &args.sort {
        let state = page.click_header(column).await;
        info!(?state, "Sorted");
    }
    println!("{}", page.table());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_default()?,
    };
    info!(version = %config.version, live = args.live, "Starting table preview");

    if args.live {
        let backend = HttpSearchBackend::new(&config.api, &config.locale)?;
        preview(backend, &config, &args).await
    } else {
        let fixture: PageResponse = serde_json::from_str(FIXTURE).context("Bundled fixture is invalid")?;
        preview(StaticBackend::from_page(fixture), &config, &args).await
    }
}
