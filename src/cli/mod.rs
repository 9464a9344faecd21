//! CLI for the persona retrieval engine
//!
//! Subcommands:
//! - `search`: plain cached vector search over the persona catalog
//! - `recommend`: enhanced search (recommendation, then vector search)
//! - `seed`: generate and index the persona catalog

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::{DomainError, SearchRequest};
use crate::infrastructure::logging;

/// Persona retrieval - cached vector search with recommendation-guided queries
#[derive(Parser)]
#[command(name = "persona-retrieval")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search the persona catalog directly
    Search(SearchArgs),

    /// Recommend a persona category first, then search with the composite query
    Recommend(SearchArgs),

    /// Generate personas for the given categories and index them
    Seed(SeedArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Query or prompt text
    pub query: String,

    /// Number of results to return
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Restrict results to a persona category
    #[arg(long)]
    pub category: Option<String>,

    /// Minimum similarity score in [0, 1]
    #[arg(long)]
    pub min_score: Option<f32>,
}

#[derive(Args)]
pub struct SeedArgs {
    /// Categories to generate personas for
    #[arg(required = true)]
    pub categories: Vec<String>,
}

impl SearchArgs {
    fn to_request(&self, config: &AppConfig) -> SearchRequest {
        let mut request = SearchRequest::new(self.query.clone())
            .with_top_k(self.top_k.unwrap_or(config.retrieval.default_top_k))
            .with_min_score(self.min_score.unwrap_or(config.retrieval.default_min_score));

        if let Some(ref category) = self.category {
            request = request.with_filter("category", serde_json::json!(category));
        }

        request
    }
}

/// Load configuration, initialize logging and dispatch the command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()
        .map_err(|e| DomainError::configuration(format!("failed to load configuration: {}", e)))?;

    logging::init_logging(&config.logging);

    match cli.command {
        Command::Search(args) => {
            let engine = crate::create_engine(&config);
            let results = engine.search(args.to_request(&config)).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Recommend(args) => {
            let engine = crate::create_engine(&config);
            let outcome = engine.enhanced_search(args.to_request(&config)).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Seed(args) => {
            let catalog = crate::create_catalog_service(&config);
            let seeds = catalog.seed(&args.categories).await?;
            println!("Seeded {} personas:", seeds.len());
            for seed in seeds {
                println!("  {} ({})", seed.id, seed.category);
            }
        }
    }

    Ok(())
}
