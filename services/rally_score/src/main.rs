use anyhow::{Context, Result};
use clap::{Parser as _, Subcommand};
use dotenv::dotenv;
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rally_score::{
    config::ServerConfig,
    metrics::MetricsCollector,
    store::MatchStore,
    web::{self, AppState},
    Parser,
};

#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the scorekeeping client, the API and the match list
    Serve {
        /// Address to listen on, e.g. localhost:8080
        #[arg(short, long)]
        listen: Option<String>,
        /// SQLite database URL
        #[arg(short, long)]
        database: Option<String>,
    },
    /// Validate a match document and print it with its statistics
    Check {
        /// Path to the JSON document
        #[arg(short, long)]
        file: PathBuf,
    },
}

async fn serve(mut config: ServerConfig, listen: Option<String>, database: Option<String>) -> Result<()> {
    if let Some(listen) = listen {
        config.listen_addr = listen;
    }
    if let Some(database) = database {
        config.database.url = database;
    }

    let store = MatchStore::connect(&config.database)
        .await
        .with_context(|| format!("Could not open database {}", config.database.url))?;

    let state = AppState {
        store,
        parser: Arc::new(Parser::new()),
        metrics: MetricsCollector::new(),
        config: Arc::new(config),
    };
    web::serve(state).await?;
    Ok(())
}

fn check(file: PathBuf) -> Result<()> {
    let raw = fs::read(&file).with_context(|| format!("Could not read {:?}", file))?;
    info!("Checking {:?}", file);

    let validated = rally_score::parse(&raw).with_context(|| format!("{:?} was rejected", file))?;
    println!("{}", serde_json::to_string_pretty(&validated)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_env();

    match cli.command {
        Commands::Serve { listen, database } => serve(config, listen, database).await?,
        Commands::Check { file } => check(file)?,
    }

    Ok(())
}
