use anyhow::{Context, Result};
use clap::Parser;
use sastojci::config::SeedConfig;
use sastojci::db::{self, PgStore};
use sastojci::ingredient_parser::parse_ingredient_lines;
use sastojci::memory_store::MemoryStore;
use sastojci::seed_data::SeedData;
use sastojci::seeder::{run_seed, SeedReport};
use sqlx::PgPool;
use std::path::PathBuf;
use tracing::{debug, error, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first, so --help works without logs
    let args = Args::parse();

    // RUST_LOG wins over the verbosity flags
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_level()));
    if args.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    debug!(?args, "CLI arguments parsed");

    match args.command {
        Command::Parse { lines, pretty } => print_parsed(&lines, pretty),
        Command::Seed { data, dry_run } => {
            let config = SeedConfig::from_env()?;
            seed(&config, data, dry_run).await
        }
    }
}

fn print_parsed(lines: &[String], pretty: bool) -> Result<()> {
    let parsed = parse_ingredient_lines(lines);
    let json = if pretty {
        serde_json::to_string_pretty(&parsed)?
    } else {
        serde_json::to_string(&parsed)?
    };
    println!("{}", json);
    Ok(())
}

async fn seed(config: &SeedConfig, data_path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let data = match data_path.or_else(|| config.data_path.clone()) {
        Some(path) => {
            info!(path = %path.display(), "Loading seed data");
            SeedData::from_path(&path)?
        }
        None => SeedData::builtin().context("Built-in seed data is broken")?,
    };

    if dry_run {
        info!("Dry run, nothing is written to the database");
        let store = MemoryStore::new();
        let report = run_seed(&store, &data).await?;
        print_report(&report)?;
        return Ok(());
    }

    let pool = db::connect(config.database_url()?, config.max_connections).await?;

    let result = seed_database(&pool, &data).await;

    // The pool is closed whether the run succeeded or not
    pool.close().await;

    match result {
        Ok(report) => print_report(&report),
        Err(e) => {
            error!("Seed run failed: {:#}", e);
            Err(e)
        }
    }
}

async fn seed_database(pool: &PgPool, data: &SeedData) -> Result<SeedReport> {
    db::init_database_schema(pool).await?;
    let store = PgStore::new(pool.clone());
    run_seed(&store, data).await
}

fn print_report(report: &SeedReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
