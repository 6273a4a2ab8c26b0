use anyhow::Context;
use clap::Parser;
use topic_matcher::core::ConfigProvider;
use topic_matcher::utils::{logger, validation::Validate};
use topic_matcher::{handle_solve, CliConfig, MatchingEngine, SeedData, SolverPipeline, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting topic-matcher");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = cli.resolve().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let database_path = config.database_path();
    let store = SqliteStore::open(database_path)
        .with_context(|| format!("failed to open database {}", database_path))?;

    if let Some(seed_path) = &cli.seed {
        tracing::info!("Seeding database from: {}", seed_path);
        let snapshot = SeedData::from_file(seed_path)?.into_snapshot()?;
        store.seed(&snapshot)?;
    }

    let engine = MatchingEngine::new(SolverPipeline::new(store, config));

    if cli.dry_run {
        tracing::info!("DRY RUN - the solver is not called and nothing is written");
        let round = engine.preview().await?;
        println!("{}", serde_json::to_string_pretty(&round.input)?);
        return Ok(());
    }

    let response = handle_solve(&engine).await;
    match &response.json_body {
        Some(result) if response.is_success() => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        _ => {
            eprintln!("❌ Matching round failed (status {})", response.status);
            std::process::exit(1);
        }
    }
}
