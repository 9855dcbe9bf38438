//! Folio CLI binary.
//!
//! Records live in a JSON file and compiled documents in an output directory, both
//! taken from the configuration. Generation commands need the API key named in
//! `[model] api_key_env`, which may be set in a `.env` file.

use clap::Parser;
use folio::{
    FileSystemArtifactStorage, FolioConfig, JsonFileRepository, ObservabilityConfig, Pipeline,
    TextGenerator, init_observability,
};
use std::sync::Arc;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, OfflineGenerator, execute};

    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FolioConfig::from_file(path)?,
        None => FolioConfig::load()?,
    };

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    init_observability(
        &ObservabilityConfig::new(log_level).with_json_logs(cli.json_logs || config.logging.json),
    )?;

    let generator: Arc<dyn TextGenerator> = if cli.command.generates() {
        Arc::new(config.text_generator()?)
    } else {
        Arc::new(OfflineGenerator::new(config.model.api_key_env.clone()))
    };
    let repository = Arc::new(JsonFileRepository::open(&config.paths.store).await?);
    let storage = Arc::new(FileSystemArtifactStorage::new(&config.paths.output_dir)?);

    let pipeline = Pipeline::new(generator, repository, storage)
        .with_notifier(config.notifier())
        .with_settings(config.generation.clone())
        .with_decomposer(config.outline.clone());

    execute(cli.command, &pipeline).await?;

    Ok(())
}
