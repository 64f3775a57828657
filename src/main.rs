mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetable::config::AppConfig;
use timetable::db::SqliteBlobStore;
use timetable::services::EnrollmentService;
use timetable::state::AppState;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "timetable=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new_from_env()?;
    debug!("using {:?}", config);

    let blob = SqliteBlobStore::connect(&config.database_url).await?;
    let state = AppState::new(Arc::new(blob), &config).await;
    let service = EnrollmentService::new(state);

    cli::run(cli, &service).await?;

    Ok(())
}
