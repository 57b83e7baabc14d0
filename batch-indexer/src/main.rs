use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use batch_indexer::{AppConfig, Dependencies, IndexingError, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn run() -> Result<(), IndexingError> {
    let config = AppConfig::from_env()?;
    let mut dependencies = Dependencies::new(&config).await?;
    dependencies.orchestrator.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing(LogFormat::from_env());

    info!("Starting batch indexer");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Batch indexer stopped");
            ExitCode::FAILURE
        }
    }
}
