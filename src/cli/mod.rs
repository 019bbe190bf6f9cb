//! Command-line surface: argument types and the process-level run sequence.

pub mod types;

pub use types::Cli;

use std::sync::Arc;
use tracing::error;

use crate::adapters::sqlite::{initialize_database, PoolConfig};
use crate::adapters::SqliteRunRepository;
use crate::domain::models::ExitStatus;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::ForensicsService;

/// Exit status for a failed `Cli::try_parse`.
///
/// Help and version requests are successes; anything else is bad arguments.
pub fn parse_failure_status(err: &clap::Error) -> ExitStatus {
    match err.kind() {
        clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => ExitStatus::Success,
        _ => ExitStatus::InvalidArguments,
    }
}

/// Load configuration, start logging, open the registry and run forensics.
pub async fn execute(cli: Cli) -> ExitStatus {
    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Invalid configuration: {err:#}");
            return ExitStatus::InvalidConfiguration;
        }
    };

    let log_config = match LogConfig::try_from(&config.logging) {
        Ok(log_config) => log_config,
        Err(err) => {
            eprintln!("Invalid logging configuration: {err:#}");
            return ExitStatus::InvalidConfiguration;
        }
    };
    // Held until return so buffered file output is flushed
    let _logger = match LoggerImpl::init(&log_config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Logging not initialized: {err:#}");
            None
        }
    };

    // Precondition, checked before the registry is opened
    let run_dir = cli.run_dir_path();
    if !tokio::fs::metadata(run_dir).await.is_ok_and(|metadata| metadata.is_dir()) {
        error!(
            run_id = %cli.run_id,
            run_dir = %run_dir.display(),
            stage = "validate",
            "Run directory not found"
        );
        return ExitStatus::NoRunDirectory;
    }

    let pool = match initialize_database(&config.database.url, Some(PoolConfig::from(&config.database))).await {
        Ok(pool) => pool,
        Err(err) => {
            error!(
                run_id = %cli.run_id,
                run_dir = %cli.run_dir,
                stage = "bootstrap",
                error = %err,
                "Error opening run registry"
            );
            return ExitStatus::ProcessingException;
        }
    };

    let repository = Arc::new(SqliteRunRepository::new(pool.clone()));
    let service = Arc::new(ForensicsService::new(&config, repository.clone(), repository));
    let status = service
        .execute_isolated(cli.run_id.clone(), run_dir.to_path_buf())
        .await;

    pool.close().await;
    status
}
