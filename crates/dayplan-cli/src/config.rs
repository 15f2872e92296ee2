//! Runtime configuration resolved from flags and environment.

use std::path::PathBuf;
use std::sync::Arc;

use dayplan_core::{InMemoryTaskRepository, SqliteTaskRepository, StoreError, TaskRepository};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Where tasks live for this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite(PathBuf),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store: StoreConfig,
    /// Default log directive when `RUST_LOG` is not set.
    pub log_level: &'static str,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let store = if cli.in_memory {
            StoreConfig::InMemory
        } else {
            StoreConfig::Sqlite(cli.db.clone())
        };
        let log_level = match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        Self { store, log_level }
    }

    /// Install the stderr `fmt` subscriber. `RUST_LOG` overrides `-v`.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn open_repository(&self) -> Result<Arc<dyn TaskRepository>, StoreError> {
        match &self.store {
            StoreConfig::Sqlite(path) => {
                tracing::info!(path = %path.display(), "using sqlite store");
                Ok(Arc::new(SqliteTaskRepository::open(path)?))
            }
            StoreConfig::InMemory => {
                tracing::info!("using in-memory store");
                Ok(Arc::new(InMemoryTaskRepository::new()))
            }
        }
    }
}
