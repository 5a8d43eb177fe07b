//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading, logging initialization, runtime creation and
//! service construction to reduce duplication across command handlers.

use tokio::runtime::Runtime;
use tracing::info;

use parkwhere::config::ConfigFile;
use parkwhere::logging::{init_logging, LoggingGuard, LoggingOptions};
use parkwhere::service::{ParkWhereService, ServiceBuilder};

use crate::error::CliError;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Keeps the file writer alive while the runner exists
    _logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, initialize logging and start the async runtime.
    ///
    /// * `debug_mode` - enables debug-level logging regardless of RUST_LOG
    /// * `verbose` - mirrors log output to stderr
    pub fn new(debug_mode: bool, verbose: bool) -> Result<Self, CliError> {
        // Missing file means defaults
        let config = ConfigFile::load()?;

        let logging_guard = init_logging(
            &config.logging.file,
            LoggingOptions {
                debug: debug_mode,
                console: verbose,
            },
        )
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("parkwhere-worker")
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("ParkWhere v{}", parkwhere::VERSION);
        info!("ParkWhere CLI: {} command", command);
    }

    /// Build the service from the loaded configuration.
    pub fn create_service(&self) -> Result<ParkWhereService, CliError> {
        let service = ServiceBuilder::from_config(&self.config)
            .and_then(|builder| builder.with_runtime(self.runtime.handle().clone()).build())
            .map_err(CliError::ServiceCreation)?;
        info!("Service created successfully");
        Ok(service)
    }
}
