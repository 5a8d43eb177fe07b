//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use parkwhere::availability::FeedError;
use parkwhere::config::{config_file_path, ConfigFileError};
use parkwhere::service::ServiceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Invalid command-line input
    InvalidInput(String),
    /// Failed to create the async runtime
    Runtime(String),
    /// Failed to create service
    ServiceCreation(ServiceError),
    /// Service rejected an operation
    Service(ServiceError),
    /// Availability feed could not be fetched
    Feed(FeedError),
    /// Requested facility is not in the catalog
    NotFound(String),
    /// Reading stdin or writing stdout failed
    Io(std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::InvalidInput(_) => 2,
            CliError::NotFound(_) => 3,
            CliError::Feed(_) => 4,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::ServiceCreation(ServiceError::Catalog(_)) => {
                eprintln!();
                eprintln!("The car park catalog could not be loaded. Check that:");
                eprintln!("  1. [catalog] path in {} points to the dataset", config_file_path().display());
                eprintln!("  2. The file is a JSON array of car park records");
            }
            CliError::Feed(_) => {
                eprintln!();
                eprintln!("The availability feed could not be reached. Check your network");
                eprintln!("connection and the [feed] url setting.");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'parkwhere config show' to see the effective settings.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to start runtime: {}", msg),
            CliError::ServiceCreation(e) => write!(f, "Failed to create service: {}", e),
            CliError::Service(e) => write!(f, "{}", e),
            CliError::Feed(e) => write!(f, "Failed to fetch availability: {}", e),
            CliError::NotFound(id) => write!(f, "Car park '{}' not found in catalog", id),
            CliError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ServiceCreation(e) => Some(e),
            CliError::Service(e) => Some(e),
            CliError::Feed(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(e: ServiceError) -> Self {
        CliError::Service(e)
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Config("bad".into()).exit_code(), 2);
        assert_eq!(CliError::InvalidInput("bad".into()).exit_code(), 2);
        assert_eq!(CliError::NotFound("ACB".into()).exit_code(), 3);
        assert_eq!(CliError::Feed(FeedError::EmptyResponse).exit_code(), 4);
        assert_eq!(CliError::Runtime("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_not_found_message() {
        let err = CliError::NotFound("ACB".into());
        assert_eq!(err.to_string(), "Car park 'ACB' not found in catalog");
    }
}
