//! Bookmark management CLI commands.

use clap::Subcommand;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Bookmark subcommands.
#[derive(Debug, Subcommand)]
pub enum BookmarkCommands {
    /// List bookmarked car parks
    List,

    /// Add a bookmark, or remove it if already present
    Toggle {
        /// Car park number (e.g., ACB)
        id: String,
    },
}

/// Run a bookmarks subcommand.
pub fn run(runner: &CliRunner, command: BookmarkCommands) -> Result<(), CliError> {
    runner.log_startup("bookmarks");
    match command {
        BookmarkCommands::List => run_list(runner),
        BookmarkCommands::Toggle { id } => run_toggle(runner, &id),
    }
}

fn run_list(runner: &CliRunner) -> Result<(), CliError> {
    let service = runner.create_service()?;
    let facilities = service.bookmarked_facilities()?;

    if facilities.is_empty() {
        println!("No bookmarks");
        return Ok(());
    }

    println!("Bookmarked car parks:");
    for facility in facilities {
        println!("  {:<6} {}", facility.id, facility.address);
    }
    Ok(())
}

fn run_toggle(runner: &CliRunner, id: &str) -> Result<(), CliError> {
    let id = id.trim().to_uppercase();
    let service = runner.create_service()?;

    // Unknown ids can still be removed, but never added
    if !service.preferences().is_bookmarked(&id) {
        let known = service
            .index()
            .find_by_id(&id)
            .map_err(|e| CliError::Service(e.into()))?
            .is_some();
        if !known {
            return Err(CliError::NotFound(id));
        }
    }

    let change = service.toggle_bookmark(&id)?;
    if change.bookmarked {
        println!("Bookmarked {}", change.id);
    } else {
        println!("Removed bookmark {}", change.id);
    }
    Ok(())
}
