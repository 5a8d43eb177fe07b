//! Search command - one-shot nearby search around a point.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use parkwhere::presentation::{format_distance, join_availability};
use parkwhere::refresh::FetchOutcome;
use parkwhere::search::NearbySearchEngine;

use super::common::{parse_point, parse_radius, print_entries};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the search command.
pub struct SearchArgs {
    pub lat: f64,
    pub lon: f64,
    /// Overrides the saved radius for this search only.
    pub radius: Option<f64>,
    /// Fetch availability once and show it next to each result.
    pub live: bool,
}

/// Run the search command.
pub fn run(runner: &CliRunner, args: SearchArgs) -> Result<(), CliError> {
    runner.log_startup("search");

    let center = parse_point(args.lat, args.lon)?;
    let service = runner.create_service()?;
    let radius = match args.radius {
        Some(r) => parse_radius(r)?,
        None => service.radius(),
    };

    // Searched directly so a one-off radius is not saved as the preference
    let engine = NearbySearchEngine::new(Arc::clone(service.index()));
    let result = engine.search(center, radius).map_err(|e| CliError::Service(e.into()))?;
    info!(center = %center, radius_m = radius, results = result.len(), "Search complete");

    if args.live {
        if let FetchOutcome::Failed(e) = runner.runtime().block_on(service.refresh_now()) {
            return Err(CliError::Feed(e));
        }
    }

    let prefs = service.preferences();
    let entries = join_availability(
        &result,
        &service.availability(),
        prefs.vehicle_filter(),
        &prefs.bookmarks(),
        Utc::now(),
    );

    let heading = format!(
        "Car parks within {} of {}:",
        format_distance(radius),
        center
    );
    print_entries(&heading, &entries, args.live)
}
