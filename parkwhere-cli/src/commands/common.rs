//! Common types and utilities shared across CLI commands.

use std::io::{self, Write};

use parkwhere::geo::GeoPoint;
use parkwhere::presentation::{format_distance, NearbyEntry};

use crate::error::CliError;

/// Validate a latitude/longitude pair from the command line.
pub fn parse_point(lat: f64, lon: f64) -> Result<GeoPoint, CliError> {
    GeoPoint::try_new(lat, lon).map_err(|e| CliError::InvalidInput(e.to_string()))
}

/// Parse `"<lat>,<lon>"`, tolerating spaces around either number.
pub fn parse_lat_lon(text: &str) -> Result<GeoPoint, CliError> {
    let (lat, lon) = text.split_once(',').ok_or_else(|| {
        CliError::InvalidInput(format!("expected <lat>,<lon>, got '{}'", text))
    })?;

    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("invalid latitude '{}'", lat.trim())))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| CliError::InvalidInput(format!("invalid longitude '{}'", lon.trim())))?;

    parse_point(lat, lon)
}

/// Validate a radius argument in meters.
pub fn parse_radius(meters: f64) -> Result<f64, CliError> {
    if meters.is_finite() && meters > 0.0 {
        Ok(meters)
    } else {
        Err(CliError::InvalidInput(format!(
            "radius must be a positive number of meters, got {}",
            meters
        )))
    }
}

/// One line of the nearby list.
///
/// `show_availability` is false when availability was never fetched, so the
/// line does not claim "No Data" for every car park.
pub fn format_entry(position: usize, entry: &NearbyEntry, show_availability: bool) -> String {
    let mut line = format!(
        "{:>3}. {:<6} {:>8}  {}",
        position,
        entry.facility.id,
        format_distance(entry.distance_meters),
        entry.facility.address
    );
    if entry.bookmarked {
        line.push_str(" *");
    }
    if show_availability {
        line.push_str(&format!("\n             {}", entry.availability));
    }
    line
}

/// Print the nearby list with a heading.
pub fn print_entries(
    heading: &str,
    entries: &[NearbyEntry],
    show_availability: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", heading)?;
    if entries.is_empty() {
        writeln!(out, "  No car parks found")?;
    }
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "{}", format_entry(i + 1, entry, show_availability))?;
    }
    out.flush()?;
    Ok(())
}
