//! Watch command - live nearby search driven by commands on stdin.
//!
//! Lines read from stdin:
//!
//! ```text
//! <lat>,<lon>            device location fix
//! search <lat>,<lon>     search around a point instead of the device
//! clear                  drop the search point, back to the device location
//! lost                   device location no longer available
//! radius <m>             change the search radius
//! filter <both|car|motorcycle>
//! bookmark <id>          toggle a bookmark
//! refresh                refresh availability if stale
//! quit
//! ```
//!
//! `--lat/--lon` seed the device location, so fixes typed later move the
//! search as usual.
//!
//! The list is reprinted whenever results, availability, the vehicle filter
//! or the bookmarks change.

use std::str::FromStr;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use parkwhere::availability::FeedClient;
use parkwhere::geo::GeoPoint;
use parkwhere::preferences::VehicleFilter;
use parkwhere::presentation::format_distance;
use parkwhere::service::ParkWhereService;

use super::common::{parse_lat_lon, parse_point, parse_radius, print_entries};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the watch command.
pub struct WatchArgs {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub radius: Option<f64>,
}

/// One line of input.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Device(GeoPoint),
    Search(GeoPoint),
    Clear,
    Lost,
    Radius(f64),
    Filter(VehicleFilter),
    Bookmark(String),
    Refresh,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_lowercase().as_str() {
            "search" => parse_lat_lon(rest).map(WatchCommand::Search),
            "clear" => Ok(WatchCommand::Clear),
            "lost" => Ok(WatchCommand::Lost),
            "radius" => {
                let meters: f64 = rest.parse().map_err(|_| {
                    CliError::InvalidInput(format!("invalid radius '{}'", rest))
                })?;
                parse_radius(meters).map(WatchCommand::Radius)
            }
            "filter" => rest
                .parse()
                .map(WatchCommand::Filter)
                .map_err(CliError::InvalidInput),
            "bookmark" if !rest.is_empty() => Ok(WatchCommand::Bookmark(rest.to_uppercase())),
            "refresh" => Ok(WatchCommand::Refresh),
            "quit" | "exit" => Ok(WatchCommand::Quit),
            _ if line.contains(',') => parse_lat_lon(line).map(WatchCommand::Device),
            _ => Err(CliError::InvalidInput(format!("unknown command '{}'", line))),
        }
    }
}

/// Run the watch command.
pub fn run(runner: &CliRunner, args: WatchArgs) -> Result<(), CliError> {
    runner.log_startup("watch");

    let initial = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(parse_point(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(CliError::InvalidInput(
                "--lat and --lon must be given together".to_string(),
            ))
        }
    };

    let service = runner.create_service()?;
    if let Some(radius) = args.radius {
        service.set_radius(parse_radius(radius)?)?;
    }
    if let Some(point) = initial {
        seed_location(&service, point);
    }
    service.start_periodic_refresh();

    println!("Watching nearby car parks. Type 'quit' to stop.");
    let result = runner.runtime().block_on(watch_loop(&service));
    service.shutdown();
    result
}

async fn watch_loop(service: &ParkWhereService) -> Result<(), CliError> {
    let mut results = service.subscribe_results();
    let mut availability = service.subscribe_availability();
    let mut filter = service.subscribe_vehicle_filter();
    let mut bookmarks = service.subscribe_bookmarks();

    // New receivers replay the current value; render it once instead of four times
    results.borrow_and_update();
    availability.borrow_and_update();
    filter.borrow_and_update();
    bookmarks.borrow_and_update();
    render(service)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<WatchCommand>() {
                    Ok(WatchCommand::Quit) => break,
                    Ok(command) => apply(service, command),
                    Err(e) => eprintln!("{}", e),
                }
            }

            Ok(()) = results.changed() => {
                results.borrow_and_update();
                render(service)?;
            }

            Ok(()) = availability.changed() => {
                availability.borrow_and_update();
                render(service)?;
            }

            Ok(()) = filter.changed() => {
                filter.borrow_and_update();
                render(service)?;
            }

            Ok(()) = bookmarks.changed() => {
                bookmarks.borrow_and_update();
                render(service)?;
            }
        }
    }

    Ok(())
}

/// Starting point from `--lat/--lon`, applied as the first device fix so
/// later `<lat>,<lon>` lines keep moving the search.
fn seed_location<C: FeedClient>(service: &ParkWhereService<C>, point: GeoPoint) {
    service.device_location_changed(point);
}

fn apply<C: FeedClient>(service: &ParkWhereService<C>, command: WatchCommand) {
    match command {
        WatchCommand::Device(point) => {
            if !service.device_location_changed(point) {
                println!("Location unchanged, ignoring");
            }
        }
        WatchCommand::Search(point) => service.set_search_override(Some(point)),
        WatchCommand::Clear => service.set_search_override(None),
        WatchCommand::Lost => service.device_location_lost(),
        WatchCommand::Radius(meters) => {
            if let Err(e) = service.set_radius(meters) {
                eprintln!("{}", e);
            }
        }
        WatchCommand::Filter(vehicle) => {
            if let Err(e) = service.set_vehicle_filter(vehicle) {
                eprintln!("{}", e);
            }
        }
        WatchCommand::Bookmark(id) => match service.toggle_bookmark(&id) {
            Ok(change) if change.bookmarked => println!("Bookmarked {}", change.id),
            Ok(change) => println!("Removed bookmark {}", change.id),
            Err(e) => eprintln!("{}", e),
        },
        WatchCommand::Refresh => match service.refresh_if_stale() {
            Some(_) => println!("Refreshing availability..."),
            None => println!("Availability is up to date"),
        },
        WatchCommand::Quit => {}
    }
}

fn render(service: &ParkWhereService) -> Result<(), CliError> {
    let heading = match service.active_point() {
        Some(point) => format!(
            "\nCar parks within {} of {}:",
            format_distance(service.radius()),
            point
        ),
        None => "\nWaiting for a location (enter <lat>,<lon> or search <lat>,<lon>)".to_string(),
    };
    let show_availability = !service.availability().is_empty();
    print_entries(&heading, &service.nearby_entries(Utc::now()), show_availability)
}
