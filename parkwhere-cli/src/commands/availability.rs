//! Availability command - fetch the feed once and show one car park.

use chrono::Utc;

use parkwhere::availability::{AvailabilityRecord, Recency};
use parkwhere::catalog::Facility;
use parkwhere::refresh::FetchOutcome;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the availability command.
pub fn run(runner: &CliRunner, id: &str) -> Result<(), CliError> {
    runner.log_startup("availability");

    let id = id.trim().to_uppercase();
    let service = runner.create_service()?;
    let facility = service
        .index()
        .find_by_id(&id)
        .map_err(|e| CliError::Service(e.into()))?
        .ok_or_else(|| CliError::NotFound(id.clone()))?;

    println!("Fetching availability...");
    match runner.runtime().block_on(service.refresh_now()) {
        FetchOutcome::Failed(e) => return Err(CliError::Feed(e)),
        FetchOutcome::Updated { .. } | FetchOutcome::Coalesced => {}
    }

    let snapshot = service.availability();
    println!("{}", describe(&facility, snapshot.get(&id)));
    Ok(())
}

/// Multi-line description of a facility and its lots.
fn describe(facility: &Facility, record: Option<&AvailabilityRecord>) -> String {
    let mut lines = vec![
        format!("{} - {}", facility.id, facility.address),
        format!("  Type:         {}", facility.facility_type),
        format!("  Parking:      {}", facility.parking_system),
        format!("  Short term:   {}", facility.short_term_parking),
        format!("  Free parking: {}", facility.free_parking),
        format!("  Night:        {}", facility.night_parking),
    ];

    match record.filter(|r| !r.lots.is_empty()) {
        None => lines.push("  No Data Available".to_string()),
        Some(record) => {
            for lot in &record.lots {
                lines.push(format!("  {:<13} {}", format!("{}:", lot.lot_type), lot));
            }
            lines.push(format!(
                "  {}",
                Recency::from_feed_timestamp(&record.updated_at, Utc::now())
            ));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parkwhere::availability::{LotAvailability, LotType};

    #[test]
    fn test_describe_without_record() {
        let facility = Facility::new("ACB", "BLK 270/271 ALBERT CENTRE", 1.3012, 103.8544);
        let text = describe(&facility, None);
        assert!(text.starts_with("ACB - BLK 270/271 ALBERT CENTRE"));
        assert!(text.ends_with("No Data Available"));
    }

    #[test]
    fn test_describe_lists_lots() {
        let facility = Facility::new("ACB", "BLK 270/271 ALBERT CENTRE", 1.3012, 103.8544);
        let record = AvailabilityRecord::new(
            "ACB",
            vec![
                LotAvailability::new(LotType::Car, 5, 10),
                LotAvailability::new(LotType::Motorcycle, 2, 4),
            ],
            "not a timestamp",
        );

        let text = describe(&facility, Some(&record));
        assert!(text.contains("5/10"));
        assert!(text.contains("2/4"));
        assert!(text.ends_with("Updated recently"));
    }
}
