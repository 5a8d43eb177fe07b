//! Feed JSON wire format.

use serde::Deserialize;
use tracing::debug;

use super::error::FeedError;
use crate::availability::model::{
    AvailabilityRecord, AvailabilitySnapshot, LotAvailability, LotType,
};

// Every field is optional: a null or missing value only costs the entry it
// belongs to, never the whole response.

#[derive(Deserialize)]
struct FeedResponse {
    #[serde(default)]
    items: Option<Vec<FeedItem>>,
}

#[derive(Deserialize)]
struct FeedItem {
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    carpark_data: Option<Vec<CarparkData>>,
}

#[derive(Deserialize)]
struct CarparkData {
    #[serde(default)]
    carpark_number: Option<String>,
    #[serde(default)]
    update_datetime: Option<String>,
    #[serde(default)]
    carpark_info: Option<Vec<CarparkInfo>>,
}

#[derive(Deserialize)]
struct CarparkInfo {
    #[serde(default)]
    total_lots: Option<LotCount>,
    #[serde(default)]
    lot_type: Option<String>,
    #[serde(default)]
    lots_available: Option<LotCount>,
}

/// Lot counts are strings in the live feed; numbers are tolerated.
#[derive(Deserialize)]
#[serde(untagged)]
enum LotCount {
    Number(i64),
    Text(String),
}

impl LotCount {
    fn parse(&self) -> Option<u32> {
        match self {
            LotCount::Number(n) => u32::try_from(*n).ok(),
            LotCount::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Decode a feed response body into a snapshot.
pub fn decode(bytes: &[u8]) -> Result<AvailabilitySnapshot, FeedError> {
    let response: FeedResponse =
        serde_json::from_slice(bytes).map_err(|e| FeedError::Json(e.to_string()))?;

    let item = response
        .items
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(FeedError::EmptyResponse)?;

    let records = item
        .carpark_data
        .unwrap_or_default()
        .into_iter()
        .filter_map(|data| {
            let Some(facility_id) = data.carpark_number else {
                debug!("Skipping feed record without carpark_number");
                return None;
            };
            let lots = data
                .carpark_info
                .unwrap_or_default()
                .iter()
                .filter_map(|info| decode_lot(&facility_id, info))
                .collect();
            Some(AvailabilityRecord::new(
                facility_id,
                lots,
                data.update_datetime.unwrap_or_default(),
            ))
        });

    Ok(AvailabilitySnapshot::new(records, item.timestamp))
}

/// A lot entry, or `None` if its type or either count is missing or invalid.
fn decode_lot(facility_id: &str, info: &CarparkInfo) -> Option<LotAvailability> {
    let available = info.lots_available.as_ref().and_then(LotCount::parse);
    let total = info.total_lots.as_ref().and_then(LotCount::parse);

    match (info.lot_type.as_deref(), available, total) {
        (Some(tag), Some(available), Some(total)) => {
            Some(LotAvailability::new(LotType::from_tag(tag), available, total))
        }
        (tag, _, _) => {
            debug!(
                facility = %facility_id,
                lot_type = ?tag,
                "Dropping lot entry with missing or unparseable fields"
            );
            None
        }
    }
}
