//! Availability data model.

use std::collections::HashMap;
use std::fmt;

/// Vehicle class a group of lots is reserved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LotType {
    /// Feed tag `C`.
    Car,
    /// Feed tags `Y` and `M`.
    Motorcycle,
    /// Feed tag `H`.
    HeavyVehicle,
    /// Any other tag, kept verbatim.
    Other(String),
}

impl LotType {
    /// Map a feed lot-type tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim() {
            "C" => LotType::Car,
            "Y" | "M" => LotType::Motorcycle,
            "H" => LotType::HeavyVehicle,
            other => LotType::Other(other.to_string()),
        }
    }

    /// Canonical feed tag.
    pub fn tag(&self) -> &str {
        match self {
            LotType::Car => "C",
            LotType::Motorcycle => "Y",
            LotType::HeavyVehicle => "H",
            LotType::Other(tag) => tag,
        }
    }
}

impl fmt::Display for LotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LotType::Car => write!(f, "car"),
            LotType::Motorcycle => write!(f, "motorcycle"),
            LotType::HeavyVehicle => write!(f, "heavy vehicle"),
            LotType::Other(tag) => write!(f, "type {}", tag),
        }
    }
}

/// Available and total lots of one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotAvailability {
    pub lot_type: LotType,
    pub available: u32,
    pub total: u32,
}

impl LotAvailability {
    pub fn new(lot_type: LotType, available: u32, total: u32) -> Self {
        Self {
            lot_type,
            available,
            total,
        }
    }
}

impl fmt::Display for LotAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.available, self.total)
    }
}

/// Latest availability of one facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRecord {
    pub facility_id: String,
    pub lots: Vec<LotAvailability>,
    /// Feed-reported update time, unparsed (`yyyy-MM-ddTHH:mm:ss`, UTC+8).
    pub updated_at: String,
}

impl AvailabilityRecord {
    pub fn new(
        facility_id: impl Into<String>,
        lots: Vec<LotAvailability>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            lots,
            updated_at: updated_at.into(),
        }
    }

    /// Lot entry of the given type. If the feed repeats a type, the last
    /// entry wins.
    pub fn lots_of(&self, lot_type: &LotType) -> Option<&LotAvailability> {
        self.lots.iter().rev().find(|lot| &lot.lot_type == lot_type)
    }

    pub fn car(&self) -> Option<&LotAvailability> {
        self.lots_of(&LotType::Car)
    }

    pub fn motorcycle(&self) -> Option<&LotAvailability> {
        self.lots_of(&LotType::Motorcycle)
    }
}

/// Point-in-time availability for every facility in the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvailabilitySnapshot {
    records: HashMap<String, AvailabilityRecord>,
    feed_timestamp: Option<String>,
}

impl AvailabilitySnapshot {
    /// Build a snapshot. Records sharing a facility id: the later one wins.
    pub fn new(
        records: impl IntoIterator<Item = AvailabilityRecord>,
        feed_timestamp: Option<String>,
    ) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.facility_id.clone(), record))
            .collect();
        Self {
            records,
            feed_timestamp,
        }
    }

    /// Snapshot with no records, used before the first successful fetch.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, facility_id: &str) -> Option<&AvailabilityRecord> {
        self.records.get(facility_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Timestamp of the whole feed response, as reported by the feed.
    pub fn feed_timestamp(&self) -> Option<&str> {
        self.feed_timestamp.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AvailabilityRecord> {
        self.records.values()
    }
}
