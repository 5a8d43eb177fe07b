//! Per-facility availability view.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::availability::{AvailabilityRecord, LotAvailability, Recency};
use crate::preferences::VehicleFilter;

/// Message shown instead of lot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityNotice {
    /// The feed has no usable lots for this facility.
    NoData,
    /// Filter is car-only and the facility reports no car lots.
    NoCarLots,
    /// Filter is motorcycle-only and the facility reports no motorcycle lots.
    NoMotorcycleLots,
}

impl fmt::Display for AvailabilityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AvailabilityNotice::NoData => "No Data Available",
            AvailabilityNotice::NoCarLots => "No Car Park Lots Found",
            AvailabilityNotice::NoMotorcycleLots => "No Motorcycle Lots Found",
        })
    }
}

/// What to show for one facility's availability under a vehicle filter.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityView {
    /// Car lots, if the facility has them and the filter shows them.
    pub car: Option<LotAvailability>,
    /// Motorcycle lots, if the facility has them and the filter shows them.
    pub motorcycle: Option<LotAvailability>,
    pub notice: Option<AvailabilityNotice>,
    /// Age of the record; absent while a notice is shown.
    pub recency: Option<Recency>,
}

impl AvailabilityView {
    /// View for a facility the feed knows nothing about.
    pub fn no_data() -> Self {
        Self {
            car: None,
            motorcycle: None,
            notice: Some(AvailabilityNotice::NoData),
            recency: None,
        }
    }

    /// Build the view for `record` under `filter`.
    pub fn build(
        record: Option<&AvailabilityRecord>,
        filter: VehicleFilter,
        now: DateTime<Utc>,
    ) -> Self {
        let Some(record) = record.filter(|r| !r.lots.is_empty()) else {
            return Self::no_data();
        };

        let car = record.car().cloned();
        let motorcycle = record.motorcycle().cloned();

        let notice = match filter {
            VehicleFilter::Car if car.is_none() => Some(AvailabilityNotice::NoCarLots),
            VehicleFilter::Motorcycle if motorcycle.is_none() => {
                Some(AvailabilityNotice::NoMotorcycleLots)
            }
            _ => None,
        };

        Self {
            car: car.filter(|_| filter.shows_car()),
            motorcycle: motorcycle.filter(|_| filter.shows_motorcycle()),
            recency: notice
                .is_none()
                .then(|| Recency::from_feed_timestamp(&record.updated_at, now)),
            notice,
        }
    }
}

impl fmt::Display for AvailabilityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(notice) = self.notice {
            return write!(f, "{}", notice);
        }

        let mut parts = Vec::new();
        if let Some(car) = &self.car {
            parts.push(format!("car {}", car));
        }
        if let Some(moto) = &self.motorcycle {
            parts.push(format!("motorcycle {}", moto));
        }
        write!(f, "{}", parts.join(", "))?;
        if let Some(recency) = self.recency {
            if !parts.is_empty() {
                write!(f, " ")?;
            }
            write!(f, "({})", recency)?;
        }
        Ok(())
    }
}

/// Human-readable distance: whole meters below 1 km, otherwise km with
/// one decimal.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}
