//! Facility record.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geo::GeoPoint;

/// A single car park in the static catalog.
///
/// Field names on the wire follow the bundled dataset (`car_park_no`,
/// `type_of_parking_system`, ...). Facilities are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    /// Unique car park number, e.g. `"ACB"`.
    #[serde(rename = "car_park_no")]
    pub id: String,

    pub address: String,

    pub latitude: f64,

    pub longitude: f64,

    /// Structure type (surface, multi-storey, basement, mechanised, ...).
    #[serde(rename = "car_park_type", default)]
    pub facility_type: String,

    /// Electronic or coupon parking.
    #[serde(rename = "type_of_parking_system", default)]
    pub parking_system: String,

    /// Window during which short-term parking is permitted.
    #[serde(default)]
    pub short_term_parking: String,

    /// Window during which parking is free.
    #[serde(default)]
    pub free_parking: String,

    #[serde(default)]
    pub night_parking: String,

    #[serde(rename = "car_park_decks", default)]
    pub decks: u32,

    /// Gantry height in meters (0 when there is no gantry).
    #[serde(default)]
    pub gantry_height: f64,

    #[serde(
        rename = "car_park_basement",
        default,
        serialize_with = "serialize_yes_no",
        deserialize_with = "deserialize_yes_no"
    )]
    pub basement: bool,
}

impl Facility {
    /// Create a facility with only identity, address and location set.
    pub fn new(id: impl Into<String>, address: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            latitude: lat,
            longitude: lon,
            facility_type: String::new(),
            parking_system: String::new(),
            short_term_parking: String::new(),
            free_parking: String::new(),
            night_parking: String::new(),
            decks: 0,
            gantry_height: 0.0,
            basement: false,
        }
    }

    /// Location of the facility.
    #[inline]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn serialize_yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Y" } else { "N" })
}

fn deserialize_yes_no<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YesNo {
        Flag(bool),
        Text(String),
    }

    Ok(match YesNo::deserialize(deserializer)? {
        YesNo::Flag(b) => b,
        YesNo::Text(s) => matches!(s.trim(), "Y" | "y" | "YES" | "Yes" | "yes"),
    })
}
