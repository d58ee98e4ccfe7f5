use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::vehicle_profile::VehicleProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationType {
    #[default]
    Customer,
    Depot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningInterval {
    pub start: Timestamp,
    pub end: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub opening_intervals: Vec<OpeningInterval>,
}

impl From<&Location> for geo_types::Point {
    fn from(value: &Location) -> Self {
        geo_types::Point::new(value.longitude, value.latitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transport {
    pub id: String,
    pub pickup_location_id: String,
    /// Seconds
    #[serde(default)]
    pub pickup_service_time: u32,
    pub delivery_location_id: String,
    /// Seconds
    #[serde(default)]
    pub delivery_service_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub profile: VehicleProfile,
}

/// Body of the create plan request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequest {
    pub locations: Vec<Location>,
    pub transports: Vec<Transport>,
    pub vehicles: Vec<Vehicle>,
}

impl PlanRequest {
    /// Returns the ids of the first transport referencing a location that is
    /// not part of the request, as `(transport_id, location_id)`.
    pub fn find_dangling_location(&self) -> Option<(&str, &str)> {
        self.transports.iter().find_map(|transport| {
            [&transport.pickup_location_id, &transport.delivery_location_id]
                .into_iter()
                .find(|location_id| !self.locations.iter().any(|l| l.id == **location_id))
                .map(|location_id| (transport.id.as_str(), location_id.as_str()))
        })
    }
}

/// A plan as stored by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub transports: Vec<Transport>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}
