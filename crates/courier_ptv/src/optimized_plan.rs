use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::plan::{Location, Transport, Vehicle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedPlan {
    pub id: String,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub transports: Vec<Transport>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub unplanned_transport_ids: Vec<String>,
    #[serde(default)]
    pub unplanned_vehicle_ids: Vec<String>,
}

impl OptimizedPlan {
    /// Vehicles that received a route, in plan order.
    pub fn used_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles
            .iter()
            .filter(|vehicle| !self.unplanned_vehicle_ids.contains(&vehicle.id))
    }

    pub fn route_for_vehicle(&self, vehicle_id: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.vehicle_id == vehicle_id)
    }

    pub fn location(&self, location_id: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|location| location.id == location_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub vehicle_id: String,
    #[serde(default)]
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub report: RouteReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub location_id: String,
    #[serde(default)]
    pub pickup_ids: Vec<String>,
    #[serde(default)]
    pub delivery_ids: Vec<String>,
    pub report_for_stop: StopReport,
}

impl Stop {
    pub fn is_delivery(&self) -> bool {
        !self.delivery_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopReport {
    pub arrival_time: Timestamp,
    pub service_start_time: Option<Timestamp>,
    pub departure_time: Option<Timestamp>,
    /// Seconds
    #[serde(default)]
    pub service_time: u64,
    /// Seconds
    #[serde(default)]
    pub waiting_time: u64,
}

/// Aggregated figures of a whole route. Distances are in meters, every
/// duration in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteReport {
    pub distance: u64,
    pub travel_time: u64,
    pub driving_time: u64,
    pub break_time: u64,
    pub rest_time: u64,
    pub waiting_time: u64,
}
