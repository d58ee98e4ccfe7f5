use std::{fmt::Display, str::FromStr};

use courier_ptv::{
    geocoding::GeocodedLocation,
    optimized_plan::OptimizedPlan,
    plan::{Location, LocationType, OpeningInterval, PlanRequest, Transport, Vehicle},
};
use jiff::{
    Timestamp, Zoned,
    civil::{Date, Time},
    tz::TimeZone,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Pickup,
    Delivery,
}

impl ServiceType {
    fn id_prefix(&self) -> char {
        match self {
            ServiceType::Pickup => 'P',
            ServiceType::Delivery => 'D',
        }
    }
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ServiceType::Pickup => "pickup",
                ServiceType::Delivery => "delivery",
            }
        )
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_ascii_lowercase().as_str() {
            "pickup" | "p" => Ok(ServiceType::Pickup),
            "delivery" | "d" => Ok(ServiceType::Delivery),
            other => Err(format!("Unknown service type: {other}")),
        }
    }
}

/// Wall-clock window on the planning day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    pub from: Time,
    pub to: Time,
}

impl Default for OpeningHours {
    fn default() -> Self {
        Self {
            from: Time::constant(8, 0, 0, 0),
            to: Time::constant(17, 0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportSpec {
    pub pickup_hours: OpeningHours,
    pub delivery_hours: OpeningHours,
    pub pickup_service_minutes: u32,
    pub delivery_service_minutes: u32,
}

impl Default for TransportSpec {
    fn default() -> Self {
        Self {
            pickup_hours: OpeningHours::default(),
            delivery_hours: OpeningHours::default(),
            pickup_service_minutes: 5,
            delivery_service_minutes: 5,
        }
    }
}

/// A registered location id and the search result it was created from.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredAddress {
    pub location_id: String,
    pub location: GeocodedLocation,
}

/// Everything the user entered during one planning session, plus the last
/// optimization result.
#[derive(Debug)]
pub struct PlanningSession {
    planning_date: Date,
    time_zone: TimeZone,
    pickup: Option<GeocodedLocation>,
    delivery: Option<GeocodedLocation>,
    addresses: Vec<RegisteredAddress>,
    locations: Vec<Location>,
    transports: Vec<Transport>,
    optimized_plan: Option<OptimizedPlan>,
    selected_vehicle_index: usize,
    optimizing: bool,
}

impl PlanningSession {
    /// Plans for today in the system time zone.
    pub fn new() -> Self {
        let now = Zoned::now();
        Self::for_day(now.date(), now.time_zone().clone())
    }

    pub fn for_day(planning_date: Date, time_zone: TimeZone) -> Self {
        Self {
            planning_date,
            time_zone,
            pickup: None,
            delivery: None,
            addresses: vec![],
            locations: vec![],
            transports: vec![],
            optimized_plan: None,
            selected_vehicle_index: 0,
            optimizing: false,
        }
    }

    pub fn planning_date(&self) -> Date {
        self.planning_date
    }

    pub fn select_location(&mut self, service_type: ServiceType, location: GeocodedLocation) {
        debug!("Selected {} location {}", service_type, location.label());
        match service_type {
            ServiceType::Pickup => self.pickup = Some(location),
            ServiceType::Delivery => self.delivery = Some(location),
        }
    }

    pub fn clear_selection(&mut self, service_type: ServiceType) {
        match service_type {
            ServiceType::Pickup => self.pickup = None,
            ServiceType::Delivery => self.delivery = None,
        }
    }

    pub fn selection(&self, service_type: ServiceType) -> Option<&GeocodedLocation> {
        match service_type {
            ServiceType::Pickup => self.pickup.as_ref(),
            ServiceType::Delivery => self.delivery.as_ref(),
        }
    }

    pub fn can_add_transport(&self) -> bool {
        self.pickup.is_some() && self.delivery.is_some()
    }

    pub fn can_start_optimization(&self) -> bool {
        !self.transports.is_empty() && !self.optimizing
    }

    /// Registers the selected pickup and delivery as a new transport.
    /// Both selections are consumed.
    pub fn add_transport(&mut self, spec: &TransportSpec) -> Result<&Transport, SessionError> {
        if self.optimizing {
            return Err(SessionError::OptimizationInProgress);
        }

        let pickup = self
            .pickup
            .as_ref()
            .ok_or(SessionError::MissingSelection(ServiceType::Pickup))?;
        let delivery = self
            .delivery
            .as_ref()
            .ok_or(SessionError::MissingSelection(ServiceType::Delivery))?;

        let pickup_service_time = service_seconds(spec.pickup_service_minutes)?;
        let delivery_service_time = service_seconds(spec.delivery_service_minutes)?;

        let pickup_location = self.to_location(pickup, ServiceType::Pickup, spec.pickup_hours)?;
        let delivery_location =
            self.to_location(delivery, ServiceType::Delivery, spec.delivery_hours)?;

        let transport = Transport {
            id: format!("Transport-{}-{}", pickup_location.id, delivery_location.id),
            pickup_location_id: pickup_location.id.clone(),
            pickup_service_time,
            delivery_location_id: delivery_location.id.clone(),
            delivery_service_time,
        };

        if let (Some(pickup), Some(delivery)) = (self.pickup.take(), self.delivery.take()) {
            self.addresses.push(RegisteredAddress {
                location_id: pickup_location.id.clone(),
                location: pickup,
            });
            self.addresses.push(RegisteredAddress {
                location_id: delivery_location.id.clone(),
                location: delivery,
            });
        }

        self.locations.push(pickup_location);
        self.locations.push(delivery_location);

        debug!("Added {}", transport.id);
        self.transports.push(transport);

        Ok(&self.transports[self.transports.len() - 1])
    }

    fn to_location(
        &self,
        geocoded: &GeocodedLocation,
        service_type: ServiceType,
        hours: OpeningHours,
    ) -> Result<Location, SessionError> {
        if hours.to < hours.from {
            return Err(SessionError::InvalidOpeningHours {
                from: hours.from,
                to: hours.to,
            });
        }

        Ok(Location {
            id: format!("{}{}", service_type.id_prefix(), self.transports.len() + 1),
            location_type: LocationType::Customer,
            latitude: geocoded.reference_position.latitude,
            longitude: geocoded.reference_position.longitude,
            opening_intervals: vec![OpeningInterval {
                start: self.timestamp_at(hours.from)?,
                end: self.timestamp_at(hours.to)?,
            }],
        })
    }

    fn timestamp_at(&self, time: Time) -> Result<Timestamp, SessionError> {
        let zoned = self
            .planning_date
            .to_datetime(time)
            .to_zoned(self.time_zone.clone())?;

        Ok(zoned.timestamp())
    }

    /// Forgets every transport and the last result. Pending selections are
    /// kept.
    pub fn clear_transports(&mut self) -> Result<(), SessionError> {
        if self.optimizing {
            return Err(SessionError::OptimizationInProgress);
        }

        self.transports.clear();
        self.locations.clear();
        self.addresses.clear();
        self.optimized_plan = None;
        self.selected_vehicle_index = 0;

        Ok(())
    }

    /// Snapshot of the registry paired with the given fleet.
    pub fn plan_request(&self, vehicles: Vec<Vehicle>) -> PlanRequest {
        PlanRequest {
            locations: self.locations.clone(),
            transports: self.transports.clone(),
            vehicles,
        }
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn transports(&self) -> &[Transport] {
        &self.transports
    }

    pub fn addresses(&self) -> &[RegisteredAddress] {
        &self.addresses
    }

    pub fn lookup_address(&self, location_id: &str) -> Option<&GeocodedLocation> {
        self.addresses
            .iter()
            .find(|address| address.location_id == location_id)
            .map(|address| &address.location)
    }

    pub fn is_optimizing(&self) -> bool {
        self.optimizing
    }

    pub(crate) fn set_optimizing(&mut self, optimizing: bool) {
        self.optimizing = optimizing;
    }

    pub fn optimized_plan(&self) -> Option<&OptimizedPlan> {
        self.optimized_plan.as_ref()
    }

    pub fn set_optimized_plan(&mut self, plan: OptimizedPlan) {
        self.optimized_plan = Some(plan);
        self.selected_vehicle_index = 0;
    }

    pub fn selected_vehicle_index(&self) -> usize {
        self.selected_vehicle_index
    }

    /// Moves the selection among the used vehicles, wrapping around at both
    /// ends.
    pub fn switch_selected_vehicle(&mut self, step: i64) -> Result<usize, SessionError> {
        let plan = self
            .optimized_plan
            .as_ref()
            .ok_or(SessionError::NoOptimizedPlan)?;
        let used = plan.used_vehicles().count() as i64;

        let mut index = self.selected_vehicle_index as i64 + step;
        if index < 0 {
            index = used - 1;
        }
        if index > used - 1 {
            index = 0;
        }

        self.selected_vehicle_index = index.max(0) as usize;
        Ok(self.selected_vehicle_index)
    }
}

impl Default for PlanningSession {
    fn default() -> Self {
        Self::new()
    }
}

fn service_seconds(minutes: u32) -> Result<u32, SessionError> {
    minutes
        .checked_mul(60)
        .ok_or(SessionError::InvalidServiceTime(minutes))
}
