use std::fmt::Display;

use courier_ptv::optimized_plan::OptimizedPlan;
use jiff::Timestamp;

use crate::{error::LifecycleError, session::RegisteredAddress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopEvent {
    Pickup,
    Delivery,
}

impl Display for StopEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StopEvent::Pickup => "Pickup",
                StopEvent::Delivery => "Delivery",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopRow {
    /// 1-based
    pub number: usize,
    pub location_id: String,
    pub address: String,
    pub event: StopEvent,
    pub arrival_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteDetails {
    pub vehicle_id: String,
    pub rows: Vec<StopRow>,
    /// Meters
    pub distance: u64,
    /// Seconds
    pub travel_time: u64,
}

/// Stop table of the `vehicle_index`-th used vehicle, `None` when there is no
/// such vehicle.
pub fn route_details(
    plan: &OptimizedPlan,
    vehicle_index: usize,
    addresses: &[RegisteredAddress],
) -> Result<Option<RouteDetails>, LifecycleError> {
    let Some(vehicle) = plan.used_vehicles().nth(vehicle_index) else {
        return Ok(None);
    };

    let route = plan.route_for_vehicle(&vehicle.id).ok_or_else(|| {
        LifecycleError::IncompleteResult(format!("no route for used vehicle {}", vehicle.id))
    })?;

    let rows = route
        .stops
        .iter()
        .enumerate()
        .map(|(index, stop)| {
            let address = addresses
                .iter()
                .find(|address| address.location_id == stop.location_id)
                .ok_or_else(|| {
                    LifecycleError::IncompleteResult(format!(
                        "no address registered for location {}",
                        stop.location_id
                    ))
                })?;

            Ok(StopRow {
                number: index + 1,
                location_id: stop.location_id.clone(),
                address: address.location.formatted_address.clone(),
                event: if stop.is_delivery() {
                    StopEvent::Delivery
                } else {
                    StopEvent::Pickup
                },
                arrival_time: stop.report_for_stop.arrival_time,
            })
        })
        .collect::<Result<Vec<_>, LifecycleError>>()?;

    Ok(Some(RouteDetails {
        vehicle_id: vehicle.id.clone(),
        rows,
        distance: route.report.distance,
        travel_time: route.report.travel_time,
    }))
}
