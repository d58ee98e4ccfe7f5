use courier_ptv::{plan::Vehicle, vehicle_profile::VehicleProfile};

use crate::error::LifecycleError;

/// Largest fleet a single plan may request.
pub const MAX_VEHICLES: u32 = 1000;

/// Coerces free-form user input into a vehicle count. Fractions are floored;
/// negative, non-numeric and non-finite input yields no vehicles.
pub fn parse_vehicle_count(input: &str) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(count) if count.is_finite() && count > 0.0 => count.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

/// [`parse_vehicle_count`], rejecting fleets above [`MAX_VEHICLES`].
pub fn fleet_size(input: &str) -> Result<u32, LifecycleError> {
    let count = parse_vehicle_count(input);
    if count > MAX_VEHICLES {
        return Err(LifecycleError::InvalidPlan(format!(
            "{} vehicles requested, at most {} are supported",
            input.trim(),
            MAX_VEHICLES
        )));
    }

    Ok(count)
}

pub fn vehicle_id(index: u32) -> String {
    format!("Vehicle {}", index)
}

/// Builds a fresh homogeneous fleet, `Vehicle 1` to `Vehicle <count>`.
pub fn build_vehicles(count: u32, profile: VehicleProfile) -> Vec<Vehicle> {
    (1..=count)
        .map(|index| Vehicle {
            id: vehicle_id(index),
            profile,
        })
        .collect()
}
