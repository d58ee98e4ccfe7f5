use std::{fmt::Display, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Vehicle classes known to the route optimization service.
/// https://developer.myptv.com/en/documentation/route-optimization-api/concepts/profiles
#[derive(Debug, Deserialize, Serialize, JsonSchema, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleProfile {
    EurTrailerTruck,
    #[serde(rename = "EUR_TRUCK_40T")]
    EurTruck40t,
    #[serde(rename = "EUR_TRUCK_11_99T")]
    EurTruck11_99t,
    #[serde(rename = "EUR_TRUCK_7_49T")]
    EurTruck7_49t,
    EurVan,
    #[default]
    EurCar,
    #[serde(rename = "USA_1_PICKUP")]
    Usa1Pickup,
    #[serde(rename = "USA_5_DELIVERY")]
    Usa5Delivery,
    #[serde(rename = "USA_8_SEMITRAILER_5AXLE")]
    Usa8Semitrailer5Axle,
}

impl VehicleProfile {
    pub const ALL: [VehicleProfile; 9] = [
        VehicleProfile::EurTrailerTruck,
        VehicleProfile::EurTruck40t,
        VehicleProfile::EurTruck11_99t,
        VehicleProfile::EurTruck7_49t,
        VehicleProfile::EurVan,
        VehicleProfile::EurCar,
        VehicleProfile::Usa1Pickup,
        VehicleProfile::Usa5Delivery,
        VehicleProfile::Usa8Semitrailer5Axle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleProfile::EurTrailerTruck => "EUR_TRAILER_TRUCK",
            VehicleProfile::EurTruck40t => "EUR_TRUCK_40T",
            VehicleProfile::EurTruck11_99t => "EUR_TRUCK_11_99T",
            VehicleProfile::EurTruck7_49t => "EUR_TRUCK_7_49T",
            VehicleProfile::EurVan => "EUR_VAN",
            VehicleProfile::EurCar => "EUR_CAR",
            VehicleProfile::Usa1Pickup => "USA_1_PICKUP",
            VehicleProfile::Usa5Delivery => "USA_5_DELIVERY",
            VehicleProfile::Usa8Semitrailer5Axle => "USA_8_SEMITRAILER_5AXLE",
        }
    }
}

impl Display for VehicleProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown vehicle profile: {0}")]
pub struct UnknownVehicleProfile(pub String);

impl FromStr for VehicleProfile {
    type Err = UnknownVehicleProfile;

    /// Accepts the service names case-insensitively, plus the short
    /// aliases `car`, `van` and `truck`.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_uppercase().replace('-', "_");

        match normalized.as_str() {
            "CAR" => return Ok(VehicleProfile::EurCar),
            "VAN" => return Ok(VehicleProfile::EurVan),
            "TRUCK" => return Ok(VehicleProfile::EurTruck40t),
            _ => {}
        }

        VehicleProfile::ALL
            .into_iter()
            .find(|profile| profile.as_str() == normalized)
            .ok_or_else(|| UnknownVehicleProfile(input.to_owned()))
    }
}
