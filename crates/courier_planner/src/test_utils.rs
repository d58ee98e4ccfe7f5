use courier_ptv::{
    geocoding::{Address, GeocodedLocation, ReferencePosition},
    optimized_plan::{OptimizedPlan, Route, RouteReport, Stop, StopReport},
    plan::{Location, LocationType, Transport, Vehicle},
    vehicle_profile::VehicleProfile,
};
use jiff::{civil::date, tz::TimeZone};

use crate::{
    fleet::build_vehicles,
    session::{PlanningSession, ServiceType, TransportSpec},
};

pub fn geocoded(name: &str, latitude: f64, longitude: f64) -> GeocodedLocation {
    GeocodedLocation {
        formatted_address: name.to_owned(),
        address: Address {
            country_name: "Germany".to_owned(),
            ..Address::default()
        },
        reference_position: ReferencePosition {
            latitude,
            longitude,
        },
    }
}

pub fn test_session() -> PlanningSession {
    PlanningSession::for_day(date(2026, 10, 19), TimeZone::UTC)
}

/// Session holding `Transport-P1-D1` from Alexanderplatz to Potsdamer Platz.
pub fn session_with_transport() -> PlanningSession {
    let mut session = test_session();
    session.select_location(ServiceType::Pickup, geocoded("Alexanderplatz", 52.5219, 13.4132));
    session.select_location(
        ServiceType::Delivery,
        geocoded("Potsdamer Platz", 52.5096, 13.3759),
    );
    session
        .add_transport(&TransportSpec::default())
        .expect("transport");
    session
}

fn location(id: &str, latitude: f64, longitude: f64) -> Location {
    Location {
        id: id.to_owned(),
        location_type: LocationType::Customer,
        latitude,
        longitude,
        opening_intervals: vec![],
    }
}

fn stop(location_id: &str, transport_id: &str, delivery: bool, arrival: &str) -> Stop {
    let ids = vec![transport_id.to_owned()];
    Stop {
        location_id: location_id.to_owned(),
        pickup_ids: if delivery { vec![] } else { ids.clone() },
        delivery_ids: if delivery { ids } else { vec![] },
        report_for_stop: StopReport {
            arrival_time: arrival.parse().expect("timestamp"),
            service_start_time: None,
            departure_time: None,
            service_time: 300,
            waiting_time: 0,
        },
    }
}

/// `count` vehicles without routes, some of them unplanned.
pub fn optimized_plan_with_vehicles(count: u32, unplanned: &[&str]) -> OptimizedPlan {
    OptimizedPlan {
        id: "plan-1".to_owned(),
        locations: vec![],
        transports: vec![],
        vehicles: build_vehicles(count, VehicleProfile::EurCar),
        routes: vec![],
        unplanned_transport_ids: vec![],
        unplanned_vehicle_ids: unplanned.iter().map(|id| id.to_string()).collect(),
    }
}

/// Two vehicles, `Vehicle 1` drives `P1 -> D1`, `Vehicle 2` stays unused.
pub fn single_route_plan() -> OptimizedPlan {
    OptimizedPlan {
        id: "plan-1".to_owned(),
        locations: vec![
            location("P1", 52.5219, 13.4132),
            location("D1", 52.5096, 13.3759),
        ],
        transports: vec![Transport {
            id: "Transport-P1-D1".to_owned(),
            pickup_location_id: "P1".to_owned(),
            pickup_service_time: 300,
            delivery_location_id: "D1".to_owned(),
            delivery_service_time: 300,
        }],
        vehicles: vec![
            Vehicle {
                id: "Vehicle 1".to_owned(),
                profile: VehicleProfile::EurCar,
            },
            Vehicle {
                id: "Vehicle 2".to_owned(),
                profile: VehicleProfile::EurCar,
            },
        ],
        routes: vec![Route {
            vehicle_id: "Vehicle 1".to_owned(),
            stops: vec![
                stop("P1", "Transport-P1-D1", false, "2026-10-19T08:00:00Z"),
                stop("D1", "Transport-P1-D1", true, "2026-10-19T08:17:00Z"),
            ],
            report: RouteReport {
                distance: 4350,
                travel_time: 1620,
                driving_time: 720,
                break_time: 0,
                rest_time: 0,
                waiting_time: 300,
            },
        }],
        unplanned_transport_ids: vec![],
        unplanned_vehicle_ids: vec!["Vehicle 2".to_owned()],
    }
}
