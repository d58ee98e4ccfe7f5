use courier_ptv::optimized_plan::OptimizedPlan;
use geo_types::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry};

use crate::{error::LifecycleError, session::PlanningSession};

/// One line per route through its stops, in visiting order.
pub fn route_lines(plan: &OptimizedPlan) -> Result<Vec<LineString<f64>>, LifecycleError> {
    plan.routes
        .iter()
        .map(|route| {
            route
                .stops
                .iter()
                .map(|stop| {
                    plan.location(&stop.location_id)
                        .map(|location| Coord {
                            x: location.longitude,
                            y: location.latitude,
                        })
                        .ok_or_else(|| {
                            LifecycleError::IncompleteResult(format!(
                                "route of {} visits unknown location {}",
                                route.vehicle_id, stop.location_id
                            ))
                        })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(LineString::new)
        })
        .collect()
}

/// Markers for every registered location and, once optimized, the route
/// lines.
pub fn map_layers(session: &PlanningSession) -> Result<FeatureCollection, LifecycleError> {
    let mut features: Vec<Feature> = session
        .locations()
        .iter()
        .map(|location| {
            let point: Point = location.into();
            let mut feature = Feature {
                geometry: Some(Geometry::from(&point)),
                ..Default::default()
            };
            feature.set_property("locationId", location.id.clone());
            if let Some(address) = session.lookup_address(&location.id) {
                feature.set_property("address", address.label());
            }
            feature
        })
        .collect();

    if let Some(plan) = session.optimized_plan() {
        for (route, line) in plan.routes.iter().zip(route_lines(plan)?) {
            let mut feature = Feature {
                geometry: Some(Geometry::from(&line)),
                ..Default::default()
            };
            feature.set_property("vehicleId", route.vehicle_id.clone());
            features.push(feature);
        }
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{session_with_transport, single_route_plan};

    #[test]
    fn test_route_lines_follow_stops() {
        let lines = route_lines(&single_route_plan()).unwrap();

        assert_eq!(lines.len(), 1);
        let coords: Vec<(f64, f64)> = lines[0].coords().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(13.4132, 52.5219), (13.3759, 52.5096)]);
    }

    #[test]
    fn test_route_lines_unknown_location() {
        let mut plan = single_route_plan();
        plan.locations.clear();

        assert!(matches!(
            route_lines(&plan),
            Err(LifecycleError::IncompleteResult(_))
        ));
    }

    #[test]
    fn test_map_layers() {
        let mut session = session_with_transport();

        let layers = map_layers(&session).unwrap();
        assert_eq!(layers.features.len(), 2);
        assert_eq!(
            layers.features[0].property("address"),
            Some(&serde_json::json!("Alexanderplatz, Germany"))
        );

        session.set_optimized_plan(single_route_plan());
        let layers = map_layers(&session).unwrap();
        assert_eq!(layers.features.len(), 3);
        assert_eq!(
            layers.features[2].property("vehicleId"),
            Some(&serde_json::json!("Vehicle 1"))
        );
    }
}
