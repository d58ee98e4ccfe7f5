mod common;

use std::{sync::Arc, time::Duration};

use common::{Call, FakeService, Poll, RecordingPresenter, geocoded, session_with_transport};
use courier_planner::{
    LifecycleError, LifecycleParams, LifecycleState, Planner, PlannerError, SessionError,
    presentation::StopEvent,
    session::{ServiceType, TransportSpec},
};
use courier_ptv::vehicle_profile::VehicleProfile;
use serde_json::json;

fn planner(service: &Arc<FakeService>, presenter: &Arc<RecordingPresenter>) -> Planner {
    Planner::new(
        service.clone(),
        session_with_transport(),
        presenter.clone(),
        LifecycleParams::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn test_single_transport_end_to_end() {
    let service = Arc::new(FakeService::new(vec![
        Poll::Status("RUNNING"),
        Poll::Status("SUCCEEDED"),
    ]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);
    let profile: VehicleProfile = "car".parse().unwrap();

    let view = planner.on_start_optimization("1", profile).await.unwrap();

    let created = service.created_request().unwrap();
    assert_eq!(created.vehicles.len(), 1);
    assert_eq!(created.vehicles[0].id, "Vehicle 1");
    assert_eq!(created.vehicles[0].profile, VehicleProfile::EurCar);
    assert_eq!(created.transports[0].id, "Transport-P1-D1");

    let details = view.route_details.as_ref().unwrap();
    assert_eq!(details.vehicle_id, "Vehicle 1");
    let stops: Vec<(&str, StopEvent)> = details
        .rows
        .iter()
        .map(|row| (row.location_id.as_str(), row.event))
        .collect();
    assert_eq!(
        stops,
        vec![("P1", StopEvent::Pickup), ("D1", StopEvent::Delivery)]
    );
    assert_eq!(details.rows[0].address, "Alexanderplatz");

    assert_eq!(view.kpis.used_vehicles, 1);
    assert_eq!(view.kpis.unused_vehicles, 0);
    assert_eq!(view.kpis.planned_transports, 1);
    assert_eq!(view.kpis.unplanned_transports, 0);
    assert_eq!(view.route_lines.len(), 1);

    assert_eq!(presenter.views.lock().as_slice(), &[view]);
    assert!(presenter.failures.lock().is_empty());
    assert_eq!(
        presenter.states.lock().as_slice(),
        &[
            LifecycleState::Idle,
            LifecycleState::PlanCreated {
                plan_id: "plan-1".to_owned()
            },
            LifecycleState::Optimizing {
                plan_id: "plan-1".to_owned()
            },
            LifecycleState::Fetching {
                plan_id: "plan-1".to_owned()
            },
            LifecycleState::Done {
                plan_id: "plan-1".to_owned()
            },
        ]
    );

    planner.with_session(|session| {
        assert_eq!(session.optimized_plan().unwrap().id, "plan-1");
        assert!(!session.is_optimizing());
    });
}

#[tokio::test(start_paused = true)]
async fn test_failed_create_keeps_previous_result() {
    let service = Arc::new(FakeService::new(vec![Poll::Status("SUCCEEDED")]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);
    planner
        .on_start_optimization("2", VehicleProfile::EurVan)
        .await
        .unwrap();

    let mut rejecting = FakeService::new(vec![]);
    rejecting.reject_create = Some((400, json!({ "error": "INVALID_PROFILE" })));
    let rejecting = Arc::new(rejecting);
    let failing_planner = Planner::new(
        rejecting.clone(),
        session_with_transport(),
        presenter.clone(),
        LifecycleParams::default(),
    );

    let error = failing_planner
        .on_start_optimization("1", VehicleProfile::EurCar)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        PlannerError::Lifecycle(LifecycleError::Validation { .. })
    ));
    assert_eq!(rejecting.calls(), vec![Call::Create]);
    assert_eq!(
        presenter.failures.lock().as_slice(),
        &[json!({ "error": "INVALID_PROFILE" })]
    );
    assert_eq!(presenter.views.lock().len(), 1);
    failing_planner.with_session(|session| {
        assert!(session.optimized_plan().is_none());
        assert!(!session.is_optimizing());
    });
    planner.with_session(|session| assert!(session.optimized_plan().is_some()));
}

#[tokio::test(start_paused = true)]
async fn test_mutations_are_rejected_while_optimizing() {
    let service = Arc::new(FakeService::new(vec![]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = Arc::new(planner(&service, &presenter));

    let running = {
        let planner = Arc::clone(&planner);
        tokio::spawn(async move {
            planner
                .on_start_optimization("1", VehicleProfile::EurCar)
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert!(matches!(
        planner
            .on_start_optimization("1", VehicleProfile::EurCar)
            .await,
        Err(PlannerError::Lifecycle(LifecycleError::Busy))
    ));
    assert!(matches!(
        planner.on_clear_transports(),
        Err(PlannerError::Session(SessionError::OptimizationInProgress))
    ));
    planner.on_location_selected(ServiceType::Pickup, geocoded("Tempelhof", 52.47, 13.40));
    planner.on_location_selected(ServiceType::Delivery, geocoded("Tegel", 52.55, 13.29));
    assert!(matches!(
        planner.on_add_transport(&TransportSpec::default()),
        Err(PlannerError::Session(SessionError::OptimizationInProgress))
    ));
    planner.with_session(|session| assert_eq!(session.transports().len(), 1));

    planner.shutdown();
    let result = running.await.unwrap();
    assert!(matches!(
        result,
        Err(PlannerError::Lifecycle(LifecycleError::Cancelled))
    ));

    let polls = service.count(|call| matches!(call, Call::Poll(_)));
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(service.count(|call| matches!(call, Call::Poll(_))), polls);

    planner.on_clear_transports().unwrap();
    planner.with_session(|session| assert!(session.transports().is_empty()));
}

#[tokio::test(start_paused = true)]
async fn test_oversized_fleet_is_rejected_before_create() {
    let service = Arc::new(FakeService::new(vec![Poll::Status("SUCCEEDED")]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);

    let error = planner
        .on_start_optimization("1e12", VehicleProfile::EurCar)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        PlannerError::Lifecycle(LifecycleError::InvalidPlan(_))
    ));
    assert!(service.calls().is_empty());
    assert_eq!(presenter.failures.lock().len(), 1);
    planner.with_session(|session| assert!(!session.is_optimizing()));

    planner
        .on_start_optimization("1000", VehicleProfile::EurCar)
        .await
        .unwrap();
    assert_eq!(service.created_request().unwrap().vehicles.len(), 1000);
}

#[tokio::test(start_paused = true)]
async fn test_switch_vehicle_wraps_over_used_vehicles() {
    let service = Arc::new(FakeService::new(vec![Poll::Status("SUCCEEDED")]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);

    // a single used vehicle: both directions land on it
    planner
        .on_start_optimization("3", VehicleProfile::EurCar)
        .await
        .unwrap();

    let previous = planner.on_switch_vehicle(-1).unwrap();
    let next = planner.on_switch_vehicle(1).unwrap();

    assert_eq!(previous.unwrap().vehicle_id, "Vehicle 1");
    assert_eq!(next.unwrap().vehicle_id, "Vehicle 1");
    assert_eq!(
        presenter.selections.lock().as_slice(),
        &[Some("Vehicle 1".to_owned()), Some("Vehicle 1".to_owned())]
    );
}

#[tokio::test]
async fn test_location_search_and_add_transport() {
    let service = Arc::new(FakeService::new(vec![]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);

    let suggestions = planner
        .on_location_query_changed(ServiceType::Pickup, " Tempelhof ")
        .await
        .unwrap();
    assert_eq!(suggestions.len(), 1);
    planner.on_location_selected(ServiceType::Pickup, suggestions[0].clone());

    let suggestions = planner
        .on_location_query_changed(ServiceType::Delivery, "Tegel")
        .await
        .unwrap();
    planner.on_location_selected(ServiceType::Delivery, suggestions[0].clone());

    let transport = planner.on_add_transport(&TransportSpec::default()).unwrap();
    assert_eq!(transport.id, "Transport-P2-D2");
    assert_eq!(
        service.calls(),
        vec![
            Call::Search("Tempelhof".to_owned()),
            Call::Search("Tegel".to_owned())
        ]
    );

    let layers = planner.map_layers().unwrap();
    assert_eq!(layers.features.len(), 4);
}

#[tokio::test]
async fn test_empty_query_clears_selection() {
    let service = Arc::new(FakeService::new(vec![]));
    let presenter = Arc::new(RecordingPresenter::default());
    let planner = planner(&service, &presenter);
    planner.on_location_selected(ServiceType::Delivery, common::geocoded("Tegel", 52.55, 13.29));

    let suggestions = planner
        .on_location_query_changed(ServiceType::Delivery, "  ")
        .await
        .unwrap();

    assert!(suggestions.is_empty());
    assert!(service.calls().is_empty());
    planner.with_session(|session| {
        assert!(session.selection(ServiceType::Delivery).is_none());
    });
    assert!(matches!(
        planner.on_add_transport(&TransportSpec::default()),
        Err(PlannerError::Session(SessionError::MissingSelection(_)))
    ));
}
