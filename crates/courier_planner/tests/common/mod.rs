#![allow(dead_code)]

use std::collections::VecDeque;

use async_trait::async_trait;
use courier_planner::{
    LifecycleState, PlanningSession,
    presentation::{OptimizationView, Presenter, RouteDetails},
    session::{ServiceType, TransportSpec},
};
use courier_ptv::{
    PtvError, RouteOptimizationService,
    geocoding::{Address, GeocodedLocation, ReferencePosition},
    job_status::OptimizationProgress,
    optimized_plan::{OptimizedPlan, Route, RouteReport, Stop, StopReport},
    plan::{Plan, PlanRequest},
};
use jiff::{civil::date, tz::TimeZone};
use parking_lot::Mutex;
use serde_json::json;

/// What the fake answers to a poll.
#[derive(Debug, Clone)]
pub enum Poll {
    Status(&'static str),
    HttpError(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Search(String),
    Create,
    Start(String),
    Poll(String),
    Fetch(String),
}

/// Scripted route optimization service. Polls follow `polls`; once the
/// script is exhausted every poll answers `RUNNING`.
pub struct FakeService {
    pub plan_id: String,
    pub reject_create: Option<(u16, serde_json::Value)>,
    pub reject_start: Option<(u16, serde_json::Value)>,
    polls: Mutex<VecDeque<Poll>>,
    calls: Mutex<Vec<Call>>,
    created: Mutex<Option<PlanRequest>>,
}

impl FakeService {
    pub fn new(polls: Vec<Poll>) -> Self {
        Self {
            plan_id: "plan-1".to_owned(),
            reject_create: None,
            reject_start: None,
            polls: Mutex::new(polls.into()),
            calls: Mutex::new(vec![]),
            created: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    pub fn created_request(&self) -> Option<PlanRequest> {
        self.created.lock().clone()
    }
}

#[async_trait]
impl RouteOptimizationService for FakeService {
    async fn search_locations(
        &self,
        search_text: &str,
    ) -> Result<Vec<GeocodedLocation>, PtvError> {
        self.calls.lock().push(Call::Search(search_text.to_owned()));
        Ok(vec![geocoded(search_text, 52.5, 13.4)])
    }

    async fn create_plan(&self, request: &PlanRequest) -> Result<Plan, PtvError> {
        self.calls.lock().push(Call::Create);
        if let Some((status, body)) = &self.reject_create {
            return Err(PtvError::Validation {
                status: *status,
                body: body.clone(),
            });
        }

        *self.created.lock() = Some(request.clone());
        Ok(Plan {
            id: self.plan_id.clone(),
            locations: request.locations.clone(),
            transports: request.transports.clone(),
            vehicles: request.vehicles.clone(),
        })
    }

    async fn start_optimization(&self, plan_id: &str) -> Result<(), PtvError> {
        self.calls.lock().push(Call::Start(plan_id.to_owned()));
        match &self.reject_start {
            Some((status, body)) => Err(PtvError::Service {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn optimization_progress(
        &self,
        plan_id: &str,
    ) -> Result<OptimizationProgress, PtvError> {
        self.calls.lock().push(Call::Poll(plan_id.to_owned()));
        let next = self
            .polls
            .lock()
            .pop_front()
            .unwrap_or(Poll::Status("RUNNING"));

        match next {
            Poll::Status(status) => Ok(OptimizationProgress {
                status: status.to_owned(),
                error_message: None,
            }),
            Poll::HttpError(status) => Err(PtvError::Service {
                status,
                body: json!({ "errorCode": "GENERAL_INTERNAL_SERVER_ERROR" }),
            }),
        }
    }

    async fn optimized_plan(&self, plan_id: &str) -> Result<OptimizedPlan, PtvError> {
        self.calls.lock().push(Call::Fetch(plan_id.to_owned()));
        let request = self
            .created_request()
            .expect("plan fetched before it was created");

        Ok(optimized_plan(plan_id, &request))
    }
}

/// Every transport served by `Vehicle 1` in registration order, the other
/// vehicles unused.
pub fn optimized_plan(plan_id: &str, request: &PlanRequest) -> OptimizedPlan {
    let stop = |location_id: &str, transport_id: &str, delivery: bool| Stop {
        location_id: location_id.to_owned(),
        pickup_ids: if delivery { vec![] } else { vec![transport_id.to_owned()] },
        delivery_ids: if delivery { vec![transport_id.to_owned()] } else { vec![] },
        report_for_stop: StopReport {
            arrival_time: "2026-10-19T08:00:00Z".parse().unwrap(),
            service_start_time: None,
            departure_time: None,
            service_time: 300,
            waiting_time: 0,
        },
    };

    let stops = request
        .transports
        .iter()
        .flat_map(|transport| {
            [
                stop(&transport.pickup_location_id, &transport.id, false),
                stop(&transport.delivery_location_id, &transport.id, true),
            ]
        })
        .collect();

    OptimizedPlan {
        id: plan_id.to_owned(),
        locations: request.locations.clone(),
        transports: request.transports.clone(),
        vehicles: request.vehicles.clone(),
        routes: vec![Route {
            vehicle_id: "Vehicle 1".to_owned(),
            stops,
            report: RouteReport {
                distance: 4350,
                travel_time: 1620,
                ..RouteReport::default()
            },
        }],
        unplanned_transport_ids: vec![],
        unplanned_vehicle_ids: request
            .vehicles
            .iter()
            .skip(1)
            .map(|vehicle| vehicle.id.clone())
            .collect(),
    }
}

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

/// Session holding `Transport-P1-D1`.
pub fn session_with_transport() -> PlanningSession {
    let mut session = PlanningSession::for_day(date(2026, 10, 19), TimeZone::UTC);
    session.select_location(ServiceType::Pickup, geocoded("Alexanderplatz", 52.5219, 13.4132));
    session.select_location(
        ServiceType::Delivery,
        geocoded("Potsdamer Platz", 52.5096, 13.3759),
    );
    session.add_transport(&TransportSpec::default()).unwrap();
    session
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub states: Mutex<Vec<LifecycleState>>,
    pub views: Mutex<Vec<OptimizationView>>,
    pub failures: Mutex<Vec<serde_json::Value>>,
    pub selections: Mutex<Vec<Option<String>>>,
}

impl Presenter for RecordingPresenter {
    fn lifecycle_changed(&self, state: &LifecycleState) {
        self.states.lock().push(state.clone());
    }

    fn plan_optimized(&self, view: &OptimizationView) {
        self.views.lock().push(view.clone());
    }

    fn vehicle_selected(&self, details: Option<&RouteDetails>) {
        self.selections
            .lock()
            .push(details.map(|details| details.vehicle_id.clone()));
    }

    fn optimization_failed(&self, payload: &serde_json::Value) {
        self.failures.lock().push(payload.clone());
    }
}
