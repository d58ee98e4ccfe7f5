use std::sync::Arc;

use courier_ptv::{
    RouteOptimizationService, geocoding::GeocodedLocation, plan::Transport,
    vehicle_profile::VehicleProfile,
};
use geojson::FeatureCollection;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    error::{LifecycleError, PlannerError},
    fleet::{build_vehicles, fleet_size},
    lifecycle::{LifecycleParams, LifecycleState, PlanLifecycle},
    presentation::{OptimizationView, Presenter, RouteDetails, map_layers, route_details},
    session::{PlanningSession, ServiceType, TransportSpec},
};

/// Commands a UI layer sends to the planner. Results are returned to the
/// caller and, for optimizations, pushed to the [`Presenter`].
pub struct Planner {
    service: Arc<dyn RouteOptimizationService>,
    lifecycle: PlanLifecycle,
    session: Mutex<PlanningSession>,
    presenter: Arc<dyn Presenter>,
}

impl Planner {
    pub fn new(
        service: Arc<dyn RouteOptimizationService>,
        session: PlanningSession,
        presenter: Arc<dyn Presenter>,
        params: LifecycleParams,
    ) -> Self {
        let state_presenter = Arc::clone(&presenter);
        let lifecycle = PlanLifecycle::new(Arc::clone(&service), params)
            .on_state_change(move |state| state_presenter.lifecycle_changed(state));

        Self {
            service,
            lifecycle,
            session: Mutex::new(session),
            presenter,
        }
    }

    pub fn with_session<R>(&self, f: impl FnOnce(&PlanningSession) -> R) -> R {
        f(&self.session.lock())
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Returns suggestions for the query. An empty query drops the current
    /// selection for that service type.
    pub async fn on_location_query_changed(
        &self,
        service_type: ServiceType,
        query: &str,
    ) -> Result<Vec<GeocodedLocation>, PlannerError> {
        let query = query.trim();
        if query.is_empty() {
            self.session.lock().clear_selection(service_type);
            return Ok(vec![]);
        }

        Ok(self.service.search_locations(query).await?)
    }

    pub fn on_location_selected(&self, service_type: ServiceType, location: GeocodedLocation) {
        self.session.lock().select_location(service_type, location);
    }

    pub fn on_add_transport(&self, spec: &TransportSpec) -> Result<Transport, PlannerError> {
        let mut session = self.session.lock();
        let transport = session.add_transport(spec)?.clone();
        info!("Added {}", transport.id);

        Ok(transport)
    }

    /// Runs a whole optimization attempt for the registered transports. The
    /// stored result is replaced only when the attempt succeeds.
    pub async fn on_start_optimization(
        &self,
        vehicle_count: &str,
        profile: VehicleProfile,
    ) -> Result<OptimizationView, PlannerError> {
        let count = match fleet_size(vehicle_count) {
            Ok(count) => count,
            Err(error) => {
                self.presenter.optimization_failed(&error.payload());
                return Err(error.into());
            }
        };

        let request = {
            let mut session = self.session.lock();
            if session.is_optimizing() || self.lifecycle.is_in_flight() {
                return Err(LifecycleError::Busy.into());
            }

            let vehicles = build_vehicles(count, profile);
            session.set_optimizing(true);
            session.plan_request(vehicles)
        };
        let _busy = BusyGuard(&self.session);

        let result = match self.lifecycle.optimize(request).await {
            Ok(plan) => {
                let mut session = self.session.lock();
                OptimizationView::new(&plan, 0, session.addresses()).map(|view| {
                    session.set_optimized_plan(plan);
                    view
                })
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(view) => {
                self.presenter.plan_optimized(&view);
                Ok(view)
            }
            Err(error) => {
                self.presenter.optimization_failed(&error.payload());
                Err(error.into())
            }
        }
    }

    pub fn on_switch_vehicle(&self, step: i64) -> Result<Option<RouteDetails>, PlannerError> {
        let details = {
            let mut session = self.session.lock();
            let index = session.switch_selected_vehicle(step)?;
            debug!("Selected vehicle index {}", index);

            match session.optimized_plan() {
                Some(plan) => route_details(plan, index, session.addresses())?,
                None => None,
            }
        };

        self.presenter.vehicle_selected(details.as_ref());
        Ok(details)
    }

    pub fn on_clear_transports(&self) -> Result<(), PlannerError> {
        self.session.lock().clear_transports()?;
        info!("Cleared all transports");
        Ok(())
    }

    pub fn current_view(&self) -> Result<Option<OptimizationView>, PlannerError> {
        Ok(OptimizationView::for_session(&self.session.lock())?)
    }

    pub fn map_layers(&self) -> Result<FeatureCollection, PlannerError> {
        Ok(map_layers(&self.session.lock())?)
    }

    /// Stops any polling in flight. Call when the UI goes away.
    pub fn shutdown(&self) {
        self.lifecycle.cancel();
    }
}

struct BusyGuard<'a>(&'a Mutex<PlanningSession>);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().set_optimizing(false);
    }
}
