use courier_ptv::optimized_plan::OptimizedPlan;
use geo_types::LineString;

use crate::{
    error::LifecycleError,
    lifecycle::LifecycleState,
    presentation::{
        kpis::{Kpis, kpis},
        map_layers::route_lines,
        route_details::{RouteDetails, route_details},
    },
    session::{PlanningSession, RegisteredAddress},
};

/// Everything shown after a successful optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationView {
    pub route_details: Option<RouteDetails>,
    pub kpis: Kpis,
    pub route_lines: Vec<LineString<f64>>,
}

impl OptimizationView {
    pub fn new(
        plan: &OptimizedPlan,
        vehicle_index: usize,
        addresses: &[RegisteredAddress],
    ) -> Result<Self, LifecycleError> {
        Ok(Self {
            route_details: route_details(plan, vehicle_index, addresses)?,
            kpis: kpis(plan),
            route_lines: route_lines(plan)?,
        })
    }

    /// View of the session's optimized plan and selected vehicle, `None`
    /// before the first successful optimization.
    pub fn for_session(session: &PlanningSession) -> Result<Option<Self>, LifecycleError> {
        session
            .optimized_plan()
            .map(|plan| Self::new(plan, session.selected_vehicle_index(), session.addresses()))
            .transpose()
    }
}

/// Output side of the planner, implemented by the UI layer.
pub trait Presenter: Send + Sync {
    fn lifecycle_changed(&self, _state: &LifecycleState) {}

    /// Called once per successful optimization, after the result was stored.
    fn plan_optimized(&self, view: &OptimizationView);

    fn vehicle_selected(&self, _details: Option<&RouteDetails>) {}

    /// `payload` is the structured error body of the service when it sent
    /// one.
    fn optimization_failed(&self, payload: &serde_json::Value);
}
