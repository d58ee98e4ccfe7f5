//! Drives one optimization attempt: create the plan, start the optimization,
//! poll its progress and fetch the result.
//!
//! ```text
//! Idle -> PlanCreated -> Optimizing -> Fetching -> Done
//!                  \____________\___________\____> Failed
//! ```
//!
//! Only one attempt can be in flight per [`PlanLifecycle`]. Every failure ends
//! the attempt, nothing is retried and a plan that was already created stays
//! on the service.

use std::{sync::Arc, time::Duration};

use courier_ptv::{
    RouteOptimizationService,
    job_status::JobStatus,
    optimized_plan::OptimizedPlan,
    plan::{Plan, PlanRequest},
};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::error::LifecycleError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    PlanCreated { plan_id: String },
    Optimizing { plan_id: String },
    Fetching { plan_id: String },
    Done { plan_id: String },
    Failed,
}

impl LifecycleState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Done { .. } | LifecycleState::Failed)
    }

    pub fn plan_id(&self) -> Option<&str> {
        match self {
            LifecycleState::PlanCreated { plan_id }
            | LifecycleState::Optimizing { plan_id }
            | LifecycleState::Fetching { plan_id }
            | LifecycleState::Done { plan_id } => Some(plan_id),
            LifecycleState::Idle | LifecycleState::Failed => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleParams {
    pub poll_interval: Duration,
    /// Give up after this many polls. `None` polls until a terminal status.
    pub max_polls: Option<u32>,
}

impl Default for LifecycleParams {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: None,
        }
    }
}

struct Attempt {
    state: LifecycleState,
    cancel: Option<CancellationToken>,
}

pub struct PlanLifecycle {
    service: Arc<dyn RouteOptimizationService>,
    params: LifecycleParams,
    attempt: Mutex<Attempt>,
    on_state_change: Option<Box<dyn Fn(&LifecycleState) + Send + Sync>>,
}

impl PlanLifecycle {
    pub fn new(service: Arc<dyn RouteOptimizationService>, params: LifecycleParams) -> Self {
        Self {
            service,
            params,
            attempt: Mutex::new(Attempt {
                state: LifecycleState::Idle,
                cancel: None,
            }),
            on_state_change: None,
        }
    }

    /// Registers a callback invoked on every state transition.
    pub fn on_state_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LifecycleState) + Send + Sync + 'static,
    {
        self.on_state_change = Some(Box::new(callback));
        self
    }

    pub fn params(&self) -> &LifecycleParams {
        &self.params
    }

    pub fn state(&self) -> LifecycleState {
        self.attempt.lock().state.clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.attempt.lock().cancel.is_some()
    }

    fn set_state(&self, state: LifecycleState) {
        debug!("Lifecycle: {:?}", state);
        self.attempt.lock().state = state.clone();

        if let Some(callback) = &self.on_state_change {
            callback(&state);
        }
    }

    /// Stops the attempt in flight, if any. Polling ends before the next
    /// request is sent.
    pub fn cancel(&self) {
        if let Some(cancel) = &self.attempt.lock().cancel {
            cancel.cancel();
        }
    }

    /// Submits a new plan built from the request.
    #[instrument(skip_all, level = "debug")]
    pub async fn create(&self, request: &PlanRequest) -> Result<Plan, LifecycleError> {
        if request.transports.is_empty() {
            return Err(LifecycleError::InvalidPlan(
                "at least one transport is required".to_owned(),
            ));
        }

        if let Some((transport_id, location_id)) = request.find_dangling_location() {
            return Err(LifecycleError::InvalidPlan(format!(
                "{} references unknown location {}",
                transport_id, location_id
            )));
        }

        Ok(self.service.create_plan(request).await?)
    }

    pub async fn start(&self, plan_id: &str) -> Result<(), LifecycleError> {
        Ok(self.service.start_optimization(plan_id).await?)
    }

    /// Reads the optimization status once.
    pub async fn poll(&self, plan_id: &str) -> Result<JobStatus, LifecycleError> {
        self.poll_progress(plan_id).await.map(|(status, _)| status)
    }

    async fn poll_progress(
        &self,
        plan_id: &str,
    ) -> Result<(JobStatus, Option<String>), LifecycleError> {
        let progress = self.service.optimization_progress(plan_id).await?;
        let status = progress
            .job_status()
            .map_err(|unknown| LifecycleError::UnknownStatus(unknown.0))?;

        Ok((status, progress.error_message))
    }

    /// Polls every `interval` until the optimization ends, then fetches the
    /// optimized plan. Polls never overlap: the next one is scheduled once the
    /// previous response arrived.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn await_completion(
        &self,
        plan_id: &str,
        interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<OptimizedPlan, LifecycleError> {
        let mut polls = 0u32;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LifecycleError::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }

            polls += 1;
            let (status, message) = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(LifecycleError::Cancelled),
                progress = self.poll_progress(plan_id) => progress?,
            };
            debug!("Lifecycle: Poll {} for plan {}: {}", polls, plan_id, status);

            match status {
                JobStatus::Running => {}
                JobStatus::Succeeded => {
                    self.set_state(LifecycleState::Fetching {
                        plan_id: plan_id.to_owned(),
                    });
                    let plan = self.service.optimized_plan(plan_id).await?;
                    check_result(&plan)?;
                    return Ok(plan);
                }
                JobStatus::Failed | JobStatus::Canceled => {
                    return Err(LifecycleError::JobFailed {
                        plan_id: plan_id.to_owned(),
                        status,
                        message,
                    });
                }
            }

            if self.params.max_polls.is_some_and(|max| polls >= max) {
                return Err(LifecycleError::Timeout(polls));
            }
        }
    }

    /// Runs a full attempt. Rejected with [`LifecycleError::Busy`] while
    /// another attempt is in flight.
    pub async fn optimize(&self, request: PlanRequest) -> Result<OptimizedPlan, LifecycleError> {
        let guard = AttemptGuard::begin(self)?;

        let result = self.run(&request, &guard.cancel).await;
        match &result {
            Ok(plan) => {
                info!("Lifecycle: Plan {} optimized, {} routes", plan.id, plan.routes.len());
                self.set_state(LifecycleState::Done {
                    plan_id: plan.id.clone(),
                });
            }
            Err(error) => {
                if let Some(plan_id) = self.state().plan_id() {
                    warn!("Lifecycle: Plan {} left on the service", plan_id);
                }
                warn!("Lifecycle: Optimization failed: {}", error);
                self.set_state(LifecycleState::Failed);
            }
        }

        result
    }

    async fn run(
        &self,
        request: &PlanRequest,
        cancel: &CancellationToken,
    ) -> Result<OptimizedPlan, LifecycleError> {
        info!(
            "Lifecycle: Creating plan with {} transports and {} vehicles",
            request.transports.len(),
            request.vehicles.len()
        );
        let plan = self.create(request).await?;
        self.set_state(LifecycleState::PlanCreated {
            plan_id: plan.id.clone(),
        });

        self.start(&plan.id).await?;
        info!("Lifecycle: Optimization of plan {} started", plan.id);
        self.set_state(LifecycleState::Optimizing {
            plan_id: plan.id.clone(),
        });

        self.await_completion(&plan.id, self.params.poll_interval, cancel)
            .await
    }
}

/// Marks an attempt as in flight for as long as it lives. An attempt whose
/// future is dropped midway ends up `Failed`.
struct AttemptGuard<'a> {
    lifecycle: &'a PlanLifecycle,
    cancel: CancellationToken,
}

impl<'a> AttemptGuard<'a> {
    fn begin(lifecycle: &'a PlanLifecycle) -> Result<Self, LifecycleError> {
        let cancel = CancellationToken::new();
        {
            let mut attempt = lifecycle.attempt.lock();
            if attempt.cancel.is_some() {
                return Err(LifecycleError::Busy);
            }
            attempt.cancel = Some(cancel.clone());
        }
        lifecycle.set_state(LifecycleState::Idle);

        Ok(Self { lifecycle, cancel })
    }
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        self.cancel.cancel();

        let interrupted = {
            let mut attempt = self.lifecycle.attempt.lock();
            attempt.cancel = None;
            !attempt.state.is_terminal()
        };

        if interrupted {
            self.lifecycle.set_state(LifecycleState::Failed);
        }
    }
}

/// Every stop must point at a location of the plan and every used vehicle
/// must have a route.
fn check_result(plan: &OptimizedPlan) -> Result<(), LifecycleError> {
    for route in &plan.routes {
        if let Some(stop) = route
            .stops
            .iter()
            .find(|stop| plan.location(&stop.location_id).is_none())
        {
            return Err(LifecycleError::IncompleteResult(format!(
                "route of {} visits unknown location {}",
                route.vehicle_id, stop.location_id
            )));
        }
    }

    if let Some(vehicle) = plan
        .used_vehicles()
        .find(|vehicle| plan.route_for_vehicle(&vehicle.id).is_none())
    {
        return Err(LifecycleError::IncompleteResult(format!(
            "no route for used vehicle {}",
            vehicle.id
        )));
    }

    Ok(())
}
