use async_trait::async_trait;

use crate::{
    error::PtvError,
    geocoding::GeocodedLocation,
    job_status::OptimizationProgress,
    optimized_plan::OptimizedPlan,
    plan::{Plan, PlanRequest},
};

/// Remote operations needed to geocode addresses and run an optimization.
#[async_trait]
pub trait RouteOptimizationService: Send + Sync {
    async fn search_locations(&self, search_text: &str)
    -> Result<Vec<GeocodedLocation>, PtvError>;

    async fn create_plan(&self, request: &PlanRequest) -> Result<Plan, PtvError>;

    /// Returns as soon as the service accepted the job.
    async fn start_optimization(&self, plan_id: &str) -> Result<(), PtvError>;

    async fn optimization_progress(&self, plan_id: &str)
    -> Result<OptimizationProgress, PtvError>;

    async fn optimized_plan(&self, plan_id: &str) -> Result<OptimizedPlan, PtvError>;
}
