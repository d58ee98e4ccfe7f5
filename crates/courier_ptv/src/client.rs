use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::{
    endpoints::{Endpoints, PTV_API_URL, TWEAKS_TO_OBJECTIVE},
    error::PtvError,
    geocoding::{GeocodedLocation, LocationsResponse},
    job_status::OptimizationProgress,
    optimized_plan::OptimizedPlan,
    plan::{Plan, PlanRequest},
    service::RouteOptimizationService,
};

pub const API_KEY_HEADER: &str = "apiKey";

const API_KEY_ENV_VAR: &str = "PTV_API_KEY";
const BASE_URL_ENV_VAR: &str = "PTV_BASE_URL";

#[derive(Debug, Clone)]
pub struct PtvClientParams {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl PtvClientParams {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: PTV_API_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Reads `PTV_API_KEY` (required) and `PTV_BASE_URL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR)
            .map_err(|_| anyhow::anyhow!("{} is not set", API_KEY_ENV_VAR))?;

        let mut params = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            params.base_url = base_url;
        }

        Ok(params)
    }
}

pub struct PtvClient {
    api_key: String,
    endpoints: Endpoints,
    client: reqwest::Client,
}

impl PtvClient {
    pub fn new(params: PtvClientParams) -> Result<Self, PtvError> {
        let client = reqwest::Client::builder()
            .timeout(params.request_timeout)
            .build()?;

        Ok(Self {
            api_key: params.api_key,
            endpoints: Endpoints::new(params.base_url),
            client,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn with_api_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.api_key)
    }

    async fn check_status(response: Response) -> Result<Response, PtvError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.inspect_err(|error| {
                debug!("PtvApi: Could not read the {} error body: {}", status, error)
            })?;
            Err(PtvError::from_status(status, &body))
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, PtvError> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RouteOptimizationService for PtvClient {
    #[instrument(skip(self), level = "debug")]
    async fn search_locations(
        &self,
        search_text: &str,
    ) -> Result<Vec<GeocodedLocation>, PtvError> {
        let response = self
            .with_api_key(self.client.get(self.endpoints.search_locations()))
            .query(&[("searchText", search_text)])
            .send()
            .await?;

        let locations: LocationsResponse = Self::handle_response(response).await?;
        debug!("PtvApi: {} suggestions", locations.locations.len());

        Ok(locations.locations)
    }

    #[instrument(skip_all, level = "debug")]
    async fn create_plan(&self, request: &PlanRequest) -> Result<Plan, PtvError> {
        let response = self
            .with_api_key(self.client.post(self.endpoints.create_plan()))
            .json(request)
            .send()
            .await?;

        let plan: Plan = Self::handle_response(response).await?;
        debug!("PtvApi: Created plan {}", plan.id);

        Ok(plan)
    }

    #[instrument(skip(self), level = "debug")]
    async fn start_optimization(&self, plan_id: &str) -> Result<(), PtvError> {
        let response = self
            .with_api_key(self.client.post(self.endpoints.start_optimization(plan_id)))
            .query(&[("tweaksToObjective", TWEAKS_TO_OBJECTIVE)])
            .send()
            .await?;

        Self::check_status(response).await?;
        debug!("PtvApi: Started optimization");

        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn optimization_progress(
        &self,
        plan_id: &str,
    ) -> Result<OptimizationProgress, PtvError> {
        let response = self
            .with_api_key(self.client.get(self.endpoints.optimization_progress(plan_id)))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn optimized_plan(&self, plan_id: &str) -> Result<OptimizedPlan, PtvError> {
        let response = self
            .with_api_key(self.client.get(self.endpoints.optimized_plan(plan_id)))
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
