pub const PTV_API_URL: &str = "https://api.myptv.com";

pub const GEOCODING_API_PATH: &str = "/geocoding/v1";
pub const ROUTE_OPTIMIZATION_API_PATH: &str = "/routeoptimization/v1";

/// Objective tweak sent with every optimization start. The fleet size is
/// chosen by the user, so the service should not try to leave vehicles unused.
pub const TWEAKS_TO_OBJECTIVE: &str = "IGNORE_MINIMIZATION_OF_NUMBER_OF_ROUTES";

#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Expects the `searchText` query parameter.
    pub fn search_locations(&self) -> String {
        format!("{}{}/locations/by-text", self.base_url, GEOCODING_API_PATH)
    }

    pub fn create_plan(&self) -> String {
        format!("{}{}/plans", self.base_url, ROUTE_OPTIMIZATION_API_PATH)
    }

    /// Expects the `tweaksToObjective` query parameter.
    pub fn start_optimization(&self, plan_id: &str) -> String {
        format!(
            "{}{}/plans/{}/operation/optimization",
            self.base_url, ROUTE_OPTIMIZATION_API_PATH, plan_id
        )
    }

    pub fn optimization_progress(&self, plan_id: &str) -> String {
        format!(
            "{}{}/plans/{}/operation",
            self.base_url, ROUTE_OPTIMIZATION_API_PATH, plan_id
        )
    }

    pub fn optimized_plan(&self, plan_id: &str) -> String {
        format!(
            "{}{}/plans/{}",
            self.base_url, ROUTE_OPTIMIZATION_API_PATH, plan_id
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(PTV_API_URL)
    }
}
