pub mod client;
pub mod endpoints;
pub mod error;
pub mod geocoding;
pub mod job_status;
pub mod optimized_plan;
pub mod plan;
pub mod service;
pub mod vehicle_profile;

pub use client::{PtvClient, PtvClientParams};
pub use error::PtvError;
pub use service::RouteOptimizationService;
