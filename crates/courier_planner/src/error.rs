use courier_ptv::{PtvError, job_status::JobStatus};
use thiserror::Error;

use crate::session::ServiceType;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Plan rejected: {status} - {body}")]
    Validation {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Service unreachable: {0}")]
    Transport(#[source] PtvError),

    #[error("Service error: {status} - {body}")]
    Service {
        status: u16,
        body: serde_json::Value,
    },

    #[error("Unknown optimization status: {0}")]
    UnknownStatus(String),

    #[error("Optimization of plan {plan_id} ended with status {status}")]
    JobFailed {
        plan_id: String,
        status: JobStatus,
        message: Option<String>,
    },

    #[error("Optimization still running after {0} polls")]
    Timeout(u32),

    #[error("Optimization cancelled")]
    Cancelled,

    #[error("Another optimization is already in progress")]
    Busy,

    #[error("Incomplete result: {0}")]
    IncompleteResult(String),
}

impl LifecycleError {
    /// Structured details to show to the user, verbatim from the service
    /// when it sent any.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            LifecycleError::Validation { body, .. } | LifecycleError::Service { body, .. } => {
                body.clone()
            }
            LifecycleError::JobFailed {
                plan_id,
                status,
                message,
            } => serde_json::json!({
                "planId": plan_id,
                "status": status.as_str(),
                "errorMessage": message,
            }),
            other => serde_json::Value::String(other.to_string()),
        }
    }
}

impl From<PtvError> for LifecycleError {
    fn from(error: PtvError) -> Self {
        match error {
            PtvError::Validation { status, body } => LifecycleError::Validation { status, body },
            PtvError::Service { status, body } => LifecycleError::Service { status, body },
            PtvError::Deserialize(error) => {
                LifecycleError::IncompleteResult(format!("malformed response: {error}"))
            }
            other => LifecycleError::Transport(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No {0} location selected")]
    MissingSelection(ServiceType),

    #[error("Opening hours end ({to}) before they start ({from})")]
    InvalidOpeningHours {
        from: jiff::civil::Time,
        to: jiff::civil::Time,
    },

    #[error("Service time of {0} minutes is too long")]
    InvalidServiceTime(u32),

    #[error("Invalid opening time: {0}")]
    Time(#[from] jiff::Error),

    #[error("Not allowed while an optimization is in progress")]
    OptimizationInProgress,

    #[error("No optimized plan available")]
    NoOptimizedPlan,
}

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Location search failed: {0}")]
    Search(#[from] PtvError),
}

impl PlannerError {
    pub fn payload(&self) -> serde_json::Value {
        match self {
            PlannerError::Lifecycle(error) => error.payload(),
            PlannerError::Search(error) => error
                .payload()
                .cloned()
                .unwrap_or_else(|| serde_json::Value::String(error.to_string())),
            PlannerError::Session(error) => serde_json::Value::String(error.to_string()),
        }
    }
}
