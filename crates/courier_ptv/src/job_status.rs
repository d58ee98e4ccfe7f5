use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

/// Status of the optimization operation running on a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed,
    Canceled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Running => "RUNNING",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Canceled => "CANCELED",
        }
    }
}

impl Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operation status: {0}")]
pub struct UnknownJobStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownJobStatus;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "RUNNING" => Ok(JobStatus::Running),
            "SUCCEEDED" => Ok(JobStatus::Succeeded),
            "FAILED" => Ok(JobStatus::Failed),
            "CANCELED" | "CANCELLED" => Ok(JobStatus::Canceled),
            other => Err(UnknownJobStatus(other.to_owned())),
        }
    }
}

/// Raw body of the progress endpoint. The status is kept as a string so an
/// unexpected value can be reported instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationProgress {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl OptimizationProgress {
    pub fn job_status(&self) -> Result<JobStatus, UnknownJobStatus> {
        self.status.parse()
    }
}
