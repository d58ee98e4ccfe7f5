pub mod error;
pub mod fleet;
pub mod lifecycle;
pub mod planner;
pub mod presentation;
pub mod session;

pub use error::{LifecycleError, PlannerError, SessionError};
pub use lifecycle::{LifecycleParams, LifecycleState, PlanLifecycle};
pub use planner::Planner;
pub use session::PlanningSession;

#[cfg(test)]
pub(crate) mod test_utils;
