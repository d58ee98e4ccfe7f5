pub mod format;
pub mod kpis;
pub mod map_layers;
pub mod presenter;
pub mod route_details;

pub use kpis::{Kpis, kpis};
pub use map_layers::{map_layers, route_lines};
pub use presenter::{OptimizationView, Presenter};
pub use route_details::{RouteDetails, StopEvent, StopRow, route_details};
