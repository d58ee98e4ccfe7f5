use std::time::Duration;

use comfy_table::{Table, presets::UTF8_FULL};
use courier_planner::{
    LifecycleState, PlanningSession,
    presentation::{
        Kpis, OptimizationView, Presenter, RouteDetails,
        format::{format_meters_to_kilometers, format_seconds_to_hh_mm, format_time_of_day},
    },
};
use courier_ptv::geocoding::GeocodedLocation;
use indicatif::ProgressBar;
use jiff::tz::TimeZone;
use parking_lot::Mutex;

/// Prints results as tables and shows a spinner while an optimization runs.
pub struct TerminalPresenter {
    spinner: Mutex<Option<ProgressBar>>,
    time_zone: TimeZone,
}

impl TerminalPresenter {
    pub fn new(time_zone: TimeZone) -> Self {
        Self {
            spinner: Mutex::new(None),
            time_zone,
        }
    }

    fn set_progress(&self, message: String) {
        let mut spinner = self.spinner.lock();
        let spinner = spinner.get_or_insert_with(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner
        });
        spinner.set_message(message);
    }

    fn clear_progress(&self) {
        if let Some(spinner) = self.spinner.lock().take() {
            spinner.finish_and_clear();
        }
    }
}

impl Presenter for TerminalPresenter {
    fn lifecycle_changed(&self, state: &LifecycleState) {
        match state {
            LifecycleState::Idle => self.set_progress("Creating plan...".to_owned()),
            LifecycleState::PlanCreated { plan_id } => {
                self.set_progress(format!("Starting optimization of {plan_id}..."))
            }
            LifecycleState::Optimizing { plan_id } => {
                self.set_progress(format!("Optimizing {plan_id}..."))
            }
            LifecycleState::Fetching { plan_id } => {
                self.set_progress(format!("Fetching {plan_id}..."))
            }
            LifecycleState::Done { .. } | LifecycleState::Failed => self.clear_progress(),
        }
    }

    fn plan_optimized(&self, view: &OptimizationView) {
        println!("{}", kpi_table(&view.kpis));
        self.vehicle_selected(view.route_details.as_ref());
    }

    fn vehicle_selected(&self, details: Option<&RouteDetails>) {
        match details {
            Some(details) => println!("{}", route_text(details, &self.time_zone)),
            None => println!("No vehicle was used"),
        }
    }

    fn optimization_failed(&self, payload: &serde_json::Value) {
        self.clear_progress();
        eprintln!(
            "Optimization failed:\n{}",
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
        );
    }
}

fn table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table
}

pub fn suggestions_table(suggestions: &[GeocodedLocation]) -> Table {
    let mut table = table();
    table.set_header(vec!["#", "Address"]);
    for (index, suggestion) in suggestions.iter().enumerate() {
        table.add_row(vec![(index + 1).to_string(), suggestion.label()]);
    }
    table
}

pub fn transports_table(session: &PlanningSession) -> Table {
    let address = |location_id: &str| {
        session
            .lookup_address(location_id)
            .map(|location| location.formatted_address.clone())
            .unwrap_or_else(|| location_id.to_owned())
    };

    let mut table = table();
    table.set_header(vec!["Transport", "Pickup", "Delivery"]);
    for transport in session.transports() {
        table.add_row(vec![
            transport.id.clone(),
            address(&transport.pickup_location_id),
            address(&transport.delivery_location_id),
        ]);
    }
    table
}

pub fn route_text(details: &RouteDetails, time_zone: &TimeZone) -> String {
    let mut table = table();
    table.set_header(vec!["#", "Stop", "Event", "Arrival"]);
    for row in &details.rows {
        table.add_row(vec![
            row.number.to_string(),
            row.address.clone(),
            row.event.to_string(),
            format_time_of_day(row.arrival_time, time_zone),
        ]);
    }

    format!(
        "{}\n{}\nDistance: {}, travel time: {}",
        details.vehicle_id,
        table,
        format_meters_to_kilometers(details.distance),
        format_seconds_to_hh_mm(details.travel_time)
    )
}

pub fn kpi_table(kpis: &Kpis) -> Table {
    let mut table = table();
    table.set_header(vec!["KPI", "Value"]);
    table.add_row(vec!["Used vehicles".to_owned(), kpis.used_vehicles.to_string()]);
    table.add_row(vec!["Unused vehicles".to_owned(), kpis.unused_vehicles.to_string()]);
    table.add_row(vec![
        "Planned transports".to_owned(),
        kpis.planned_transports.to_string(),
    ]);
    table.add_row(vec![
        "Unplanned transports".to_owned(),
        kpis.unplanned_transports.to_string(),
    ]);
    table.add_row(vec![
        "Total travel time".to_owned(),
        format_seconds_to_hh_mm(kpis.total_travel_time),
    ]);
    table.add_row(vec![
        "Total driving time".to_owned(),
        format_seconds_to_hh_mm(kpis.total_driving_time),
    ]);
    table.add_row(vec![
        "Total distance".to_owned(),
        format_meters_to_kilometers(kpis.total_distance),
    ]);
    table.add_row(vec![
        "Total break time".to_owned(),
        format_seconds_to_hh_mm(kpis.total_break_time),
    ]);
    table.add_row(vec![
        "Total rest time".to_owned(),
        format_seconds_to_hh_mm(kpis.total_rest_time),
    ]);
    table.add_row(vec![
        "Total waiting time".to_owned(),
        format_seconds_to_hh_mm(kpis.total_waiting_time),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use courier_planner::presentation::{StopEvent, StopRow};

    use super::*;

    #[test]
    fn test_kpi_table() {
        let kpis = Kpis {
            used_vehicles: 1,
            total_distance: 4350,
            total_travel_time: 1620,
            ..Kpis::default()
        };

        let text = kpi_table(&kpis).to_string();

        assert!(text.contains("Used vehicles"));
        assert!(text.contains("4.35 km"));
        assert!(text.contains("00 h 27 min"));
    }

    #[test]
    fn test_route_text() {
        let details = RouteDetails {
            vehicle_id: "Vehicle 1".to_owned(),
            rows: vec![StopRow {
                number: 1,
                location_id: "P1".to_owned(),
                address: "Alexanderplatz".to_owned(),
                event: StopEvent::Pickup,
                arrival_time: "2026-10-19T08:00:00Z".parse().unwrap(),
            }],
            distance: 1000,
            travel_time: 600,
        };

        let text = route_text(&details, &TimeZone::UTC);

        assert!(text.starts_with("Vehicle 1\n"));
        assert!(text.contains("Alexanderplatz"));
        assert!(text.contains("08:00:00"));
        assert!(text.ends_with("Distance: 1 km, travel time: 00 h 10 min"));
    }
}
