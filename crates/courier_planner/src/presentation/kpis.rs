use courier_ptv::optimized_plan::OptimizedPlan;
use serde::Serialize;

/// Plan-wide figures. Distances in meters, durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub used_vehicles: usize,
    pub unused_vehicles: usize,
    pub planned_transports: usize,
    pub unplanned_transports: usize,
    pub total_travel_time: u64,
    pub total_driving_time: u64,
    pub total_distance: u64,
    pub total_break_time: u64,
    pub total_rest_time: u64,
    pub total_waiting_time: u64,
}

pub fn kpis(plan: &OptimizedPlan) -> Kpis {
    let totals = plan.routes.iter().fold(Kpis::default(), |mut kpis, route| {
        kpis.total_travel_time += route.report.travel_time;
        kpis.total_driving_time += route.report.driving_time;
        kpis.total_distance += route.report.distance;
        kpis.total_break_time += route.report.break_time;
        kpis.total_rest_time += route.report.rest_time;
        kpis.total_waiting_time += route.report.waiting_time;
        kpis
    });

    Kpis {
        used_vehicles: plan
            .vehicles
            .len()
            .saturating_sub(plan.unplanned_vehicle_ids.len()),
        unused_vehicles: plan.unplanned_vehicle_ids.len(),
        planned_transports: plan
            .transports
            .len()
            .saturating_sub(plan.unplanned_transport_ids.len()),
        unplanned_transports: plan.unplanned_transport_ids.len(),
        ..totals
    }
}
