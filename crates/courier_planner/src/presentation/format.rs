use jiff::{Timestamp, tz::TimeZone};

pub fn format_meters_to_kilometers(meters: u64) -> String {
    format!("{} km", meters as f64 / 1000.0)
}

/// `3720` becomes `01 h 02 min`. Seconds are dropped.
pub fn format_seconds_to_hh_mm(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;

    format!("{:02} h {:02} min", hours, minutes)
}

pub fn format_time_of_day(timestamp: Timestamp, time_zone: &TimeZone) -> String {
    timestamp
        .to_zoned(time_zone.clone())
        .strftime("%H:%M:%S")
        .to_string()
}
