//! World clock over a fixed set of cities.
//!
//! Formatting is pure; the one-second redraw cadence is the caller's
//! concern.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// City names and their IANA zones, in display order.
pub const WORLD_CLOCK_CITIES: &[(&str, &str)] = &[
    ("Sydney", "Australia/Sydney"),
    ("Stockholm", "Europe/Stockholm"),
    ("Belfast", "Europe/Belfast"),
    ("Lisbon", "Europe/Lisbon"),
    ("Bangkok", "Asia/Bangkok"),
    ("Perth", "Australia/Perth"),
    ("Singapore", "Asia/Singapore"),
    ("New York", "America/New_York"),
    ("Los Angeles", "America/Los_Angeles"),
];

/// City names in display order.
pub fn cities() -> impl Iterator<Item = &'static str> {
    WORLD_CLOCK_CITIES.iter().map(|(city, _)| *city)
}

/// The IANA zone of a known city.
pub fn zone_for(city: &str) -> Option<Tz> {
    WORLD_CLOCK_CITIES
        .iter()
        .find(|(name, _)| *name == city)
        .and_then(|(_, zone)| zone.parse().ok())
}

/// Format an instant as "h:mm AM/PM" in a city's zone.
pub fn time_in(city: &str, instant: DateTime<Utc>) -> Option<String> {
    let zone = zone_for(city)?;
    Some(instant.with_timezone(&zone).format("%-I:%M %p").to_string())
}

/// Current wall time in a city.
pub fn now_in(city: &str) -> Option<String> {
    time_in(city, Utc::now())
}
