//! Calendar API types and data structures.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Calendar event as used by the schedule view.
///
/// Start and end hold the wall-clock time exactly as the service sent it;
/// day bucketing works on that local reading, not on the event's own
/// `timeZone` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub subject: String,
    pub body_text: Option<String>,
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub time_zone: Option<String>,
    pub attendees: Vec<Attendee>,
    pub all_day: bool,
}

impl Event {
    /// Calendar date the event starts on.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Event attendee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    pub address: String,
    pub name: Option<String>,
}

/// Profile of the signed-in user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub mail: Option<String>,
    pub user_principal_name: Option<String>,
}

// API Response Types

/// Event as returned by the Graph-style API.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub subject: Option<String>,
    pub body: Option<ApiItemBody>,
    pub start: Option<ApiDateTimeTimeZone>,
    pub end: Option<ApiDateTimeTimeZone>,
    pub location: Option<ApiLocation>,
    #[serde(default)]
    pub attendees: Vec<ApiAttendee>,
    #[serde(default)]
    pub is_all_day: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItemBody {
    pub content_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDateTimeTimeZone {
    pub date_time: String,
    pub time_zone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLocation {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAttendee {
    pub email_address: Option<ApiEmailAddress>,
}

#[derive(Debug, Deserialize)]
pub struct ApiEmailAddress {
    pub address: Option<String>,
    pub name: Option<String>,
}

/// API response for event list.
#[derive(Debug, Deserialize)]
pub struct EventListResponse {
    #[serde(default)]
    pub value: Vec<ApiEvent>,
}

impl Event {
    /// Convert API response to local Event.
    pub fn from_api(api: ApiEvent) -> Self {
        let start = api
            .start
            .as_ref()
            .and_then(|t| parse_wall_time(&t.date_time))
            .unwrap_or_default();
        let end = api
            .end
            .as_ref()
            .and_then(|t| parse_wall_time(&t.date_time))
            .unwrap_or(start);

        let attendees = api
            .attendees
            .into_iter()
            .filter_map(|a| a.email_address)
            .filter_map(|e| {
                e.address.map(|address| Attendee {
                    address,
                    name: e.name,
                })
            })
            .collect();

        Self {
            id: api.id.unwrap_or_default(),
            subject: api.subject.unwrap_or_default(),
            body_text: api.body.and_then(|b| b.content),
            location: api.location.and_then(|l| l.display_name),
            start,
            end,
            time_zone: api.start.and_then(|t| t.time_zone),
            attendees,
            all_day: api.is_all_day,
        }
    }
}

/// Parse a Graph-style timestamp as wall-clock time.
///
/// The service sends either a naive stamp with fractional seconds
/// ("2025-09-06T10:00:00.0000000") or an RFC3339 stamp; for the latter the
/// offset is dropped rather than converted.
fn parse_wall_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local()))
}
