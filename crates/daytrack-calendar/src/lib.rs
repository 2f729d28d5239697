//! Calendar integration for daytrack.
//!
//! Provides the vendor calendar API client, the sign-in session, and the
//! rolling 3-week schedule view helpers.

pub mod client;
pub mod error;
pub mod schedule;
pub mod sync;
pub mod types;

pub use client::CalendarClient;
pub use error::CalendarError;
pub use schedule::{
    bucket_events, classify, is_call, is_meeting, week_start, DayCell, EventKind, RollingWindow,
    Week, WeekSlot,
};
pub use sync::CalendarSession;
pub use types::{Attendee, Event, UserProfile};
