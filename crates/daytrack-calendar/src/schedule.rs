//! Rolling 3-week schedule view: Monday-start week math, bucketing of
//! events into day cells, and the keyword heuristics that tag an event as a
//! meeting or a call.

use chrono::{Datelike, Duration, NaiveDate};

use crate::types::Event;

const MEETING_SUBJECT_KEYWORDS: &[&str] = &["meeting", "standup", "sync", "review"];
const MEETING_LOCATION_KEYWORDS: &[&str] = &["teams", "zoom"];
const CALL_SUBJECT_KEYWORDS: &[&str] = &["call", "phone", "dial"];
const CALL_LOCATION_KEYWORDS: &[&str] = &["phone"];
const CALL_BODY_KEYWORDS: &[&str] = &["call"];

/// The Monday of the week containing `date`. Sunday belongs to the
/// preceding Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Which of the three displayed weeks a `Week` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekSlot {
    Previous,
    Current,
    Next,
}

impl WeekSlot {
    pub fn label(&self) -> &'static str {
        match self {
            WeekSlot::Previous => "Previous Week",
            WeekSlot::Current => "Current Week",
            WeekSlot::Next => "Next Week",
        }
    }
}

/// One displayed week, starting on a Monday.
#[derive(Debug, Clone, Copy)]
pub struct Week {
    pub slot: WeekSlot,
    pub start: NaiveDate,
}

impl Week {
    /// The seven dates of this week.
    pub fn days(&self) -> [NaiveDate; 7] {
        let mut days = [self.start; 7];
        for (offset, day) in days.iter_mut().enumerate() {
            *day = self.start + Duration::days(offset as i64);
        }
        days
    }
}

/// The previous, current and next week around a reference date.
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow {
    pub weeks: [Week; 3],
}

impl RollingWindow {
    pub fn around(date: NaiveDate) -> Self {
        let current = week_start(date);
        Self {
            weeks: [
                Week {
                    slot: WeekSlot::Previous,
                    start: current - Duration::days(7),
                },
                Week {
                    slot: WeekSlot::Current,
                    start: current,
                },
                Week {
                    slot: WeekSlot::Next,
                    start: current + Duration::days(7),
                },
            ],
        }
    }

    /// Window shifted one week back.
    pub fn previous(&self) -> Self {
        Self::around(self.weeks[1].start - Duration::days(7))
    }

    /// Window shifted one week forward.
    pub fn next(&self) -> Self {
        Self::around(self.weeks[1].start + Duration::days(7))
    }

    /// Fetch range covering all three weeks, end exclusive.
    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        let start = self.weeks[0].start;
        (start, start + Duration::days(21))
    }

    /// The 21 consecutive dates of the window.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.weeks.iter().flat_map(|week| week.days()).collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.range();
        date >= start && date < end
    }
}

/// A single day of the window with its events.
#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// Bucket events into the window's 21 day cells by their start date.
///
/// An event lands in exactly the cell matching its start's calendar date;
/// events outside the window are dropped. Within a cell events keep start
/// order.
pub fn bucket_events(window: &RollingWindow, events: &[Event]) -> Vec<DayCell> {
    let mut cells: Vec<DayCell> = window
        .days()
        .into_iter()
        .map(|date| DayCell {
            date,
            events: Vec::new(),
        })
        .collect();

    for event in events {
        let date = event.start_date();
        if let Some(cell) = cells.iter_mut().find(|cell| cell.date == date) {
            cell.events.push(event.clone());
        }
    }

    for cell in &mut cells {
        cell.events.sort_by_key(|event| event.start);
    }

    cells
}

/// How an event is rendered and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Call,
    Meeting,
    Other,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Meeting heuristic: subject/location keywords, or more than one attendee.
pub fn is_meeting(event: &Event) -> bool {
    let subject = event.subject.to_lowercase();
    let location = event.location.as_deref().unwrap_or("").to_lowercase();

    contains_any(&subject, MEETING_SUBJECT_KEYWORDS)
        || contains_any(&location, MEETING_LOCATION_KEYWORDS)
        || event.attendees.len() > 1
}

/// Call heuristic: subject/location keywords, or "call" in the body text.
pub fn is_call(event: &Event) -> bool {
    let subject = event.subject.to_lowercase();
    let location = event.location.as_deref().unwrap_or("").to_lowercase();
    let body = event.body_text.as_deref().unwrap_or("").to_lowercase();

    contains_any(&subject, CALL_SUBJECT_KEYWORDS)
        || contains_any(&location, CALL_LOCATION_KEYWORDS)
        || contains_any(&body, CALL_BODY_KEYWORDS)
}

/// Classify an event. When both heuristics match, call wins.
pub fn classify(event: &Event) -> EventKind {
    if is_call(event) {
        EventKind::Call
    } else if is_meeting(event) {
        EventKind::Meeting
    } else {
        EventKind::Other
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::Attendee;
    use chrono::{NaiveDateTime, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event_at(id: &str, subject: &str, start: &str) -> Event {
        let start = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M:%S").unwrap();
        Event {
            id: id.to_string(),
            subject: subject.to_string(),
            body_text: None,
            location: None,
            start,
            end: start + Duration::hours(1),
            time_zone: None,
            attendees: vec![],
            all_day: false,
        }
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2025-09-06 is a Saturday
        let monday = week_start(date(2025, 9, 6));
        assert_eq!(monday, date(2025, 9, 1));
        assert_eq!(monday.weekday(), Weekday::Mon);

        // A Monday maps to itself
        assert_eq!(week_start(date(2025, 9, 1)), date(2025, 9, 1));

        // Sunday belongs to the preceding Monday
        assert_eq!(week_start(date(2025, 9, 7)), date(2025, 9, 1));
    }

    #[test]
    fn test_window_covers_three_weeks() {
        let window = RollingWindow::around(date(2025, 9, 6));

        assert_eq!(window.weeks[0].start, date(2025, 8, 25));
        assert_eq!(window.weeks[1].start, date(2025, 9, 1));
        assert_eq!(window.weeks[2].start, date(2025, 9, 8));

        let (start, end) = window.range();
        assert_eq!(start, date(2025, 8, 25));
        assert_eq!(end, date(2025, 9, 15));

        assert_eq!(window.days().len(), 21);
    }

    #[test]
    fn test_window_navigation() {
        let window = RollingWindow::around(date(2025, 9, 6));

        assert_eq!(window.next().weeks[1].start, date(2025, 9, 8));
        assert_eq!(window.previous().weeks[1].start, date(2025, 8, 25));
        // Going forward then back lands on the same window
        assert_eq!(
            window.next().previous().weeks[1].start,
            window.weeks[1].start
        );
    }

    #[test]
    fn test_event_lands_in_exactly_one_cell() {
        let window = RollingWindow::around(date(2025, 9, 6));
        let event = event_at("e1", "Dentist", "2025-09-03T10:00:00");

        let cells = bucket_events(&window, &[event]);

        assert_eq!(cells.len(), 21);
        let holding: Vec<&DayCell> =
            cells.iter().filter(|cell| !cell.events.is_empty()).collect();
        assert_eq!(holding.len(), 1);
        assert_eq!(holding[0].date, date(2025, 9, 3));
    }

    #[test]
    fn test_out_of_window_events_are_dropped() {
        let window = RollingWindow::around(date(2025, 9, 6));
        let event = event_at("e1", "Far future", "2025-10-20T10:00:00");

        let cells = bucket_events(&window, &[event]);
        assert!(cells.iter().all(|cell| cell.events.is_empty()));
        assert!(!window.contains(date(2025, 10, 20)));
    }

    #[test]
    fn test_cell_events_keep_start_order() {
        let window = RollingWindow::around(date(2025, 9, 6));
        let later = event_at("late", "Afternoon", "2025-09-03T15:00:00");
        let earlier = event_at("early", "Morning", "2025-09-03T08:00:00");

        let cells = bucket_events(&window, &[later, earlier]);
        let cell = cells.iter().find(|c| c.date == date(2025, 9, 3)).unwrap();
        assert_eq!(cell.events[0].id, "early");
        assert_eq!(cell.events[1].id, "late");
    }

    #[test]
    fn test_standup_is_a_meeting() {
        let event = event_at("e1", "Daily standup", "2025-09-03T09:30:00");
        assert!(is_meeting(&event));
        assert_eq!(classify(&event), EventKind::Meeting);
    }

    #[test]
    fn test_call_subject_is_a_call() {
        let event = event_at("e1", "Call with the bank", "2025-09-03T09:30:00");
        assert!(is_call(&event));
        assert_eq!(classify(&event), EventKind::Call);
    }

    #[test]
    fn test_two_attendees_imply_meeting() {
        let mut event = event_at("e1", "Quarterly numbers", "2025-09-03T09:30:00");
        assert_eq!(classify(&event), EventKind::Other);

        event.attendees = vec![
            Attendee {
                address: "a@example.com".to_string(),
                name: None,
            },
            Attendee {
                address: "b@example.com".to_string(),
                name: None,
            },
        ];
        assert_eq!(classify(&event), EventKind::Meeting);
    }

    #[test]
    fn test_location_keywords() {
        let mut event = event_at("e1", "Planning", "2025-09-03T09:30:00");
        event.location = Some("Microsoft Teams".to_string());
        assert!(is_meeting(&event));

        event.location = Some("Phone booth 2".to_string());
        assert!(is_call(&event));
    }

    #[test]
    fn test_call_wins_over_meeting() {
        // "review" marks a meeting, "call" marks a call; call takes precedence
        let event = event_at("e1", "Call review", "2025-09-03T09:30:00");
        assert!(is_meeting(&event));
        assert!(is_call(&event));
        assert_eq!(classify(&event), EventKind::Call);
    }

    #[test]
    fn test_body_text_marks_a_call() {
        let mut event = event_at("e1", "Catch up", "2025-09-03T09:30:00");
        event.body_text = Some("I'll call you on the usual number".to_string());
        assert_eq!(classify(&event), EventKind::Call);
    }
}
