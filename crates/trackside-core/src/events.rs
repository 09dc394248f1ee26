//! Race events as supplied by the hosting page.

use crate::error::CalendarError;
use chrono::{Datelike, NaiveDate};
use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceStatus {
    Complete,
    Upcoming,
    Testing,
}

impl RaceStatus {
    /// Badge text shown on calendar cells and in the detail view.
    pub fn badge_label(self) -> &'static str {
        match self {
            RaceStatus::Testing => "Testing",
            RaceStatus::Complete | RaceStatus::Upcoming => "Race Weekend",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaceEvent {
    /// Calendar day, serialised as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub title: String,
    pub track: String,
    pub result: String,
    pub status: RaceStatus,
}

impl RaceEvent {
    pub fn new(
        date: &str,
        title: impl Into<String>,
        track: impl Into<String>,
        result: impl Into<String>,
        status: RaceStatus,
    ) -> Result<Self, CalendarError> {
        Ok(Self {
            date: parse_date_key(date)?,
            title: title.into(),
            track: track.into(),
            result: result.into(),
            status,
        })
    }

    pub fn date_key(&self) -> String {
        date_key(self.date)
    }
}

/// Parse a JSON array of events (`[{ "date": "2026-02-14", ... }]`).
pub fn events_from_json(json: &str) -> Result<Vec<RaceEvent>, CalendarError> {
    Ok(serde_json::from_str(json)?)
}

#[inline]
pub fn parse_date_key(s: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CalendarError::InvalidDate(s.to_string()))
}

#[inline]
pub fn date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Host-provided mapping from status to a display style token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusStyling(FnvHashMap<RaceStatus, String>);

impl StatusStyling {
    /// Token for `status`, empty when the host did not style it.
    pub fn token(&self, status: RaceStatus) -> &str {
        self.0.get(&status).map(String::as_str).unwrap_or("")
    }

    pub fn from_json(json: &str) -> Result<Self, CalendarError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_json_uses_plain_date_keys() {
        let json = r#"[{"date":"2026-03-28","title":"Spring Test and Tune","track":"Sebring International Raceway","result":"Data Session","status":"Testing"}]"#;
        let events = events_from_json(json).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2026, 3, 28).unwrap());
        assert_eq!(events[0].status, RaceStatus::Testing);
        assert_eq!(events[0].date_key(), "2026-03-28");
    }

    #[test]
    fn bad_date_is_reported() {
        let err = parse_date_key("2026-13-01").unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDate(ref s) if s == "2026-13-01"));
    }

    #[test]
    fn badge_label_groups_race_statuses() {
        assert_eq!(RaceStatus::Testing.badge_label(), "Testing");
        assert_eq!(RaceStatus::Complete.badge_label(), "Race Weekend");
        assert_eq!(RaceStatus::Upcoming.badge_label(), "Race Weekend");
    }

    #[test]
    fn styling_tokens_fall_back_to_empty() {
        let styling = StatusStyling::from_json(r#"{"Complete":"badge-done"}"#).unwrap();
        assert_eq!(styling.token(RaceStatus::Complete), "badge-done");
        assert_eq!(styling.token(RaceStatus::Upcoming), "");
    }

    #[test]
    fn malformed_event_json_is_an_error() {
        let err = events_from_json(r#"[{"date":"2026-03-28","title":"#).unwrap_err();
        assert!(matches!(err, CalendarError::MalformedEvents(_)));
        assert!(err.to_string().starts_with("malformed event list"));
    }

    #[test]
    fn non_iso_event_date_is_rejected() {
        let json = r#"[{"date":"03/28/2026","title":"Spring Test","track":"Sebring","result":"TBD","status":"Testing"}]"#;
        assert!(matches!(events_from_json(json), Err(CalendarError::MalformedEvents(_))));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"[{"date":"2026-03-28","title":"Spring Test","track":"Sebring","result":"TBD","status":"Cancelled"}]"#;
        assert!(events_from_json(json).is_err());
        assert!(matches!(
            StatusStyling::from_json(r#"{"Cancelled":"badge-x"}"#),
            Err(CalendarError::MalformedEvents(_))
        ));
    }
}
