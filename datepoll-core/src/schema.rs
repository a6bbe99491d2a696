//! Request body schemas.
//!
//! Each body is deserialized into one of these types, then checked with
//! [`Validate`] before any handler logic runs. Dates stay as raw strings
//! here so a bad one is reported against its field instead of failing the
//! whole JSON parse.

use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::date::{normalize_dates, parse_date, strip_time};
use crate::error::DatepollResult;
use crate::event::{Attendee, DateSelection, Event};

/// Body of `POST /events`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: String,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_dates"))]
    pub dates: Vec<String>,
}

/// Body of `PATCH /events/{id}`. Only these fields may be changed.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PatchEvent {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "author must not be empty"))]
    pub author: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_dates"))]
    pub dates: Option<Vec<String>>,
}

/// Body of `POST /events/{id}/add_dates`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddDates {
    #[validate(
        length(min = 1, message = "at least one date is required"),
        custom(function = "validate_dates")
    )]
    pub dates: Vec<String>,
}

/// Body of `POST|PATCH /events/{id}/attend`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttendance {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub dates: Vec<SelectionInput>,
}

/// One `{ date, available }` entry of an attendance body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SelectionInput {
    #[validate(custom(function = "validate_date"))]
    pub date: String,
    pub available: Option<bool>,
}

fn invalid_date(value: &str) -> ValidationError {
    let mut err = ValidationError::new("date");
    err.message = Some(Cow::from(format!("'{value}' is not a valid date")));
    err.add_param(Cow::from("value"), &value);
    err
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    match strip_time(value) {
        Some(_) => Ok(()),
        None => Err(invalid_date(value)),
    }
}

fn validate_dates(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| validate_date(v))
}

impl CreateEvent {
    /// Build the stored record: fresh id, normalized dates, no attendees.
    pub fn into_event(self) -> DatepollResult<Event> {
        let dates = normalize_dates(&self.dates)?;
        Ok(Event::new(self.name, self.author, self.description, dates))
    }
}

impl PatchEvent {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.author.is_none() && self.description.is_none() && self.dates.is_none()
    }
}

impl CreateAttendance {
    /// Parse into an attendee. Selections are not yet checked against any event.
    pub fn into_attendee(self) -> DatepollResult<Attendee> {
        let dates = self
            .dates
            .into_iter()
            .map(|s| {
                Ok(DateSelection {
                    date: parse_date(&s.date)?,
                    available: s.available.unwrap_or(true),
                })
            })
            .collect::<DatepollResult<Vec<_>>>()?;

        Ok(Attendee { name: self.name, dates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_create_event_valid() {
        let body: CreateEvent = serde_json::from_str(
            r#"{"name":"Standup","author":"alice","dates":["2024-01-01","2024-01-02T09:00:00Z"]}"#,
        )
        .unwrap();
        assert!(body.validate().is_ok());

        let event = body.into_event().unwrap();
        assert_eq!(event.dates.len(), 2);
        assert_eq!(event.dates[1], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_create_event_reports_fields() {
        let body: CreateEvent =
            serde_json::from_str(r#"{"name":"","author":"alice","dates":["someday"]}"#).unwrap();
        let errors = body.validate().unwrap_err();
        let fields = errors.field_errors();

        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("dates"));
        assert!(!fields.contains_key("author"));
    }

    #[test]
    fn test_create_event_requires_author() {
        let parsed = serde_json::from_str::<CreateEvent>(r#"{"name":"Standup"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<PatchEvent>(r#"{"id":"other"}"#);
        assert!(parsed.is_err());

        let parsed = serde_json::from_str::<PatchEvent>(r#"{"attendees":[]}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_patch_validates_dates() {
        let patch: PatchEvent = serde_json::from_str(r#"{"dates":["2024-01-01","bad"]}"#).unwrap();
        let errors = patch.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("dates"));

        let patch: PatchEvent = serde_json::from_str(r#"{"description":"x"}"#).unwrap();
        assert!(patch.validate().is_ok());
        assert!(!patch.is_empty());
        assert!(PatchEvent::default().is_empty());
    }

    #[test]
    fn test_add_dates_requires_one() {
        let body: AddDates = serde_json::from_str(r#"{"dates":[]}"#).unwrap();
        assert!(body.validate().is_err());
    }

    #[test]
    fn test_attendance_nested_dates() {
        let body: CreateAttendance =
            serde_json::from_str(r#"{"name":"bob","dates":[{"date":"2024-01-01"},{"date":"x"}]}"#)
                .unwrap();
        assert!(body.validate().is_err());

        let body: CreateAttendance = serde_json::from_str(
            r#"{"name":"bob","dates":[{"date":"2024-01-01"},{"date":"2024-01-02","available":false}]}"#,
        )
        .unwrap();
        assert!(body.validate().is_ok());

        let attendee = body.into_attendee().unwrap();
        assert_eq!(attendee.name, "bob");
        assert!(attendee.dates[0].available);
        assert!(!attendee.dates[1].available);
    }
}
