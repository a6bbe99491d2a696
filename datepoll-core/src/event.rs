//! Stored event types.
//!
//! These are the records persisted in the JSON document. The HTTP layer never
//! returns them directly; see [`crate::view`] for the wire shape.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduling proposal: candidate dates plus who can make which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub dates: Vec<NaiveDate>,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

/// A named participant's availability within one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: String,
    #[serde(default)]
    pub dates: Vec<DateSelection>,
}

/// One date an attendee answered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    pub date: NaiveDate,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl Event {
    /// Create an event with a fresh id and no attendees.
    pub fn new(name: String, author: String, description: Option<String>, dates: Vec<NaiveDate>) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            name,
            author,
            description,
            dates,
            attendees: Vec::new(),
        }
    }

    pub fn has_date(&self, date: &NaiveDate) -> bool {
        self.dates.contains(date)
    }

    pub fn attendee_position(&self, name: &str) -> Option<usize> {
        self.attendees.iter().position(|a| a.name == name)
    }

    pub fn attendee(&self, name: &str) -> Option<&Attendee> {
        self.attendees.iter().find(|a| a.name == name)
    }

    /// Keep only the selections that refer to one of the event's dates,
    /// collapsing repeated answers for the same day to the first one.
    pub fn retain_known_dates(&self, selections: Vec<DateSelection>) -> Vec<DateSelection> {
        let mut kept: Vec<DateSelection> = Vec::with_capacity(selections.len());

        for selection in selections {
            if self.has_date(&selection.date) && !kept.iter().any(|s| s.date == selection.date) {
                kept.push(selection);
            }
        }

        kept
    }

    /// Drop every attendee selection that no longer has a matching event date.
    pub fn prune_stale_selections(&mut self) {
        let dates = &self.dates;
        for attendee in &mut self.attendees {
            attendee.dates.retain(|s| dates.contains(&s.date));
        }
    }
}
