//! Response shapes.
//!
//! Stored records are remapped into these before they leave the server, so
//! the on-disk layout can change without breaking clients.

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::{Attendee, DateSelection, Event};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventView {
    pub id: String,
    pub name: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dates: Vec<NaiveDate>,
    pub attendees: Vec<AttendeeView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeView {
    pub name: String,
    pub dates: Vec<DateSelection>,
}

/// One attendee across every event they answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeSummary {
    pub name: String,
    pub events: Vec<AttendeeEvent>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendeeEvent {
    pub id: String,
    pub name: String,
    pub dates: Vec<DateSelection>,
}

/// Confirmation body for deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message {
            message: message.into(),
        }
    }
}

impl From<&Attendee> for AttendeeView {
    fn from(attendee: &Attendee) -> Self {
        AttendeeView {
            name: attendee.name.clone(),
            dates: attendee.dates.clone(),
        }
    }
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        EventView {
            id: event.id.clone(),
            name: event.name.clone(),
            author: event.author.clone(),
            description: event.description.clone(),
            dates: event.dates.clone(),
            attendees: event.attendees.iter().map(AttendeeView::from).collect(),
        }
    }
}
