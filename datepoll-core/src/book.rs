//! Event and attendance operations.
//!
//! An [`EventBook`] is one loaded copy of the document. Handlers load it,
//! run a single operation and save it back. Operations that fail leave the
//! book untouched, so a failed request never writes a half-applied change.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::date::normalize_dates;
use crate::error::{DatepollError, DatepollResult};
use crate::event::{Attendee, Event};
use crate::schema::{AddDates, CreateEvent, PatchEvent};
use crate::store::EventStore;
use crate::view::{AttendeeEvent, AttendeeSummary};

/// Where an event sat in the collection when a request was routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSlot {
    pub index: usize,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBook {
    events: Vec<Event>,
}

impl EventBook {
    pub fn new(events: Vec<Event>) -> Self {
        EventBook { events }
    }

    pub async fn load(store: &dyn EventStore) -> DatepollResult<Self> {
        Ok(EventBook::new(store.load().await?))
    }

    pub async fn save(&self, store: &dyn EventStore) -> DatepollResult<()> {
        store.write(&self.events).await
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|e| e.id == id)
    }

    /// Resolve `id` to a slot, or `EventNotFound`.
    pub fn slot(&self, id: &str) -> DatepollResult<EventSlot> {
        self.index_of(id)
            .map(|index| EventSlot {
                index,
                id: id.to_string(),
            })
            .ok_or_else(|| DatepollError::EventNotFound(id.to_string()))
    }

    /// Index for a previously resolved slot. Falls back to a scan when the
    /// collection shifted since the slot was taken.
    pub fn locate(&self, slot: &EventSlot) -> DatepollResult<usize> {
        match self.events.get(slot.index) {
            Some(event) if event.id == slot.id => Ok(slot.index),
            _ => self.slot(&slot.id).map(|s| s.index),
        }
    }

    pub fn get(&self, id: &str) -> DatepollResult<&Event> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| DatepollError::EventNotFound(id.to_string()))
    }

    pub fn event_at(&self, slot: &EventSlot) -> DatepollResult<&Event> {
        let index = self.locate(slot)?;
        Ok(&self.events[index])
    }

    fn event_at_mut(&mut self, slot: &EventSlot) -> DatepollResult<&mut Event> {
        let index = self.locate(slot)?;
        Ok(&mut self.events[index])
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// New events go to the front so listings are newest first.
    pub fn create(&mut self, body: CreateEvent) -> DatepollResult<&Event> {
        let event = body.into_event()?;
        self.events.insert(0, event);
        Ok(&self.events[0])
    }

    pub fn patch(&mut self, slot: &EventSlot, patch: PatchEvent) -> DatepollResult<&Event> {
        let dates = patch.dates.as_deref().map(normalize_dates).transpose()?;
        let event = self.event_at_mut(slot)?;

        if let Some(name) = patch.name {
            event.name = name;
        }
        if let Some(author) = patch.author {
            event.author = author;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(dates) = dates {
            event.dates = dates;
            event.prune_stale_selections();
        }

        Ok(event)
    }

    pub fn delete(&mut self, slot: &EventSlot) -> DatepollResult<Event> {
        let index = self.locate(slot)?;
        Ok(self.events.remove(index))
    }

    /// Append dates. Rejects the whole batch if any day is already present
    /// or appears twice in the batch.
    pub fn add_dates(&mut self, slot: &EventSlot, body: AddDates) -> DatepollResult<&Event> {
        let event = self.event_at_mut(slot)?;

        let mut added: Vec<NaiveDate> = Vec::with_capacity(body.dates.len());
        for raw in &body.dates {
            let date = crate::date::parse_date(raw)?;
            if event.has_date(&date) || added.contains(&date) {
                return Err(DatepollError::DateExists);
            }
            added.push(date);
        }

        event.dates.extend(added);
        Ok(event)
    }

    /// Remove a day from the event and from every attendee's answers.
    pub fn delete_date(&mut self, slot: &EventSlot, date: NaiveDate) -> DatepollResult<&Event> {
        let event = self.event_at_mut(slot)?;

        event.dates.retain(|d| *d != date);
        for attendee in &mut event.attendees {
            attendee.dates.retain(|s| s.date != date);
        }

        Ok(event)
    }

    // =========================================================================
    // Attendance
    // =========================================================================

    pub fn attend(&mut self, slot: &EventSlot, attendee: Attendee) -> DatepollResult<&Event> {
        let event = self.event_at_mut(slot)?;

        if event.attendee_position(&attendee.name).is_some() {
            return Err(DatepollError::AttendeeExists(attendee.name));
        }

        let dates = event.retain_known_dates(attendee.dates);
        event.attendees.push(Attendee {
            name: attendee.name,
            dates,
        });

        Ok(event)
    }

    /// Replace an existing attendee's answers, keeping their position.
    pub fn update_attendee(&mut self, slot: &EventSlot, attendee: Attendee) -> DatepollResult<&Event> {
        let event = self.event_at_mut(slot)?;

        let Some(position) = event.attendee_position(&attendee.name) else {
            return Err(DatepollError::AttendeeNotFound(attendee.name));
        };

        let dates = event.retain_known_dates(attendee.dates);
        event.attendees[position] = Attendee {
            name: attendee.name,
            dates,
        };

        Ok(event)
    }

    pub fn remove_attendee(&mut self, slot: &EventSlot, name: &str) -> DatepollResult<&Event> {
        let event = self.event_at_mut(slot)?;

        let Some(position) = event.attendee_position(name) else {
            return Err(DatepollError::AttendeeNotFound(name.to_string()));
        };

        event.attendees.remove(position);
        Ok(event)
    }

    /// Every attendee name with the events they answered, in order of first
    /// appearance.
    pub fn attendees(&self) -> Vec<AttendeeSummary> {
        let mut summaries: Vec<AttendeeSummary> = Vec::new();
        let mut seen: HashMap<&str, usize> = HashMap::new();

        for event in &self.events {
            for attendee in &event.attendees {
                let entry = AttendeeEvent {
                    id: event.id.clone(),
                    name: event.name.clone(),
                    dates: attendee.dates.clone(),
                };

                match seen.get(attendee.name.as_str()) {
                    Some(&i) => summaries[i].events.push(entry),
                    None => {
                        seen.insert(&attendee.name, summaries.len());
                        summaries.push(AttendeeSummary {
                            name: attendee.name.clone(),
                            events: vec![entry],
                        });
                    }
                }
            }
        }

        summaries
    }

    pub fn attendee_summary(&self, name: &str) -> DatepollResult<AttendeeSummary> {
        self.attendees()
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DatepollError::AttendeeNotFound(name.to_string()))
    }
}
