//! Core types for datepoll.
//!
//! This crate holds everything the HTTP server needs that is not HTTP:
//! - `event` and `view` for the stored records and their wire shape
//! - `store` for the load/write document contract and its backends
//! - `schema` for request bodies and their validation
//! - `book` for the event and attendance operations themselves

pub mod book;
pub mod date;
pub mod error;
pub mod event;
pub mod schema;
pub mod settings;
pub mod store;
pub mod view;

pub use book::{EventBook, EventSlot};
pub use error::{DatepollError, DatepollResult};
pub use event::{Attendee, DateSelection, Event};
pub use store::{EventStore, JsonFileStore, MemoryStore};
