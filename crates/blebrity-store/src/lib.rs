//! # Blebrity Store
//!
//! Read-only access to the analytics event store. [`EventStoreClient`]
//! pages through the events table over PostgREST; [`EventSource`] is the
//! seam the dashboard refresh loop fetches through.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod source;

pub use client::{EventStoreClient, StoreConfig, DEFAULT_TABLE};
pub use source::{EventSource, StaticEventSource};
