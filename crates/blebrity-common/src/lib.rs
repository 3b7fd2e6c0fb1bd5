//! # Blebrity Common
//!
//! Shared types, utilities, and common functionality for the Blebrity
//! analytics workspace: the error type, logging setup, and the gameplay
//! event model every other crate works with.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod logging;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{BlebrityError, Result};
pub use event::{date_of, keys, names, short_user_id, Event, EventData, RawEvent};
pub use logging::{init_default_logging, init_dev_logging, init_logging, init_prod_logging, LoggingConfig};
pub use utils::*;
