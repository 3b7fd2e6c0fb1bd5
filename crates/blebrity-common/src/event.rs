//! Gameplay event model and defensive payload access
//!
//! Events arrive from the store as flat rows. The `event_data` payload is
//! schema-less, so every read goes through a typed accessor that falls back
//! to a default instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Free-form event payload
pub type EventData = Map<String, Value>;

/// Event names emitted by the game client
pub mod names {
    pub const SESSION_START: &str = "session_start";
    pub const SESSION_END: &str = "session_end";
    pub const WHOSTHAT_GAME_COMPLETED: &str = "whosthat_game_completed";
    pub const HOMESCHOOLED_GAME_COMPLETED: &str = "homeschooled_game_completed";
    pub const HOMESCHOOLED_QUESTION_ANSWERED: &str = "homeschooled_question_answered";
    pub const HOMESCHOOLED_QUESTION_TIMEOUT: &str = "homeschooled_question_timeout";
    pub const LEADERBOARD_OPENED: &str = "leaderboard_opened";
    pub const STATS_CARD_FLIPPED: &str = "stats_card_flipped";
    pub const SHARE_TAPPED: &str = "share_tapped";

    /// Both game-completion event names
    pub const GAME_COMPLETED: [&str; 2] = [WHOSTHAT_GAME_COMPLETED, HOMESCHOOLED_GAME_COMPLETED];
}

/// Well-known payload keys
pub mod keys {
    pub const POINTS_EARNED: &str = "points_earned";
    pub const QUESTION_NUMBER: &str = "question_number";
    pub const IS_CORRECT: &str = "is_correct";
    pub const CLUES_USED: &str = "clues_used";
    pub const WON: &str = "won";
    pub const ANSWER: &str = "answer";
    pub const SESSION_DURATION_SECONDS: &str = "session_duration_seconds";
}

/// Number of user id characters shown when a player has no display name
pub const USER_ID_DISPLAY_LEN: usize = 8;

/// One immutable telemetry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub user_id: String,
    pub display_name: Option<String>,
    pub event_name: String,
    #[serde(default)]
    pub event_data: EventData,
    /// ISO-8601 UTC timestamp as stored
    pub created_at: String,
}

impl Event {
    /// Create an event with an empty payload
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        event_name: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            display_name: None,
            event_name: event_name.into(),
            event_data: EventData::new(),
            created_at: created_at.into(),
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Insert a payload entry
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event_data.insert(key.into(), value.into());
        self
    }

    /// Whether this event has the given name
    pub fn is(&self, name: &str) -> bool {
        self.event_name == name
    }

    /// Calendar date portion (`YYYY-MM-DD`) of `created_at`
    ///
    /// Truncates at the `T` separator; no timezone conversion happens.
    pub fn date(&self) -> &str {
        date_of(&self.created_at)
    }

    /// Display name, or the truncated user id when none is set
    pub fn player_label(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => short_user_id(&self.user_id),
        }
    }

    /// Numeric payload value, 0.0 when absent or not a number
    pub fn data_f64(&self, key: &str) -> f64 {
        self.event_data
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Integral payload value, 0 when absent, not a number or fractional
    pub fn data_i64(&self, key: &str) -> i64 {
        match self.event_data.get(key) {
            Some(Value::Number(n)) => n.as_i64().unwrap_or_else(|| {
                n.as_f64()
                    .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                    .map_or(0, |v| v as i64)
            }),
            _ => 0,
        }
    }

    /// Boolean payload value, false when absent or not a boolean
    pub fn data_bool(&self, key: &str) -> bool {
        self.event_data
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// String payload value, `None` when absent, empty or not a string
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.event_data
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Calendar date portion of an ISO-8601 timestamp string
pub fn date_of(created_at: &str) -> &str {
    created_at.split('T').next().unwrap_or(created_at)
}

/// First [`USER_ID_DISPLAY_LEN`] characters of a user id
pub fn short_user_id(user_id: &str) -> String {
    user_id.chars().take(USER_ID_DISPLAY_LEN).collect()
}

/// Event row as delivered by the store, before payload normalization
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub event_name: String,
    #[serde(default)]
    pub event_data: Value,
    pub created_at: String,
}

impl RawEvent {
    /// Normalize the payload into a mapping
    ///
    /// Objects are kept, strings holding a JSON object are parsed, and
    /// everything else becomes an empty mapping.
    pub fn normalize(self) -> Event {
        let event_data = normalize_event_data(&self.id, self.event_data);
        Event {
            id: self.id,
            user_id: self.user_id,
            display_name: self.display_name,
            event_name: self.event_name,
            event_data,
            created_at: self.created_at,
        }
    }
}

fn normalize_event_data(id: &str, value: Value) -> EventData {
    match value {
        Value::Object(map) => map,
        Value::Null => EventData::new(),
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!(event_id = %id, kind = value_kind(&other), "event_data string is not an object, using empty payload");
                EventData::new()
            }
            Err(e) => {
                warn!(event_id = %id, error = %e, "event_data string is not valid JSON, using empty payload");
                EventData::new()
            }
        },
        other => {
            warn!(event_id = %id, kind = value_kind(&other), "event_data is not an object, using empty payload");
            EventData::new()
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
