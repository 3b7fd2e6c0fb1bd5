//! Test utilities and shared event fixtures.
//!
//! Available to other crates' tests through the `testing` feature.

use crate::event::{keys, names, Event};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_ID: AtomicUsize = AtomicUsize::new(1);

fn next_id() -> String {
    format!("evt-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Build a bare event with a generated id
pub fn event(user_id: &str, event_name: &str, created_at: &str) -> Event {
    Event::new(next_id(), user_id, event_name, created_at)
}

/// `session_start` at midnight UTC of the given date
pub fn session_start(user_id: &str, date: &str) -> Event {
    event(user_id, names::SESSION_START, &format!("{date}T00:00:00Z"))
}

/// `session_end` carrying a session duration
pub fn session_end(user_id: &str, created_at: &str, duration_seconds: f64) -> Event {
    event(user_id, names::SESSION_END, created_at)
        .with_data(keys::SESSION_DURATION_SECONDS, duration_seconds)
}

/// Who's-That completion
pub fn whosthat_completed(
    user_id: &str,
    created_at: &str,
    answer: &str,
    clues_used: i64,
    won: bool,
    points: f64,
) -> Event {
    event(user_id, names::WHOSTHAT_GAME_COMPLETED, created_at)
        .with_data(keys::ANSWER, answer)
        .with_data(keys::CLUES_USED, clues_used)
        .with_data(keys::WON, won)
        .with_data(keys::POINTS_EARNED, points)
}

/// Homeschooled completion
pub fn homeschooled_completed(user_id: &str, created_at: &str, points: f64) -> Event {
    event(user_id, names::HOMESCHOOLED_GAME_COMPLETED, created_at)
        .with_data(keys::POINTS_EARNED, points)
}

/// Homeschooled answer
pub fn question_answered(user_id: &str, question_number: i64, is_correct: bool) -> Event {
    event(user_id, names::HOMESCHOOLED_QUESTION_ANSWERED, "2024-01-01T12:00:00Z")
        .with_data(keys::QUESTION_NUMBER, question_number)
        .with_data(keys::IS_CORRECT, is_correct)
}

/// Homeschooled timeout
pub fn question_timeout(user_id: &str) -> Event {
    event(user_id, names::HOMESCHOOLED_QUESTION_TIMEOUT, "2024-01-01T12:00:00Z")
}

/// A small mixed batch in store order (newest first)
pub fn sample_batch() -> Vec<Event> {
    vec![
        event("user-cccccccc", names::SHARE_TAPPED, "2024-01-03T09:00:00Z"),
        session_start("user-aaaaaaaa", "2024-01-03"),
        whosthat_completed("user-aaaaaaaa", "2024-01-02T10:05:00Z", "Cher", 2, true, 30.0)
            .with_display_name("Ann"),
        question_answered("user-bbbbbbbb", 1, false),
        homeschooled_completed("user-bbbbbbbb", "2024-01-02T09:30:00Z", 15.0),
        session_start("user-bbbbbbbb", "2024-01-02"),
        session_end("user-aaaaaaaa", "2024-01-01T10:30:00Z", 120.0),
        whosthat_completed("user-aaaaaaaa", "2024-01-01T10:10:00Z", "Prince", 4, false, 0.0)
            .with_display_name("Ann"),
        session_start("user-aaaaaaaa", "2024-01-01"),
    ]
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Proptest strategies over event batches
#[cfg(feature = "proptest")]
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    fn arb_event_name() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            names::SESSION_START,
            names::SESSION_END,
            names::WHOSTHAT_GAME_COMPLETED,
            names::HOMESCHOOLED_GAME_COMPLETED,
            names::HOMESCHOOLED_QUESTION_ANSWERED,
            names::HOMESCHOOLED_QUESTION_TIMEOUT,
            names::LEADERBOARD_OPENED,
            names::STATS_CARD_FLIPPED,
            names::SHARE_TAPPED,
            "unknown_event",
        ])
    }

    prop_compose! {
        /// A single event with a random payload over the well-known keys
        pub fn arb_event()(
            user in 0u8..6,
            name in arb_event_name(),
            day in 1u32..=28,
            month in prop::sample::select(vec![1u32, 2, 12]),
            points in prop::option::of(-50i64..200),
            question in prop::option::of(-2i64..12),
            correct in any::<Option<bool>>(),
            clues in prop::option::of(0i64..6),
            won in any::<Option<bool>>(),
            answer in prop::option::of(prop::sample::select(vec!["Cher", "Prince", "Madonna", ""])),
            duration in prop::option::of(0u32..3600),
        ) -> Event {
            let mut e = event(
                &format!("user-{user:02}"),
                name,
                &format!("2024-{month:02}-{day:02}T08:00:00Z"),
            );
            if let Some(p) = points { e = e.with_data(keys::POINTS_EARNED, p); }
            if let Some(q) = question { e = e.with_data(keys::QUESTION_NUMBER, q); }
            if let Some(c) = correct { e = e.with_data(keys::IS_CORRECT, c); }
            if let Some(c) = clues { e = e.with_data(keys::CLUES_USED, c); }
            if let Some(w) = won { e = e.with_data(keys::WON, w); }
            if let Some(a) = answer { e = e.with_data(keys::ANSWER, a); }
            if let Some(d) = duration { e = e.with_data(keys::SESSION_DURATION_SECONDS, d); }
            e
        }
    }

    /// A batch of up to `max` events
    pub fn arb_batch(max: usize) -> impl Strategy<Value = Vec<Event>> {
        prop::collection::vec(arb_event(), 0..max)
    }
}
