//! UI engagement counters and the recent-activity feed

use crate::grouping::{count_by_name, filter_by_name, round_half_up};
use crate::types::{EngagementMetrics, RecentEvent};
use blebrity_common::{format_display_timestamp, keys, names, Event};
use chrono_tz::Tz;
use tracing::{debug, instrument};

/// Events returned by [`get_recent_events`]
pub const DEFAULT_RECENT_EVENTS_LIMIT: usize = 50;

/// UI interaction counters and the mean session length in whole seconds
///
/// Sessions without a recorded duration count as zero seconds; with no
/// `session_end` events at all the average is 0.
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_engagement_metrics(events: &[Event]) -> EngagementMetrics {
    let session_ends = filter_by_name(events, names::SESSION_END);
    let avg_session_duration = if session_ends.is_empty() {
        0
    } else {
        let total = session_ends
            .iter()
            .fold(0.0, |sum, e| sum + e.data_f64(keys::SESSION_DURATION_SECONDS));
        round_half_up(total / session_ends.len() as f64) as i64
    };

    let metrics = EngagementMetrics {
        leaderboard_opens: count_by_name(events, names::LEADERBOARD_OPENED),
        stats_card_flips: count_by_name(events, names::STATS_CARD_FLIPPED),
        share_taps: count_by_name(events, names::SHARE_TAPPED),
        avg_session_duration,
    };

    debug!(
        sessions = session_ends.len(),
        avg_session_duration = metrics.avg_session_duration,
        "Calculated engagement metrics"
    );
    metrics
}

/// The first `limit` events projected for display, times shown in UTC
///
/// Input order is kept; callers pass events newest first.
pub fn get_recent_events(events: &[Event], limit: usize) -> Vec<RecentEvent> {
    get_recent_events_in(events, limit, Tz::UTC)
}

/// The first `limit` events projected for display, times shown in `tz`
pub fn get_recent_events_in(events: &[Event], limit: usize, tz: Tz) -> Vec<RecentEvent> {
    events
        .iter()
        .take(limit)
        .map(|e| RecentEvent {
            created_at: format_display_timestamp(&e.created_at, tz),
            display_name: e.player_label(),
            event_name: e.event_name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use blebrity_common::test_utils::{event, session_end, session_start};

    #[test]
    fn test_engagement_counts_and_average() {
        let events = vec![
            event("u1", names::LEADERBOARD_OPENED, "2024-01-01T10:00:00Z"),
            event("u2", names::LEADERBOARD_OPENED, "2024-01-01T10:00:00Z"),
            event("u1", names::STATS_CARD_FLIPPED, "2024-01-01T10:00:00Z"),
            event("u1", names::SHARE_TAPPED, "2024-01-01T10:00:00Z"),
            session_end("u1", "2024-01-01T10:00:00Z", 100.0),
            session_end("u2", "2024-01-01T10:00:00Z", 61.0),
            session_start("u1", "2024-01-01"),
        ];

        assert_eq!(
            calculate_engagement_metrics(&events),
            EngagementMetrics {
                leaderboard_opens: 2,
                stats_card_flips: 1,
                share_taps: 1,
                // 80.5 rounds up
                avg_session_duration: 81,
            }
        );
    }

    #[test]
    fn test_session_end_without_duration_counts_as_zero() {
        let events = vec![
            session_end("u1", "2024-01-01T10:00:00Z", 90.0),
            event("u2", names::SESSION_END, "2024-01-01T10:00:00Z"),
        ];
        assert_eq!(calculate_engagement_metrics(&events).avg_session_duration, 45);
    }

    #[test]
    fn test_recent_events_projection() {
        let events = vec![
            event("abcdefghijkl", names::SHARE_TAPPED, "2024-01-02T15:04:05Z"),
            event("u2", names::SESSION_START, "2024-01-02T09:00:00Z").with_display_name("Bo"),
            event("u3", names::SESSION_START, "2024-01-01T09:00:00Z"),
        ];

        let recent = get_recent_events(&events, 2);
        assert_eq!(
            recent,
            vec![
                RecentEvent {
                    created_at: "1/2/2024, 3:04:05 PM".to_string(),
                    display_name: "abcdefgh".to_string(),
                    event_name: names::SHARE_TAPPED.to_string(),
                },
                RecentEvent {
                    created_at: "1/2/2024, 9:00:00 AM".to_string(),
                    display_name: "Bo".to_string(),
                    event_name: names::SESSION_START.to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_recent_events_in_timezone() {
        let events = vec![event("u1", names::SHARE_TAPPED, "2024-01-02T03:00:00Z")];
        let recent = get_recent_events_in(&events, 10, chrono_tz::Europe::Oslo);
        assert_eq!(recent[0].created_at, "1/2/2024, 4:00:00 AM");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(calculate_engagement_metrics(&[]), EngagementMetrics::default());
        assert!(get_recent_events(&[], DEFAULT_RECENT_EVENTS_LIMIT).is_empty());
    }
}
