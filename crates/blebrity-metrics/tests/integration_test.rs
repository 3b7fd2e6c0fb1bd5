//! Integration tests for blebrity-metrics: documented scenarios end to end.

use blebrity_common::test_utils::{
    event, homeschooled_completed, question_answered, question_timeout, sample_batch,
};
use blebrity_common::{keys, names, Event, RawEvent};
use blebrity_metrics::*;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;

#[test]
fn test_single_session_start_scenario() {
    let events = vec![event("u1", names::SESSION_START, "2024-01-01T00:00:00Z")];

    let dau = serde_json::to_value(calculate_dau(&events)).unwrap();
    assert_eq!(dau, json!([{ "date": "2024-01-01", "users": 1 }]));

    let retention = serde_json::to_value(calculate_retention(&events)).unwrap();
    assert_eq!(
        retention,
        json!([{
            "cohortDate": "2024-01-01",
            "day0": 100, "day1": 0, "day2": 0, "day3": 0,
            "day4": 0, "day5": 0, "day6": 0, "day7": 0,
            "cohortSize": 1
        }])
    );
}

#[test]
fn test_leaderboard_scenario() {
    let events = vec![
        homeschooled_completed("u1", "2024-01-01T10:00:00Z", 10.0).with_display_name("Al"),
        homeschooled_completed("u1", "2024-01-01T10:05:00Z", 20.0).with_display_name("Al"),
    ];
    let board = serde_json::to_value(calculate_leaderboard(&events)).unwrap();
    assert_eq!(
        board,
        json!([{ "player": "Al", "totalPoints": 30.0, "gamesPlayed": 2, "avgPointsPerGame": 15.0 }])
    );
}

#[test]
fn test_answer_breakdown_scenario() {
    let events = vec![
        question_answered("u1", 1, true),
        question_answered("u1", 2, true),
        question_answered("u1", 3, false),
        question_timeout("u1"),
    ];
    let breakdown = serde_json::to_value(calculate_answer_breakdown(&events)).unwrap();
    assert_eq!(breakdown, json!({ "correct": 2, "wrong": 1, "timeout": 1 }));
}

#[test]
fn test_empty_input_scenario() {
    let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let events: Vec<Event> = Vec::new();

    assert_eq!(calculate_key_metrics(&events, today), KeyMetrics::default());
    assert!(calculate_dau(&events).is_empty());
    assert!(calculate_retention(&events).is_empty());
    assert!(calculate_leaderboard(&events).is_empty());
    assert_eq!(calculate_games_by_type(&events), GamesByType::default());
    assert!(calculate_daily_games(&events).is_empty());
    assert!(calculate_question_accuracy(&events).is_empty());
    assert_eq!(calculate_answer_breakdown(&events), AnswerBreakdown::default());
    assert!(calculate_clues_analysis(&events).is_empty());
    assert!(calculate_celebrity_difficulty(&events).is_empty());
    assert_eq!(calculate_engagement_metrics(&events), EngagementMetrics::default());
    assert!(get_recent_events(&events, DEFAULT_RECENT_EVENTS_LIMIT).is_empty());
}

#[test]
fn test_store_rows_with_malformed_payloads_aggregate() {
    let rows = json!([
        { "id": "1", "user_id": "u1", "display_name": null, "event_name": "whosthat_game_completed",
          "event_data": "{\"points_earned\": 12, \"won\": true, \"answer\": \"Cher\"}",
          "created_at": "2024-01-02T10:00:00Z" },
        { "id": "2", "user_id": "u2", "display_name": "Bo", "event_name": "whosthat_game_completed",
          "event_data": [1, 2, 3], "created_at": "2024-01-02T09:00:00Z" },
        { "id": "3", "user_id": "u3", "display_name": null, "event_name": "session_end",
          "event_data": null, "created_at": "2024-01-02T08:00:00Z" }
    ]);
    let raw: Vec<RawEvent> = serde_json::from_value(rows).unwrap();
    let events: Vec<Event> = raw.into_iter().map(RawEvent::normalize).collect();

    assert_eq!(events[0].data_f64(keys::POINTS_EARNED), 12.0);
    assert!(events[1].event_data.is_empty());

    let snapshot = DashboardAggregator::default()
        .aggregate(&events, Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap());
    assert_eq!(snapshot.key_metrics.total_points, 12.0);
    assert_eq!(snapshot.key_metrics.dau, 3);
    assert_eq!(snapshot.engagement.avg_session_duration, 0);

    let celebrities: Vec<_> = snapshot
        .celebrity_difficulty
        .iter()
        .map(|c| (c.celebrity.as_str(), c.win_rate))
        .collect();
    assert_eq!(celebrities, vec![("Unknown", 0), ("Cher", 100)]);
}

#[test]
fn test_snapshot_json_document_shape() {
    let snapshot = DashboardAggregator::default()
        .aggregate(&sample_batch(), Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap());
    let json = serde_json::to_value(&snapshot).unwrap();

    for field in [
        "generatedAt",
        "eventCount",
        "keyMetrics",
        "dailyActiveUsers",
        "retention",
        "leaderboard",
        "gamesByType",
        "dailyGames",
        "questionAccuracy",
        "answerBreakdown",
        "cluesAnalysis",
        "celebrityDifficulty",
        "engagement",
        "recentEvents",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }

    assert_eq!(json["recentEvents"][0]["displayName"], "user-ccc");
    assert_eq!(json["recentEvents"][0]["createdAt"], "1/3/2024, 9:00:00 AM");
    assert_eq!(json["gamesByType"], json!({ "whosthat": 2, "homeschooled": 1 }));
}
