//! Headline counters and daily active users

use crate::grouping::{count_by_name, distinct_users, filter_by_name, filter_by_names};
use crate::types::{DailyActiveUser, KeyMetrics};
use blebrity_common::{keys, names, Event};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, instrument};

/// Compute the headline counters
///
/// `today` decides which events count towards `dau`; it is compared with
/// the date portion of each event's `created_at`.
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_key_metrics(events: &[Event], today: NaiveDate) -> KeyMetrics {
    let today = today.format("%Y-%m-%d").to_string();
    let completed = filter_by_names(events, &names::GAME_COMPLETED);

    let metrics = KeyMetrics {
        total_players: distinct_users(events),
        dau: distinct_users(events.iter().filter(|e| e.date() == today)),
        total_sessions: count_by_name(events, names::SESSION_START),
        total_games: completed.len() as u64,
        total_points: completed
            .iter()
            .fold(0.0, |sum, e| sum + e.data_f64(keys::POINTS_EARNED)),
    };

    debug!(
        players = metrics.total_players,
        dau = metrics.dau,
        games = metrics.total_games,
        "Calculated key metrics"
    );
    metrics
}

/// Distinct session-starting users per date, ascending by date
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_dau(events: &[Event]) -> Vec<DailyActiveUser> {
    let mut users_by_date: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for event in filter_by_name(events, names::SESSION_START) {
        users_by_date
            .entry(event.date())
            .or_default()
            .insert(event.user_id.as_str());
    }

    let result: Vec<DailyActiveUser> = users_by_date
        .into_iter()
        .map(|(date, users)| DailyActiveUser {
            date: date.to_string(),
            users: users.len() as u64,
        })
        .collect();

    debug!("Aggregated {} daily active user data points", result.len());
    result
}
