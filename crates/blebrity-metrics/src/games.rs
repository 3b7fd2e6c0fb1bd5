//! Completed-game rollups: leaderboard, totals per game type, games per day

use crate::grouping::{count_by_name, filter_by_names, round_one_decimal};
use crate::types::{DailyGames, GamesByType, LeaderboardEntry};
use blebrity_common::{keys, names, Event};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug)]
struct PlayerTally {
    name: String,
    points: f64,
    games: u64,
}

/// Players ranked by total points earned across both game types
///
/// The name shown is the one on the last completion event scanned for that
/// player, so callers that want "latest name" semantics should pass events
/// in chronological order. Players without a display name show the first
/// eight characters of their user id. Ties keep first-seen order.
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_leaderboard(events: &[Event]) -> Vec<LeaderboardEntry> {
    let mut players: IndexMap<&str, PlayerTally> = IndexMap::new();

    for event in filter_by_names(events, &names::GAME_COMPLETED) {
        let name = event.player_label();
        let points = event.data_f64(keys::POINTS_EARNED);

        let tally = players
            .entry(event.user_id.as_str())
            .or_insert_with(|| PlayerTally {
                name: String::new(),
                points: 0.0,
                games: 0,
            });
        tally.points += points;
        tally.games += 1;
        tally.name = name;
    }

    let mut result: Vec<LeaderboardEntry> = players
        .into_values()
        .map(|tally| LeaderboardEntry {
            player: tally.name,
            total_points: tally.points,
            games_played: tally.games,
            avg_points_per_game: round_one_decimal(tally.points / tally.games as f64),
        })
        .collect();

    result.sort_by(|a, b| {
        b.total_points
            .partial_cmp(&a.total_points)
            .unwrap_or(Ordering::Equal)
    });

    debug!("Aggregated {} leaderboard entries", result.len());
    result
}

/// Completed games per game type
pub fn calculate_games_by_type(events: &[Event]) -> GamesByType {
    GamesByType {
        whosthat: count_by_name(events, names::WHOSTHAT_GAME_COMPLETED),
        homeschooled: count_by_name(events, names::HOMESCHOOLED_GAME_COMPLETED),
    }
}

/// Completed games per date and game type, ascending by date
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_daily_games(events: &[Event]) -> Vec<DailyGames> {
    let mut by_date: BTreeMap<&str, GamesByType> = BTreeMap::new();

    for event in filter_by_names(events, &names::GAME_COMPLETED) {
        let games = by_date.entry(event.date()).or_default();
        if event.is(names::WHOSTHAT_GAME_COMPLETED) {
            games.whosthat += 1;
        } else {
            games.homeschooled += 1;
        }
    }

    let result: Vec<DailyGames> = by_date
        .into_iter()
        .map(|(date, games)| DailyGames {
            date: date.to_string(),
            whosthat: games.whosthat,
            homeschooled: games.homeschooled,
        })
        .collect();

    debug!("Aggregated {} daily game data points", result.len());
    result
}
