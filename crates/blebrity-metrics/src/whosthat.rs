//! Who's-That clue usage and celebrity difficulty

use crate::grouping::{filter_by_name, group_by, percent, round_one_decimal};
use crate::types::{CelebrityDifficulty, CluesAnalysis};
use blebrity_common::{keys, names, Event};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Celebrities returned by [`calculate_celebrity_difficulty`]
pub const DEFAULT_CELEBRITY_LIMIT: usize = 10;

/// Celebrity name used when a game carries no `answer`
pub const UNKNOWN_CELEBRITY: &str = "Unknown";

/// Win rate per number of clues used, ascending by clue count
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_clues_analysis(events: &[Event]) -> Vec<CluesAnalysis> {
    let mut by_clues: BTreeMap<i64, (u64, u64)> = BTreeMap::new();

    for event in filter_by_name(events, names::WHOSTHAT_GAME_COMPLETED) {
        let (wins, total) = by_clues.entry(event.data_i64(keys::CLUES_USED)).or_default();
        *total += 1;
        if event.data_bool(keys::WON) {
            *wins += 1;
        }
    }

    let result: Vec<CluesAnalysis> = by_clues
        .into_iter()
        .map(|(clues_used, (wins, total))| CluesAnalysis {
            clues_used,
            wins,
            total,
            win_rate: percent(wins, total),
        })
        .collect();

    debug!("Aggregated {} clue buckets", result.len());
    result
}

/// The ten hardest celebrities, lowest win rate first
pub fn calculate_celebrity_difficulty(events: &[Event]) -> Vec<CelebrityDifficulty> {
    calculate_celebrity_difficulty_with_limit(events, DEFAULT_CELEBRITY_LIMIT)
}

/// The `limit` hardest celebrities, lowest win rate first
///
/// Celebrities with equal win rates keep the order in which they first
/// appear in `events`.
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_celebrity_difficulty_with_limit(
    events: &[Event],
    limit: usize,
) -> Vec<CelebrityDifficulty> {
    let games = filter_by_name(events, names::WHOSTHAT_GAME_COMPLETED);
    let by_celebrity = group_by(games, |e| {
        e.data_str(keys::ANSWER).unwrap_or(UNKNOWN_CELEBRITY)
    });

    let mut result: Vec<CelebrityDifficulty> = by_celebrity
        .into_iter()
        .map(|(celebrity, games)| {
            let total = games.len() as u64;
            let wins = games.iter().filter(|e| e.data_bool(keys::WON)).count() as u64;
            let clues = games
                .iter()
                .fold(0.0, |sum, e| sum + e.data_i64(keys::CLUES_USED) as f64);

            CelebrityDifficulty {
                celebrity: celebrity.to_string(),
                wins,
                total,
                win_rate: percent(wins, total),
                avg_clues: round_one_decimal(clues / total as f64),
            }
        })
        .collect();

    result.sort_by_key(|c| c.win_rate);
    result.truncate(limit);

    debug!("Ranked {} celebrities by difficulty", result.len());
    result
}
