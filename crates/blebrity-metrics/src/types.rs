//! Metric value objects
//!
//! Plain data recomputed on every aggregation. Field names serialize in
//! camelCase, which is the shape the dashboard front end reads.

use serde::{Deserialize, Serialize};

/// Headline counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub total_players: u64,
    pub dau: u64,
    pub total_sessions: u64,
    pub total_games: u64,
    pub total_points: f64,
}

/// Distinct session-starting users on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActiveUser {
    pub date: String,
    pub users: u64,
}

/// Day-N retention of one first-session cohort, as whole percentages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionCohort {
    pub cohort_date: String,
    pub day0: u32,
    pub day1: u32,
    pub day2: u32,
    pub day3: u32,
    pub day4: u32,
    pub day5: u32,
    pub day6: u32,
    pub day7: u32,
    pub cohort_size: u64,
}

impl RetentionCohort {
    pub fn new(cohort_date: impl Into<String>, days: [u32; 8], cohort_size: u64) -> Self {
        let [day0, day1, day2, day3, day4, day5, day6, day7] = days;
        Self {
            cohort_date: cohort_date.into(),
            day0,
            day1,
            day2,
            day3,
            day4,
            day5,
            day6,
            day7,
            cohort_size,
        }
    }

    /// Retention percentages for day 0 through day 7
    pub fn days(&self) -> [u32; 8] {
        [
            self.day0, self.day1, self.day2, self.day3, self.day4, self.day5, self.day6, self.day7,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player: String,
    pub total_points: f64,
    pub games_played: u64,
    /// Rounded to one decimal place
    pub avg_points_per_game: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamesByType {
    pub whosthat: u64,
    pub homeschooled: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyGames {
    pub date: String,
    pub whosthat: u64,
    pub homeschooled: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionAccuracy {
    pub question_number: i64,
    pub correct: u64,
    pub total: u64,
    pub accuracy: u32,
}

/// Answer outcomes; `timeout` counts a separate event stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerBreakdown {
    pub correct: u64,
    pub wrong: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CluesAnalysis {
    pub clues_used: i64,
    pub wins: u64,
    pub total: u64,
    pub win_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CelebrityDifficulty {
    pub celebrity: String,
    pub wins: u64,
    pub total: u64,
    pub win_rate: u32,
    /// Rounded to one decimal place
    pub avg_clues: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub leaderboard_opens: u64,
    pub stats_card_flips: u64,
    pub share_taps: u64,
    /// Whole seconds
    pub avg_session_duration: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEvent {
    pub created_at: String,
    pub display_name: String,
    pub event_name: String,
}
