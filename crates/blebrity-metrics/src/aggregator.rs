//! Full dashboard snapshot built from one batch of events

use crate::activity::{calculate_dau, calculate_key_metrics};
use crate::engagement::{calculate_engagement_metrics, get_recent_events_in, DEFAULT_RECENT_EVENTS_LIMIT};
use crate::games::{calculate_daily_games, calculate_games_by_type, calculate_leaderboard};
use crate::homeschooled::{calculate_answer_breakdown, calculate_question_accuracy};
use crate::retention::{calculate_retention_with_limit, DEFAULT_COHORT_LIMIT};
use crate::types::*;
use crate::whosthat::{
    calculate_celebrity_difficulty_with_limit, calculate_clues_analysis, DEFAULT_CELEBRITY_LIMIT,
};
use blebrity_common::{utc_date, Event, Timestamp};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Limits and display settings for a snapshot
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Events in the recent-activity feed
    pub recent_events_limit: usize,
    /// Most recent retention cohorts kept
    pub retention_cohort_limit: usize,
    /// Hardest celebrities kept
    pub celebrity_limit: usize,
    /// Timezone used to render recent event times
    pub display_timezone: Tz,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            recent_events_limit: DEFAULT_RECENT_EVENTS_LIMIT,
            retention_cohort_limit: DEFAULT_COHORT_LIMIT,
            celebrity_limit: DEFAULT_CELEBRITY_LIMIT,
            display_timezone: Tz::UTC,
        }
    }
}

/// Every dashboard view, computed from the same batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// RFC 3339 time the snapshot was computed
    pub generated_at: String,
    pub event_count: usize,
    pub key_metrics: KeyMetrics,
    pub daily_active_users: Vec<DailyActiveUser>,
    pub retention: Vec<RetentionCohort>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub games_by_type: GamesByType,
    pub daily_games: Vec<DailyGames>,
    pub question_accuracy: Vec<QuestionAccuracy>,
    pub answer_breakdown: AnswerBreakdown,
    pub clues_analysis: Vec<CluesAnalysis>,
    pub celebrity_difficulty: Vec<CelebrityDifficulty>,
    pub engagement: EngagementMetrics,
    pub recent_events: Vec<RecentEvent>,
}

/// Runs every metric over a batch
#[derive(Debug, Clone, Default)]
pub struct DashboardAggregator {
    config: AggregationConfig,
}

impl DashboardAggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Compute a snapshot
    ///
    /// `now` stamps the snapshot and its UTC date is "today" for the daily
    /// active user count.
    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn aggregate(&self, events: &[Event], now: Timestamp) -> DashboardSnapshot {
        let snapshot = DashboardSnapshot {
            generated_at: now.to_rfc3339(),
            event_count: events.len(),
            key_metrics: calculate_key_metrics(events, utc_date(&now)),
            daily_active_users: calculate_dau(events),
            retention: calculate_retention_with_limit(events, self.config.retention_cohort_limit),
            leaderboard: calculate_leaderboard(events),
            games_by_type: calculate_games_by_type(events),
            daily_games: calculate_daily_games(events),
            question_accuracy: calculate_question_accuracy(events),
            answer_breakdown: calculate_answer_breakdown(events),
            clues_analysis: calculate_clues_analysis(events),
            celebrity_difficulty: calculate_celebrity_difficulty_with_limit(
                events,
                self.config.celebrity_limit,
            ),
            engagement: calculate_engagement_metrics(events),
            recent_events: get_recent_events_in(
                events,
                self.config.recent_events_limit,
                self.config.display_timezone,
            ),
        };

        info!(
            "Dashboard snapshot completed: {} events, {} players, {} cohorts",
            snapshot.event_count,
            snapshot.key_metrics.total_players,
            snapshot.retention.len()
        );
        snapshot
    }

    /// Snapshot of an empty batch, used when the store cannot be read
    pub fn empty(&self, now: Timestamp) -> DashboardSnapshot {
        self.aggregate(&[], now)
    }
}
