//! # Blebrity Metrics
//!
//! In-memory aggregation of gameplay events into dashboard metrics.
//!
//! Every calculation is a pure function over an already-fetched slice of
//! [`Event`](blebrity_common::Event)s. Missing or mistyped payload fields
//! fall back to zero, `false` or `"Unknown"`, and empty input yields empty
//! or zeroed results. [`DashboardAggregator`] runs all of them at once.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod activity;
pub mod aggregator;
pub mod engagement;
pub mod games;
pub mod grouping;
pub mod homeschooled;
pub mod retention;
pub mod types;
pub mod whosthat;

pub use activity::{calculate_dau, calculate_key_metrics};
pub use aggregator::{AggregationConfig, DashboardAggregator, DashboardSnapshot};
pub use engagement::{
    calculate_engagement_metrics, get_recent_events, get_recent_events_in,
    DEFAULT_RECENT_EVENTS_LIMIT,
};
pub use games::{calculate_daily_games, calculate_games_by_type, calculate_leaderboard};
pub use grouping::{filter_by_name, filter_by_names, group_by};
pub use homeschooled::{calculate_answer_breakdown, calculate_question_accuracy};
pub use retention::{calculate_retention, calculate_retention_with_limit, DEFAULT_COHORT_LIMIT};
pub use types::*;
pub use whosthat::{
    calculate_celebrity_difficulty, calculate_celebrity_difficulty_with_limit,
    calculate_clues_analysis, DEFAULT_CELEBRITY_LIMIT,
};
