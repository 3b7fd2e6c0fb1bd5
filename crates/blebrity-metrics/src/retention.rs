//! First-session cohort retention
//!
//! Users are grouped by the date of their earliest `session_start`. For each
//! cohort, day-N retention is the share of members who also started a
//! session exactly N calendar days after the cohort date, for N in 0..=7.

use crate::grouping::{filter_by_name, percent};
use crate::types::RetentionCohort;
use blebrity_common::{names, Event};
use chrono::{Days, NaiveDate};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Number of days tracked after the cohort date
pub const RETENTION_WINDOW_DAYS: u64 = 7;

/// Most recent cohorts returned by [`calculate_retention`]
pub const DEFAULT_COHORT_LIMIT: usize = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sessions seen for one user
#[derive(Debug, Default)]
struct UserSessions<'a> {
    first: Option<&'a str>,
    dates: HashSet<&'a str>,
}

/// Retention for the ten most recent cohorts, newest first
pub fn calculate_retention(events: &[Event]) -> Vec<RetentionCohort> {
    calculate_retention_with_limit(events, DEFAULT_COHORT_LIMIT)
}

/// Retention for the `limit` most recent cohorts, newest first
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_retention_with_limit(events: &[Event], limit: usize) -> Vec<RetentionCohort> {
    let mut users: HashMap<&str, UserSessions<'_>> = HashMap::new();

    for event in filter_by_name(events, names::SESSION_START) {
        let date = event.date();
        let sessions = users.entry(event.user_id.as_str()).or_default();
        if sessions.first.map_or(true, |first| date < first) {
            sessions.first = Some(date);
        }
        sessions.dates.insert(date);
    }

    let mut cohorts: BTreeMap<&str, Vec<&UserSessions<'_>>> = BTreeMap::new();
    for sessions in users.values() {
        if let Some(first) = sessions.first {
            cohorts.entry(first).or_default().push(sessions);
        }
    }

    let result: Vec<RetentionCohort> = cohorts
        .into_iter()
        .rev()
        .take(limit)
        .map(|(cohort_date, members)| cohort_retention(cohort_date, &members))
        .collect();

    debug!("Aggregated {} retention cohorts", result.len());
    result
}

fn cohort_retention(cohort_date: &str, members: &[&UserSessions<'_>]) -> RetentionCohort {
    let check_dates = window_dates(cohort_date);
    let cohort_size = members.len() as u64;

    let mut days = [0u32; 8];
    for (offset, check) in check_dates.iter().enumerate() {
        let retained = match check {
            Some(date) => members
                .iter()
                .filter(|m| m.dates.contains(date.as_str()))
                .count() as u64,
            None => 0,
        };
        days[offset] = percent(retained, cohort_size);
    }

    RetentionCohort::new(cohort_date, days, cohort_size)
}

/// The date string to look for on each day of the window
///
/// Day 0 is the cohort key itself. Later days use calendar arithmetic, so
/// month and year boundaries roll over correctly; they are `None` when the
/// cohort key is not a valid date.
fn window_dates(cohort_date: &str) -> [Option<String>; 8] {
    let mut dates: [Option<String>; 8] = Default::default();
    dates[0] = Some(cohort_date.to_string());

    match NaiveDate::parse_from_str(cohort_date, DATE_FORMAT) {
        Ok(start) => {
            for day in 1..=RETENTION_WINDOW_DAYS {
                dates[day as usize] = start
                    .checked_add_days(Days::new(day))
                    .map(|d| d.format(DATE_FORMAT).to_string());
            }
        }
        Err(e) => {
            warn!(cohort_date, error = %e, "Cohort date is not a calendar date, only day 0 is tracked");
        }
    }

    dates
}
