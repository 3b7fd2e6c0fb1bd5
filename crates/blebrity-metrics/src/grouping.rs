//! Filtering and grouping primitives shared by every metric

use blebrity_common::Event;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::hash::Hash;

/// Events with the given name, in input order
pub fn filter_by_name<'a>(events: &'a [Event], name: &str) -> Vec<&'a Event> {
    events.iter().filter(|e| e.is(name)).collect()
}

/// Events whose name is any of `names`, in input order
pub fn filter_by_names<'a>(events: &'a [Event], names: &[&str]) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|e| names.contains(&e.event_name.as_str()))
        .collect()
}

/// Number of events with the given name
pub fn count_by_name(events: &[Event], name: &str) -> u64 {
    events.iter().filter(|e| e.is(name)).count() as u64
}

/// Partition events by key
///
/// Keys appear in first-seen order and each group keeps the relative order
/// of its events.
pub fn group_by<'a, I, K, F>(events: I, mut key_fn: F) -> IndexMap<K, Vec<&'a Event>>
where
    I: IntoIterator<Item = &'a Event>,
    K: Hash + Eq,
    F: FnMut(&'a Event) -> K,
{
    let mut groups: IndexMap<K, Vec<&'a Event>> = IndexMap::new();
    for event in events {
        groups.entry(key_fn(event)).or_default().push(event);
    }
    groups
}

/// Number of distinct user ids
pub fn distinct_users<'a, I>(events: I) -> u64
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .map(|e| e.user_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

/// Round to the nearest integer, halves towards positive infinity
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Round to one decimal place, halves towards positive infinity
pub fn round_one_decimal(value: f64) -> f64 {
    round_half_up(value * 10.0) / 10.0
}

/// `part / whole` as a whole percentage, 0 when `whole` is 0
pub fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    round_half_up(part as f64 / whole as f64 * 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use blebrity_common::names;
    use blebrity_common::test_utils::{event, session_start};

    #[test]
    fn test_filter_by_name_preserves_order() {
        let events = vec![
            session_start("a", "2024-01-02"),
            event("b", names::SHARE_TAPPED, "2024-01-02T01:00:00Z"),
            session_start("c", "2024-01-01"),
        ];
        let starts = filter_by_name(&events, names::SESSION_START);
        let users: Vec<_> = starts.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, vec!["a", "c"]);

        let both = filter_by_names(&events, &[names::SESSION_START, names::SHARE_TAPPED]);
        assert_eq!(both.len(), 3);
        assert!(filter_by_name(&events, "nothing").is_empty());
        assert_eq!(count_by_name(&events, names::SHARE_TAPPED), 1);
    }

    #[test]
    fn test_group_by_keeps_first_seen_key_order() {
        let events = vec![
            session_start("a", "2024-01-02"),
            session_start("b", "2024-01-01"),
            session_start("c", "2024-01-02"),
        ];
        let groups = group_by(&events, |e| e.date());
        let keys: Vec<_> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["2024-01-02", "2024-01-01"]);

        let users: Vec<_> = groups["2024-01-02"].iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(users, vec!["a", "c"]);
    }

    #[test]
    fn test_distinct_users() {
        let events = vec![
            session_start("a", "2024-01-02"),
            session_start("a", "2024-01-03"),
            session_start("b", "2024-01-01"),
        ];
        assert_eq!(distinct_users(&events), 2);
        assert_eq!(distinct_users(&[]), 0);
    }

    #[test]
    fn test_rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4999), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_one_decimal(15.0), 15.0);
        assert_eq!(round_one_decimal(10.0 / 3.0), 3.3);
        assert_eq!(round_one_decimal(2.0 / 3.0), 0.7);
    }

    #[test]
    fn test_percent_guards_zero_denominator() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 2), 50);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(3, 3), 100);
    }
}
