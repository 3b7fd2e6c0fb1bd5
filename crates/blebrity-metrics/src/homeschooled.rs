//! Homeschooled question accuracy and answer outcomes

use crate::grouping::{count_by_name, filter_by_name, percent};
use crate::types::{AnswerBreakdown, QuestionAccuracy};
use blebrity_common::{keys, names, Event};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Tally {
    correct: u64,
    total: u64,
}

/// Accuracy per question number, ascending
///
/// Answers without a positive integral `question_number` are skipped.
#[instrument(skip(events), fields(events = events.len()))]
pub fn calculate_question_accuracy(events: &[Event]) -> Vec<QuestionAccuracy> {
    let mut by_question: BTreeMap<i64, Tally> = BTreeMap::new();

    for event in filter_by_name(events, names::HOMESCHOOLED_QUESTION_ANSWERED) {
        let question_number = event.data_i64(keys::QUESTION_NUMBER);
        if question_number <= 0 {
            continue;
        }

        let tally = by_question.entry(question_number).or_default();
        tally.total += 1;
        if event.data_bool(keys::IS_CORRECT) {
            tally.correct += 1;
        }
    }

    let result: Vec<QuestionAccuracy> = by_question
        .into_iter()
        .map(|(question_number, tally)| QuestionAccuracy {
            question_number,
            correct: tally.correct,
            total: tally.total,
            accuracy: percent(tally.correct, tally.total),
        })
        .collect();

    debug!("Aggregated accuracy for {} questions", result.len());
    result
}

/// Correct and wrong answers plus timeouts
///
/// Timeouts come from their own event type and are not a partition of the
/// answered events, so one question may appear in both counts.
pub fn calculate_answer_breakdown(events: &[Event]) -> AnswerBreakdown {
    let answered = filter_by_name(events, names::HOMESCHOOLED_QUESTION_ANSWERED);
    let correct = answered
        .iter()
        .filter(|e| e.data_bool(keys::IS_CORRECT))
        .count() as u64;

    AnswerBreakdown {
        correct,
        wrong: answered.len() as u64 - correct,
        timeout: count_by_name(events, names::HOMESCHOOLED_QUESTION_TIMEOUT),
    }
}
