//! Quiz scoring and badge-tier assignment.
//!
//! A submission is an ordered list of selected option indices; the
//! score counts positions whose answer equals the question's
//! `correct_option_index`. The percentage maps onto exactly one badge
//! tier per submission. Tiers are non-retroactive: past results are
//! never rescanned.

use std::fmt;

use super::quiz::Question;

/// Badge tier awarded for one submission's percentage.
///
/// | percentage | tier |
/// |---|---|
/// | >= 80 | Legend |
/// | <= 50 | Newbie |
/// | otherwise | Intermediate |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTier {
    Legend,
    Intermediate,
    Newbie,
}

impl BadgeTier {
    /// Badge name as stored in the user's badge set.
    pub fn name(self) -> &'static str {
        match self {
            Self::Legend => "Legend",
            Self::Intermediate => "Intermediate",
            Self::Newbie => "Newbie",
        }
    }
}

impl fmt::Display for BadgeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Count of answers matching the correct option, position by position.
///
/// Extra answers beyond the question list are ignored; missing answers
/// simply score nothing.
pub fn score_answers(questions: &[Question], answers: &[usize]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.correct_option_index == **answer)
        .count() as u32
}

/// Score as a percentage of the question count. 0.0 when the quiz has
/// no questions (submissions against empty quizzes still grade).
pub fn percentage(score: u32, total_questions: u32) -> f64 {
    if total_questions == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total_questions) * 100.0
}

/// The single badge tier for a submission percentage.
pub fn badge_for_percentage(percentage: f64) -> BadgeTier {
    if percentage >= 80.0 {
        BadgeTier::Legend
    } else if percentage <= 50.0 {
        BadgeTier::Newbie
    } else {
        BadgeTier::Intermediate
    }
}
