//! Assessment Use Case - Quiz Submission, Scoring, Badges
//!
//! Grades a submission, records the result unconditionally, then
//! applies both follow-on effects to the user record: the badge tier
//! for this submission (insert-if-absent) and the quiz's membership
//! in the course's `completedQuizzes` set (always attempted, even
//! when no new badge is awarded). When both sets changed they land in
//! one update call; otherwise only the changed field is written.
//!
//! The three store round-trips (create result, read user, write user)
//! are not atomic — a concurrent update to the same user between the
//! read and the write follows last-flush-wins.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, instrument, warn};

use super::quizzes::QuizRepo;
use super::results::{NewResult, ResultRepo};
use super::users::{UserPatch, UserRepo};
use crate::domain::result::QuizResult;
use crate::domain::scoring::{self, BadgeTier};
use crate::ports::store::DocumentStore;

/// Everything a graded submission produced.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The persisted result record.
    pub result: QuizResult,
    /// Score as a percentage of the question count.
    pub percentage: f64,
    /// The tier this submission mapped to (computed every time).
    pub badge: BadgeTier,
    /// Whether the badge was new for this user.
    pub badge_awarded: bool,
}

/// Quiz submission workflow.
pub struct AssessmentService<S: DocumentStore> {
    quizzes: QuizRepo<S>,
    results: ResultRepo<S>,
    users: UserRepo<S>,
}

impl<S: DocumentStore> AssessmentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            quizzes: QuizRepo::new(Arc::clone(&store)),
            results: ResultRepo::new(Arc::clone(&store)),
            users: UserRepo::new(store),
        }
    }

    /// Grade `answers` against the quiz and persist all effects.
    /// Returns `None` when the quiz doesn't exist.
    #[instrument(skip(self, answers), fields(user = user_id, quiz = quiz_id))]
    pub async fn submit_quiz(
        &self,
        user_id: &str,
        quiz_id: &str,
        answers: &[usize],
    ) -> Result<Option<Submission>> {
        let Some(quiz) = self.quizzes.find_by_id(quiz_id).await? else {
            return Ok(None);
        };

        let score = scoring::score_answers(&quiz.questions, answers);
        let total_questions = quiz.questions.len() as u32;
        let percentage = scoring::percentage(score, total_questions);
        let badge = scoring::badge_for_percentage(percentage);

        // The result record is created no matter what happens to the
        // user's badges or progress afterwards.
        let result = self
            .results
            .create(NewResult {
                user: user_id.to_string(),
                quiz: quiz.id.clone(),
                score,
                total_questions,
            })
            .await?;

        let badge_awarded = match self.users.find_by_id(user_id).await? {
            Some(mut user) => {
                let badge_changed = user.badges.insert(badge.name());
                let progress_changed = user
                    .progress_for_mut(&quiz.course)
                    .completed_quizzes
                    .insert(quiz.id.as_str());

                let patch = UserPatch {
                    badges: badge_changed.then(|| user.badges.clone()),
                    course_progress: progress_changed.then(|| user.course_progress.clone()),
                };
                if !patch.is_empty() {
                    self.users.update(user_id, patch).await?;
                }
                badge_changed
            }
            None => {
                // Result already recorded; the dangling user reference
                // just means there is nothing to decorate.
                warn!(user = user_id, "Submitting user not found, skipping badge and progress");
                false
            }
        };

        info!(
            score,
            total = total_questions,
            badge = %badge,
            badge_awarded,
            "Quiz graded"
        );

        Ok(Some(Submission {
            result,
            percentage,
            badge,
            badge_awarded,
        }))
    }
}
