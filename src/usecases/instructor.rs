//! Instructor Roll-Ups - Learner Roster and Course Results
//!
//! Cross-collection derived views for instructors. Both roll-ups
//! resolve references record by record and degrade on dangling ids:
//! learners who no longer resolve are dropped from the roster, and
//! result rows keep `None` where the user or quiz is gone.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::instrument;

use super::courses::CourseRepo;
use super::quizzes::QuizRepo;
use super::users::UserRepo;
use crate::domain::idset::IdSet;
use crate::domain::result::QuizResult;
use crate::domain::user::UserId;
use crate::ports::store::{DocumentStore, collections, retain_field_in};

/// One learner across an instructor's courses.
#[derive(Debug, Clone, Serialize)]
pub struct LearnerOverview {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Stored avatar, or the name's first letter as a fallback.
    pub avatar: String,
    /// Titles of the instructor-owned courses this learner is in.
    pub courses: Vec<String>,
    pub badges: IdSet,
}

/// User projection on a result row.
#[derive(Debug, Clone, Serialize)]
pub struct ResultUser {
    pub name: String,
    pub email: String,
}

/// Quiz projection on a result row.
#[derive(Debug, Clone, Serialize)]
pub struct ResultQuiz {
    pub title: String,
}

/// One result with display-friendly joins. `None` marks a reference
/// that no longer resolves.
#[derive(Debug, Clone, Serialize)]
pub struct CourseResultRow {
    #[serde(flatten)]
    pub result: QuizResult,
    pub user: Option<ResultUser>,
    pub quiz: Option<ResultQuiz>,
}

/// Instructor-facing derived views.
pub struct InstructorReports<S: DocumentStore> {
    store: Arc<S>,
    courses: CourseRepo<S>,
    quizzes: QuizRepo<S>,
    users: UserRepo<S>,
}

impl<S: DocumentStore> InstructorReports<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            courses: CourseRepo::new(Arc::clone(&store)),
            quizzes: QuizRepo::new(Arc::clone(&store)),
            users: UserRepo::new(Arc::clone(&store)),
            store,
        }
    }

    /// Every learner enrolled in any of the instructor's courses,
    /// deduplicated across courses, with the owned-course titles they
    /// appear in and their badge set.
    #[instrument(skip(self))]
    pub async fn learner_roster(&self, instructor_id: &str) -> Result<Vec<LearnerOverview>> {
        let courses = self.courses.find_by_instructor(instructor_id).await?;

        let mut learner_ids = IdSet::new();
        for course in &courses {
            for id in course.enrolled_students.iter() {
                learner_ids.insert(id);
            }
        }

        let mut roster = Vec::with_capacity(learner_ids.len());
        for learner_id in learner_ids.iter() {
            // Dangling enrollment: the learner is dropped, the roster
            // still renders.
            let Some(user) = self.users.find_by_id(learner_id).await? else {
                continue;
            };

            let course_titles = courses
                .iter()
                .filter(|course| course.enrolled_students.contains(learner_id))
                .map(|course| course.title.clone())
                .collect();

            let avatar = user
                .avatar
                .clone()
                .unwrap_or_else(|| user.name.chars().take(1).collect());

            roster.push(LearnerOverview {
                id: user.id,
                name: user.name,
                email: user.email,
                avatar,
                courses: course_titles,
                badges: user.badges,
            });
        }
        Ok(roster)
    }

    /// All results for a course's quizzes, joined for display.
    ///
    /// The filter language cannot express "quiz id in set", so this
    /// fetches the entire result collection unfiltered and retains
    /// matching rows with [`retain_field_in`] — an O(all results)
    /// scan by construction.
    #[instrument(skip(self))]
    pub async fn results_by_course(&self, course_id: &str) -> Result<Vec<CourseResultRow>> {
        let quizzes = self.quizzes.find_by_course(course_id).await?;
        let quiz_ids: Vec<String> = quizzes.iter().map(|quiz| quiz.id.clone()).collect();

        let all_results = self.store.find_all(collections::RESULTS).await?;
        let course_results = retain_field_in(all_results, "quiz", &quiz_ids);

        let mut rows = Vec::with_capacity(course_results.len());
        for record in course_results {
            let result: QuizResult = serde_json::from_value(record)?;

            let user = self
                .users
                .find_by_id(&result.user)
                .await?
                .map(|user| ResultUser {
                    name: user.name,
                    email: user.email,
                });
            let quiz = quizzes
                .iter()
                .find(|quiz| quiz.id == result.quiz)
                .map(|quiz| ResultQuiz {
                    title: quiz.title.clone(),
                });

            rows.push(CourseResultRow { result, user, quiz });
        }
        Ok(rows)
    }
}
