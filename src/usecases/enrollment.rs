//! Enrollment Use Case - Roster Management and Progress Listings
//!
//! Enrolling is a read-modify-write on the course roster with the
//! duplicate check on this side of the store (the store itself never
//! deduplicates). Course listings compute progress fresh on every
//! call from the persisted completed-item sets — the percentage is
//! never stored.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, instrument};

use super::courses::CourseRepo;
use super::quizzes::QuizRepo;
use crate::domain::course::Course;
use crate::domain::progress::progress_percent;
use crate::domain::user::{Role, User};
use crate::ports::store::DocumentStore;

/// Outcome of an enrollment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// The user was added to the roster.
    Enrolled,
    /// The user was already on the roster; nothing was written.
    AlreadyEnrolled,
    /// No such course.
    CourseNotFound,
}

/// A course joined with the requesting user's derived progress.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithProgress {
    pub course: Course,
    /// `round(100 * completed / total)`; 0 for an empty course.
    pub progress: u32,
    pub total_items: usize,
    pub completed_items: usize,
}

/// Enrollment and course-listing workflows.
pub struct EnrollmentService<S: DocumentStore> {
    courses: CourseRepo<S>,
    quizzes: QuizRepo<S>,
}

impl<S: DocumentStore> EnrollmentService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            courses: CourseRepo::new(Arc::clone(&store)),
            quizzes: QuizRepo::new(store),
        }
    }

    /// Add a user to a course roster, once.
    ///
    /// The insert-if-absent check happens here; calling twice leaves
    /// exactly one roster entry.
    #[instrument(skip(self))]
    pub async fn enroll(&self, course_id: &str, user_id: &str) -> Result<EnrollOutcome> {
        let Some(mut course) = self.courses.find_by_id(course_id).await? else {
            return Ok(EnrollOutcome::CourseNotFound);
        };

        if !course.enrolled_students.insert(user_id) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        self.courses.save(&course).await?;
        info!(course = course_id, user = user_id, "User enrolled");
        Ok(EnrollOutcome::Enrolled)
    }

    /// The user's relevant courses with fresh progress: instructors
    /// see the courses they own, learners the ones they're enrolled
    /// in. Total items = content entries + quizzes of the course.
    pub async fn my_courses(&self, user: &User) -> Result<Vec<CourseWithProgress>> {
        let courses = match user.role {
            Role::Instructor => self.courses.find_by_instructor(&user.id).await?,
            _ => self.courses.find_enrolled(&user.id).await?,
        };

        let mut listings = Vec::with_capacity(courses.len());
        for course in courses {
            let quiz_count = self.quizzes.find_by_course(&course.id).await?.len();
            let total_items = course.content.len() + quiz_count;

            let completed_items = user.progress_for(&course.id).map_or(0, |entry| {
                entry.completed_content.len() + entry.completed_quizzes.len()
            });

            listings.push(CourseWithProgress {
                progress: progress_percent(completed_items, total_items),
                total_items,
                completed_items,
                course,
            });
        }
        Ok(listings)
    }
}
