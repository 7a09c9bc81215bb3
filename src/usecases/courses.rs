//! Course Repository - CRUD plus Instructor/Student Joins
//!
//! Joins are performed record by record with additional store
//! lookups — there is no join planner, so populating N references
//! costs N `find_by_id` calls. Dangling references degrade instead
//! of failing: a missing instructor becomes a placeholder, a missing
//! student is dropped from the projection.

use std::sync::Arc;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use super::users::UserRepo;
use super::{decode_record, decode_records, record_fields};
use crate::domain::course::{Course, CourseStatus};
use crate::domain::user::{User, UserId};
use crate::ports::store::{DocumentStore, Filter, collections};

/// Fields for a new course. Status and roster are not caller-supplied:
/// every course starts as a Draft with nobody enrolled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub instructor: UserId,
    pub content: Vec<Value>,
}

/// Instructor projection for course listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructorSummary {
    pub name: String,
    pub email: String,
}

impl InstructorSummary {
    /// Placeholder for a dangling instructor reference.
    pub fn unknown() -> Self {
        Self {
            name: "Unknown".to_string(),
            email: String::new(),
        }
    }

    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Enrolled-student projection for the course detail view.
#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A course with its instructor resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CourseWithInstructor {
    pub course: Course,
    pub instructor: InstructorSummary,
}

/// A course with instructor and full student roster resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub course: Course,
    pub instructor: InstructorSummary,
    pub students: Vec<StudentSummary>,
}

/// Repository for the `courses` collection.
pub struct CourseRepo<S: DocumentStore> {
    store: Arc<S>,
    users: UserRepo<S>,
}

impl<S: DocumentStore> CourseRepo<S> {
    pub fn new(store: Arc<S>) -> Self {
        let users = UserRepo::new(Arc::clone(&store));
        Self { store, users }
    }

    #[instrument(skip(self, new_course), fields(title = %new_course.title))]
    pub async fn create(&self, new_course: NewCourse) -> Result<Course> {
        let mut fields = record_fields(&new_course)?;
        fields.insert("status".to_string(), serde_json::to_value(CourseStatus::Draft)?);
        fields.insert("enrolledStudents".to_string(), Value::Array(Vec::new()));

        let record = self.store.create(collections::COURSES, fields).await?;
        decode_record(record).context("stored course record is malformed")
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Course>> {
        let record = self.store.find_by_id(collections::COURSES, id).await?;
        record.map(decode_record).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<Course>> {
        decode_records(self.store.find_all(collections::COURSES).await?)
    }

    /// Courses owned by an instructor.
    pub async fn find_by_instructor(&self, instructor_id: &str) -> Result<Vec<Course>> {
        let records = self
            .store
            .find(
                collections::COURSES,
                &Filter::new().field("instructor", instructor_id),
            )
            .await?;
        decode_records(records)
    }

    /// Courses whose roster contains the given user. Relies on the
    /// query engine's array-membership rule.
    pub async fn find_enrolled(&self, user_id: &str) -> Result<Vec<Course>> {
        let records = self
            .store
            .find(
                collections::COURSES,
                &Filter::new().field("enrolledStudents", user_id),
            )
            .await?;
        decode_records(records)
    }

    /// Move a course through its lifecycle (Draft/Published/Archived).
    pub async fn set_status(&self, id: &str, status: CourseStatus) -> Result<Option<Course>> {
        let mut changes = serde_json::Map::new();
        changes.insert("status".to_string(), serde_json::to_value(status)?);
        let record = self.store.update(collections::COURSES, id, changes).await?;
        record.map(decode_record).transpose()
    }

    /// Write a whole course record back (roster changes and the like).
    pub async fn save(&self, course: &Course) -> Result<Option<Course>> {
        let changes = record_fields(course)?;
        let record = self
            .store
            .update(collections::COURSES, &course.id, changes)
            .await?;
        record.map(decode_record).transpose()
    }

    /// Every course with its instructor populated. A dangling
    /// instructor id never fails the listing — it resolves to the
    /// `Unknown` placeholder.
    pub async fn list_all_with_instructor(&self) -> Result<Vec<CourseWithInstructor>> {
        let courses = self.find_all().await?;

        let mut listings = Vec::with_capacity(courses.len());
        for course in courses {
            let instructor = self
                .users
                .find_by_id(&course.instructor)
                .await?
                .as_ref()
                .map_or_else(InstructorSummary::unknown, InstructorSummary::from_user);
            listings.push(CourseWithInstructor { course, instructor });
        }
        Ok(listings)
    }

    /// One course with instructor and every resolvable enrolled
    /// student populated. Student ids that no longer resolve are
    /// silently dropped.
    pub async fn get_with_instructor_and_students(&self, id: &str) -> Result<Option<CourseDetail>> {
        let Some(course) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let instructor = self
            .users
            .find_by_id(&course.instructor)
            .await?
            .as_ref()
            .map_or_else(InstructorSummary::unknown, InstructorSummary::from_user);

        let mut students = Vec::with_capacity(course.enrolled_students.len());
        for student_id in course.enrolled_students.iter() {
            if let Some(user) = self.users.find_by_id(student_id).await? {
                students.push(StudentSummary {
                    id: user.id,
                    name: user.name,
                    email: user.email,
                    avatar: user.avatar,
                });
            }
        }

        Ok(Some(CourseDetail {
            course,
            instructor,
            students,
        }))
    }
}
