//! Quiz Repository - Thin Pass-Through CRUD
//!
//! Scoped to the `quizzes` collection; no joins. Grading and
//! completion bookkeeping live in the assessment usecase.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

use super::{decode_record, decode_records, record_fields};
use crate::domain::course::CourseId;
use crate::domain::quiz::{Question, Quiz};
use crate::ports::store::{DocumentStore, Filter, collections};

/// Fields for a new quiz.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    pub title: String,
    pub course: CourseId,
    pub questions: Vec<Question>,
}

/// Repository for the `quizzes` collection.
pub struct QuizRepo<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> QuizRepo<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, new_quiz), fields(title = %new_quiz.title, course = %new_quiz.course))]
    pub async fn create(&self, new_quiz: NewQuiz) -> Result<Quiz> {
        let fields = record_fields(&new_quiz)?;
        let record = self.store.create(collections::QUIZZES, fields).await?;
        decode_record(record).context("stored quiz record is malformed")
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Quiz>> {
        let record = self.store.find_by_id(collections::QUIZZES, id).await?;
        record.map(decode_record).transpose()
    }

    /// All quizzes belonging to a course, in creation order.
    pub async fn find_by_course(&self, course_id: &str) -> Result<Vec<Quiz>> {
        let records = self
            .store
            .find(collections::QUIZZES, &Filter::new().field("course", course_id))
            .await?;
        decode_records(records)
    }
}
