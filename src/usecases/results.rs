//! Result Repository - Thin Pass-Through CRUD
//!
//! Scoped to the `results` collection. Joins to users and quizzes are
//! performed by the instructor roll-up, not here.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;

use super::{decode_record, decode_records, record_fields};
use crate::domain::quiz::QuizId;
use crate::domain::result::QuizResult;
use crate::domain::user::UserId;
use crate::ports::store::{DocumentStore, Filter, collections};

/// Fields for a new graded submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResult {
    pub user: UserId,
    pub quiz: QuizId,
    pub score: u32,
    pub total_questions: u32,
}

/// Repository for the `results` collection.
pub struct ResultRepo<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> ResultRepo<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, new_result), fields(user = %new_result.user, quiz = %new_result.quiz))]
    pub async fn create(&self, new_result: NewResult) -> Result<QuizResult> {
        let fields = record_fields(&new_result)?;
        let record = self.store.create(collections::RESULTS, fields).await?;
        decode_record(record).context("stored result record is malformed")
    }

    /// The entire collection, in submission order. The filter language
    /// cannot express "quiz id in set", so set-scoped views fetch
    /// everything and post-filter.
    pub async fn find_all(&self) -> Result<Vec<QuizResult>> {
        decode_records(self.store.find_all(collections::RESULTS).await?)
    }

    /// One learner's submission history.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<QuizResult>> {
        let records = self
            .store
            .find(collections::RESULTS, &Filter::new().field("user", user_id))
            .await?;
        decode_records(records)
    }
}
