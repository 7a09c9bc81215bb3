//! Graded quiz submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiz::QuizId;
use super::user::UserId;

/// One graded submission. Created unconditionally on every submit;
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: String,
    pub user: UserId,
    pub quiz: QuizId,
    pub score: u32,
    pub total_questions: u32,
    pub created_at: DateTime<Utc>,
}
