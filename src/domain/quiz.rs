//! Quizzes: ordered questions with a single correct option each.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::course::CourseId;

/// Opaque quiz identifier assigned by the store.
pub type QuizId = String;

/// One multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_option_index: usize,
}

/// A quiz attached to a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    /// Owning course id.
    pub course: CourseId,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}
