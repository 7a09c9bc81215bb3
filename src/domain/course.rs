//! Courses: lifecycle, pricing, roster, and opaque content list.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::idset::IdSet;
use super::user::UserId;

/// Opaque course identifier assigned by the store.
pub type CourseId = String;

/// Course lifecycle. New courses start as `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseStatus {
    Draft,
    Published,
    Archived,
}

/// A course owned by an instructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Owning instructor's user id. The reference may dangle; reads
    /// degrade to a placeholder rather than failing.
    pub instructor: UserId,
    pub status: CourseStatus,
    /// Enrolled user ids; duplicates are never inserted (checked by
    /// the enrollment usecase, not by the store).
    #[serde(default)]
    pub enrolled_students: IdSet,
    /// Content items are opaque to the data core; only their count
    /// matters for progress computation.
    #[serde(default)]
    pub content: Vec<Value>,
    pub created_at: DateTime<Utc>,
}
