//! User accounts, roles, badges, and per-course progress.
//!
//! Persisted field names are camelCase to match the platform's JSON
//! document shape (`passwordHash`, `courseProgress`, ...). The badge
//! and progress arrays deserialize leniently: records written before
//! a user earned anything simply omit the fields.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::course::CourseId;
use super::idset::IdSet;

/// Opaque user identifier assigned by the store.
pub type UserId = String;

/// Platform role, stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Instructor,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Learner => write!(f, "learner"),
            Self::Instructor => write!(f, "instructor"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// Completed-item sets for one course.
///
/// Both members are set-like: re-adding a present id is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseProgressEntry {
    pub completed_content: IdSet,
    pub completed_quizzes: IdSet,
}

/// A platform account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string; never a plain credential.
    pub password_hash: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Achievement tags; each name appears at most once.
    #[serde(default, skip_serializing_if = "IdSet::is_empty")]
    pub badges: IdSet,
    /// Course id -> completed-item sets. Lazily created per course on
    /// first touch; whole map is written back on every change.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub course_progress: BTreeMap<CourseId, CourseProgressEntry>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Progress entry for a course, if the user has touched it.
    pub fn progress_for(&self, course_id: &str) -> Option<&CourseProgressEntry> {
        self.course_progress.get(course_id)
    }

    /// Mutable progress entry, created empty on first touch.
    pub fn progress_for_mut(&mut self, course_id: &str) -> &mut CourseProgressEntry {
        self.course_progress.entry(course_id.to_string()).or_default()
    }
}
