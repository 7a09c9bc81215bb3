//! Progress Tracker - Content-Completion Toggling
//!
//! Marks a content item complete or incomplete for one user in one
//! course. The per-course entry is created lazily on first touch, and
//! because updates replace top-level fields wholesale, the entire
//! `courseProgress` map is written back on every change.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, instrument};

use super::users::{UserPatch, UserRepo};
use crate::domain::user::CourseProgressEntry;
use crate::ports::store::DocumentStore;

/// Content-completion workflow.
pub struct ProgressTracker<S: DocumentStore> {
    users: UserRepo<S>,
}

impl<S: DocumentStore> ProgressTracker<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            users: UserRepo::new(store),
        }
    }

    /// Toggle a content item for the user. Set semantics on both
    /// directions: re-completing is a no-op, un-completing something
    /// never completed is a no-op. Returns the course's progress entry
    /// after the change, or `None` when the user doesn't exist.
    #[instrument(skip(self))]
    pub async fn set_content_completed(
        &self,
        user_id: &str,
        course_id: &str,
        content_id: &str,
        completed: bool,
    ) -> Result<Option<CourseProgressEntry>> {
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };

        let entry = user.progress_for_mut(course_id);
        let changed = if completed {
            entry.completed_content.insert(content_id)
        } else {
            entry.completed_content.remove(content_id)
        };
        let snapshot = entry.clone();

        if !changed {
            debug!(user = user_id, course = course_id, content = content_id,
                "Completion toggle was a set-level no-op");
        }

        // The whole map goes back even on a no-op toggle so a lazily
        // created entry is persisted on first touch.
        self.users
            .update(
                user_id,
                UserPatch {
                    course_progress: Some(user.course_progress),
                    ..UserPatch::default()
                },
            )
            .await?;

        Ok(Some(snapshot))
    }
}
