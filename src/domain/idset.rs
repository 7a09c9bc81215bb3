//! Ordered identifier sets.
//!
//! `enrolledStudents`, `badges`, `completedContent` and
//! `completedQuizzes` are all persisted as plain JSON arrays that must
//! behave like sets: insertion order is kept for display, and an id
//! appears at most once. `IdSet` makes that contract explicit instead
//! of scattering contains-before-push checks across call sites.

use serde::{Deserialize, Serialize};

/// An insertion-ordered set of opaque string identifiers.
///
/// Serializes transparently as the underlying array, so persisted
/// records keep their plain-array shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdSet(Vec<String>);

impl IdSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert if absent. Returns whether the set changed.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.0.contains(&id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove if present. Returns whether the set changed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    /// Membership test.
    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for IdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}
