//! Document Store Port - Collection Access Interface
//!
//! Defines the trait through which repositories and aggregation
//! usecases reach the persisted collections, plus the restricted
//! filter language the store evaluates. Adapters implement the
//! trait; everything above it only sees records as JSON values.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// The four collections of the persisted store.
pub mod collections {
    /// Platform accounts (learners, instructors, admins).
    pub const USERS: &str = "users";
    /// Courses with content and enrollment rosters.
    pub const COURSES: &str = "courses";
    /// Quizzes attached to courses.
    pub const QUIZZES: &str = "quizzes";
    /// Graded quiz submissions.
    pub const RESULTS: &str = "results";

    /// Every collection name the store knows about.
    pub const ALL: [&str; 4] = [USERS, COURSES, QUIZZES, RESULTS];
}

/// Name of the generated identifier field on every record.
pub const ID_FIELD: &str = "id";

/// Name of the generated creation-timestamp field on every record.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure modes of the persisted store.
///
/// Absence of a record is never an error — lookups return `Option`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The collection name is not one of [`collections::ALL`].
    /// This is a programmer error, not a data condition.
    #[error("collection `{name}` is not defined")]
    UnknownCollection { name: String },

    /// The persisted representation exists but cannot be parsed.
    /// Fatal to the process; there is no in-process recovery.
    #[error("persisted store at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Underlying read or write failure. Flushes are single-attempt;
    /// no retries exist at this layer.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A conjunctive field filter.
///
/// Maps field names to expected values; a record matches only if
/// every named field matches under the store's two-step rule
/// (array membership for sequence-valued fields, strict equality
/// otherwise). An empty filter matches every record.
///
/// The language is deliberately small: no comparison operators, no
/// OR, no nested paths, no array-to-array containment. Callers that
/// need "field is one of N values" post-filter a full fetch with
/// [`retain_field_in`].
#[derive(Debug, Clone, Default)]
pub struct Filter {
    fields: Map<String, Value>,
}

impl Filter {
    /// An empty filter (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to match `value`.
    #[must_use]
    pub fn field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// True when no fields are constrained.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate the constrained fields.
    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }
}

/// Retain only the records whose scalar `field` equals one of `ids`.
///
/// This is the documented composition primitive for "field is in a
/// caller-supplied set", which the filter language intentionally does
/// not express. The cost is O(records) on an *unfiltered* fetch —
/// callers pay the full-collection scan knowingly.
pub fn retain_field_in(records: Vec<Value>, field: &str, ids: &[String]) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| {
            record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|v| ids.iter().any(|id| id == v))
        })
        .collect()
}

/// Typed CRUD surface over the persisted collections.
///
/// Every implementation performs a full `load -> operate -> flush`
/// cycle per call; nothing is cached between calls. `create` assigns
/// the [`ID_FIELD`] and [`CREATED_AT_FIELD`] values, which are never
/// reassigned afterwards. `update` merges the given fields shallowly:
/// a named top-level field replaces the old value entirely, so callers
/// mutating nested maps must read-modify-write the whole structure.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Full collection in insertion order.
    async fn find_all(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Record by generated identifier, or `None`.
    async fn find_by_id(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// First record (in collection order) matching the filter.
    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<Value>>;

    /// All records matching the filter, order preserved.
    async fn find(&self, collection: &str, filter: &Filter) -> StoreResult<Vec<Value>>;

    /// Append a new record with generated id and creation timestamp;
    /// returns the stored record including the generated fields.
    async fn create(&self, collection: &str, fields: Map<String, Value>)
        -> StoreResult<Value>;

    /// Shallow-merge `changes` onto the record with the given id.
    /// Returns `None` (and writes nothing) when the id is absent.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        changes: Map<String, Value>,
    ) -> StoreResult<Option<Value>>;
}
