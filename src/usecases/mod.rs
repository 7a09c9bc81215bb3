//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic over the `DocumentStore` port. The four
//! repositories give each collection a typed surface (with the course
//! repository carrying the populate joins); the remaining usecases
//! are the aggregation engine - multi-collection derived views and
//! read-modify-write sequences.
//!
//! Use cases:
//! - `UserRepo` / `CourseRepo` / `QuizRepo` / `ResultRepo`: typed CRUD
//! - `EnrollmentService`: roster writes + progress listings
//! - `ProgressTracker`: content-completion toggling
//! - `AssessmentService`: quiz grading, results, badge tiers
//! - `InstructorReports`: learner roster and results roll-ups

pub mod assessment;
pub mod courses;
pub mod enrollment;
pub mod instructor;
pub mod progress_tracker;
pub mod quizzes;
pub mod results;
pub mod users;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Serialize a payload into the field map a store call expects.
fn record_fields<T: Serialize>(payload: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(payload).context("failed to serialize record fields")? {
        Value::Object(map) => Ok(map),
        other => bail!("record fields must serialize to an object, got {other}"),
    }
}

/// Deserialize one stored record into its entity type.
fn decode_record<T: DeserializeOwned>(record: Value) -> Result<T> {
    serde_json::from_value(record).context("failed to decode stored record")
}

/// Deserialize a whole fetched collection, preserving order.
fn decode_records<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>> {
    records.into_iter().map(decode_record).collect()
}
