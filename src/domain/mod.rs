//! Domain layer - Core business logic and models.
//!
//! This module contains the pure domain logic for the LearnHub data
//! core (hexagonal architecture inner ring): the four entity types,
//! the ordered-set contract behind every array-shaped set in the
//! persisted document, and the scoring/progress math. Everything here
//! is serializable and testable in isolation.

pub mod course;
pub mod credentials;
pub mod idset;
pub mod progress;
pub mod quiz;
pub mod result;
pub mod scoring;
pub mod user;

// Re-export core types for convenience
pub use course::{Course, CourseId, CourseStatus};
pub use idset::IdSet;
pub use quiz::{Question, Quiz, QuizId};
pub use result::QuizResult;
pub use scoring::BadgeTier;
pub use user::{CourseProgressEntry, Role, User, UserId};
