//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the domain/usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `DocumentStore`: typed CRUD over the persisted collections,
//!   plus the restricted filter language it evaluates

pub mod store;
