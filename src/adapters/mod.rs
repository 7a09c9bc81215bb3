//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! infrastructure. This crate's only infrastructure concern is file
//! persistence — the HTTP surface, credential tokens, and AI
//! integrations live in other services.
//!
//! Adapter categories:
//! - `persistence`: flat-file JSON document store and query engine

pub mod persistence;
