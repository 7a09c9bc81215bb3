//! User Repository - Accounts, Login Lookup, Targeted Patches
//!
//! Thin domain layer over the `users` collection. Passwords are
//! hashed before storage and verified with the stateless
//! `credentials::verify_password` function — fetched records carry
//! data only, never behavior.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, instrument};

use super::{decode_record, decode_records, record_fields};
use crate::domain::course::CourseId;
use crate::domain::credentials;
use crate::domain::idset::IdSet;
use crate::domain::user::{CourseProgressEntry, Role, User};
use crate::ports::store::{DocumentStore, Filter, collections};

/// Fields for a new account. The password arrives plain and is
/// hashed on the way into the store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Targeted update of a user record.
///
/// Only the populated fields are written; each one replaces the old
/// top-level value entirely (shallow merge), so `course_progress`
/// must carry the complete map, not a delta.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges: Option<IdSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_progress: Option<BTreeMap<CourseId, CourseProgressEntry>>,
}

impl UserPatch {
    /// True when nothing would be written.
    pub fn is_empty(&self) -> bool {
        self.badges.is_none() && self.course_progress.is_none()
    }
}

/// Repository for the `users` collection.
pub struct UserRepo<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> UserRepo<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an account, hashing the password.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create(&self, new_user: NewUser) -> Result<User> {
        let password_hash = credentials::hash_password(&new_user.password)?;

        let mut fields = record_fields(&new_user)?;
        fields.insert("passwordHash".to_string(), password_hash.into());

        let record = self.store.create(collections::USERS, fields).await?;
        decode_record(record).context("stored user record is malformed")
    }

    /// Create an account after checking email uniqueness.
    ///
    /// Uniqueness is by convention only — the store does not enforce
    /// it — so this is the single write path that upholds it.
    pub async fn register(&self, new_user: NewUser) -> Result<User> {
        if self.find_by_email(&new_user.email).await?.is_some() {
            bail!("user with email {} already exists", new_user.email);
        }
        let user = self.create(new_user).await?;
        info!(user = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let record = self.store.find_by_id(collections::USERS, id).await?;
        record.map(decode_record).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let record = self
            .store
            .find_one(collections::USERS, &Filter::new().field("email", email))
            .await?;
        record.map(decode_record).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<User>> {
        decode_records(self.store.find_all(collections::USERS).await?)
    }

    /// Look up by email and verify the candidate password. Returns the
    /// user only when both succeed; a missing account and a wrong
    /// password are indistinguishable to the caller.
    pub async fn verify_login(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        if credentials::verify_password(&user.password_hash, password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Apply a targeted patch. Returns `None` when the id is absent.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let changes = record_fields(&patch)?;
        let record = self.store.update(collections::USERS, id, changes).await?;
        record.map(decode_record).transpose()
    }
}
