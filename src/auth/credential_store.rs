// Credential stores: in-memory, YAML-backed and database-backed lookups

use crate::api::CredentialStore;
use crate::core::errors::AuthError;
use crate::core::models::AttendeeRecord;
use crate::loader::attendee_loader::AttendeeLoader;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

/// Compared against when the username has no record
const UNKNOWN_USER_PASSWORD: &[u8] = b"unknown-attendee-placeholder-password";

/// Database row structure for attendee lookup
#[derive(FromRow)]
struct AttendeeRow {
    id: String,
    login: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
}

impl From<AttendeeRow> for AttendeeRecord {
    fn from(row: AttendeeRow) -> Self {
        AttendeeRecord {
            id: row.id,
            username: row.login,
            password: row.password,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

/// Immutable in-memory store keyed by username
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    attendees: HashMap<String, AttendeeRecord>,
}

impl InMemoryCredentialStore {
    pub fn new(records: impl IntoIterator<Item = AttendeeRecord>) -> Self {
        let attendees = records
            .into_iter()
            .map(|record| (record.username.clone(), record))
            .collect();
        Self { attendees }
    }

    /// Convenience builder for seeding a store with a single attendee
    pub fn with_attendee(mut self, id: &str, username: &str, password: &str) -> Self {
        self.attendees.insert(
            username.to_string(),
            AttendeeRecord {
                id: id.to_string(),
                username: username.to_string(),
                password: password.to_string(),
                first_name: None,
                last_name: None,
                email: None,
            },
        );
        self
    }

    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    /// Lookup by username and password (synchronous core of the trait method)
    ///
    /// Password comparison is constant-time, and an unknown username still
    /// pays for one comparison against a placeholder.
    pub fn lookup(&self, username: &str, password: &str) -> Option<AttendeeRecord> {
        let record = self.attendees.get(username);
        let stored = record.map_or(UNKNOWN_USER_PASSWORD, |r| r.password.as_bytes());
        let matches: bool = stored.ct_eq(password.as_bytes()).into();
        record.filter(|_| matches).cloned()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AttendeeRecord>, AuthError> {
        Ok(self.lookup(username, password))
    }
}

/// YAML-backed store (for deployments without a database)
#[derive(Debug, Clone)]
pub struct YamlCredentialStore {
    inner: InMemoryCredentialStore,
}

impl YamlCredentialStore {
    pub fn new(loader: AttendeeLoader) -> Self {
        Self {
            inner: InMemoryCredentialStore::new(loader.into_attendees()),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl CredentialStore for YamlCredentialStore {
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AttendeeRecord>, AuthError> {
        Ok(self.inner.lookup(username, password))
    }
}

/// Database-backed store over the `attendees` table
pub struct DbCredentialStore {
    db_pool: PgPool,
}

impl DbCredentialStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CredentialStore for DbCredentialStore {
    async fn find_by_credential(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AttendeeRecord>, AuthError> {
        let row = sqlx::query_as::<_, AttendeeRow>(
            "SELECT id, login, password, first_name, last_name, email
             FROM attendees
             WHERE login = $1 AND password = $2",
        )
        .bind(username)
        .bind(password)
        .fetch_optional(&self.db_pool)
        .await
        .map_err(|e| AuthError::Store(format!("Database error: {}", e)))?;

        Ok(row.map(AttendeeRecord::from))
    }
}
