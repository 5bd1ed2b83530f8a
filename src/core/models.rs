// Domain models shared by the verifier, the issuer and the HTTP layer

use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Username/password pair submitted on a login attempt
///
/// Never persisted. The password is held in a `Secret` so it cannot end up in
/// logs through `Debug` or `Display`.
pub struct Credential {
    username: String,
    password: Secret<String>,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Expose the password (use with caution)
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:<REDACTED>", self.username)
    }
}

/// Attendee record as held by a credential store
#[derive(Clone, Serialize, Deserialize)]
pub struct AttendeeRecord {
    pub id: String,
    #[serde(alias = "login")]
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl fmt::Debug for AttendeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttendeeRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .finish()
    }
}

/// Identity confirmed against the credential store
///
/// Only `CredentialVerifier` builds one, so holding a `VerifiedIdentity`
/// proves the credential check already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    username: String,
    attendee_id: String,
}

impl VerifiedIdentity {
    pub(crate) fn from_record(record: &AttendeeRecord) -> Self {
        Self {
            username: record.username.clone(),
            attendee_id: record.id.clone(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn attendee_id(&self) -> &str {
        &self.attendee_id
    }
}

/// Claims carried by an issued token
///
/// Only the subject is set: no expiry, issuer or audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
}

/// Compact signed token, `header.claims.signature` in base64url
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub(crate) fn new(compact: String) -> Self {
        Self(compact)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` response header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"<REDACTED>").finish()
    }
}
