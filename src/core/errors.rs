// Domain error types - login failures never disclose which check failed

use thiserror::Error;

/// Main error type for the authentication core
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credentials did not match a stored record, or the store could not answer (HTTP 401)
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Cryptographic error (HTTP 500)
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Credential store failure. Collapsed into `Unauthenticated` before it reaches a caller.
    #[error("Credential store error: {0}")]
    Store(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Cryptographic operation errors
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Failed to load signing key material
    #[error("Failed to load signing key: {0}")]
    KeyLoadError(String),

    /// Failed to generate a fresh signing key
    #[error("Failed to generate signing key: {0}")]
    KeyGenerationError(String),

    /// Failed to sign token
    #[error("Failed to sign token: {0}")]
    SigningError(String),

    /// Token is malformed or its signature does not match the key
    #[error("Token verification failed: {0}")]
    VerificationError(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::Unauthenticated => 401,
            AuthError::Crypto(_) => 500,
            // Never surfaced as-is, see CredentialVerifier
            AuthError::Store(_) => 401,
            AuthError::Configuration(_) => 500,
        }
    }

    /// Get user-friendly error message (no sensitive information)
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Unauthenticated | AuthError::Store(_) => "Unauthorized".to_string(),
            AuthError::Crypto(_) | AuthError::Configuration(_) => "Internal error".to_string(),
        }
    }
}
