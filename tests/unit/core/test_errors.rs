// Unit tests for error mapping

use attendee_auth::core::errors::{AuthError, CryptoError};

#[test]
fn test_signing_error_is_internal_not_rejection() {
    let err = AuthError::from(CryptoError::SigningError("hmac failure".to_string()));

    assert_eq!(err.status_code(), 500);
    assert_ne!(err.status_code(), AuthError::Unauthenticated.status_code());
    assert_eq!(err.user_message(), "Internal error");
}

#[test]
fn test_configuration_error_hides_detail() {
    let err = AuthError::Configuration("SIGNING_KEY_PATH=/etc/secret.key".to_string());
    assert!(!err.user_message().contains("/etc"));
}

#[test]
fn test_display_includes_internal_detail() {
    // Display is for logs; user_message is for responses
    let err = AuthError::Store("timeout after 5s".to_string());
    assert!(err.to_string().contains("timeout after 5s"));
}
