// Unit tests for API response types

use attendee_auth::api::responses::*;
use attendee_auth::core::errors::*;
use axum::{http::StatusCode, response::IntoResponse};

#[test]
fn test_error_response_serialization() {
    let response = ErrorResponse {
        error: "Test error".to_string(),
        request_id: None,
    };

    let json = serde_json::to_string(&response).unwrap();
    assert!(json.contains("Test error"));
    assert!(!json.contains("request_id")); // Should be omitted when None
}

#[test]
fn test_health_response_serialization() {
    let response = HealthResponse {
        status: "healthy".to_string(),
        signing_key: "ephemeral".to_string(),
    };

    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(json, r#"{"status":"healthy","signing_key":"ephemeral"}"#);
}

#[tokio::test]
async fn test_unauthenticated_response_has_no_body() {
    let response = ApiError::from(AuthError::Unauthenticated).into_response();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_crypto_error_response_hides_detail() {
    let err = AuthError::Crypto(CryptoError::SigningError("key bytes 0xdeadbeef".to_string()));
    let response = ApiError::from_auth_error_with_id(err, "req-1".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.contains("Internal error"));
    assert!(body.contains("req-1"));
    assert!(!body.contains("deadbeef"));
}
