// Authentication: credential stores, verification, login flow and audit trail

pub mod audit_logger;
pub mod credential_store;
pub mod login;
pub mod verifier;
