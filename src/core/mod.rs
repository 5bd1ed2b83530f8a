// Core domain types: errors, models and token cryptography

pub mod crypto;
pub mod errors;
pub mod models;
