pub mod test_crypto;
pub mod test_errors;
