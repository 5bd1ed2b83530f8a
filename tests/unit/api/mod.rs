pub mod test_responses;
