// Loaders for file-based configuration

pub mod attendee_loader;
