// Library root for the attendee authentication service

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod loader;
