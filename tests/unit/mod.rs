#[path = "../common/mod.rs"]
mod common;

pub mod api;
#[path = "core/mod.rs"]
pub mod core_types;
