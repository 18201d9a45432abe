pub mod config;
pub mod enrich;
pub mod error;
pub mod json;
