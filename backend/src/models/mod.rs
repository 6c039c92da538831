//! Database models for the Kitchen Stock Tracker
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
