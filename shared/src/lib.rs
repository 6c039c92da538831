//! Shared types and models for the Kitchen Stock Tracker
//!
//! This crate contains the domain types shared between the backend and any
//! other components of the system (reporting tools, test harnesses).

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
