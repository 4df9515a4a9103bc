//! Common utilities shared across all crates.
//!
//! This crate provides:
//! - The error taxonomy returned by the auth service and its HTTP mapping
//! - Configuration structures loaded from the environment

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult};
