//! Shared library for the Lyftr webhook service
//!
//! This library contains the cross-cutting pieces used by the service crate:
//! - Configuration loaded from the environment
//! - The error taxonomy and its HTTP rendering

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, FieldError, Result};
