//! # Core Module
//!
//! Core configuration shared by the library and the terminal front end.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false

pub mod config;

// Re-export commonly used items
pub use config::{Config, LlmProvider};
