//! Core types for the update translator.
//!
//! This module provides foundational types used throughout the system:
//! - **IDs**: Strongly-typed entity identifier (EntityId)
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Translator configuration (agent id, instruction prompt)

mod config;
mod errors;
mod ids;

pub use config::TranslatorConfig;
pub use errors::{Error, Result};
pub use ids::EntityId;
