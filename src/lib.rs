//! # Update Translator - Release-Note Translation Coordinator
//!
//! Event-driven glue component for home-automation platforms:
//! - Watches state changes on `update.*` entities
//! - Extracts release-note text from known attributes (or fetches it from a
//!   GitHub release URL)
//! - Translates the text through a configured conversational agent
//! - Writes the translation back into the entity's attributes so dashboards
//!   show translated content
//!
//! ## Architecture
//!
//! The coordinator is a single state machine keyed by entity id:
//! ```text
//!   state-changed events ──► TranslationCoordinator
//!                             │  extract summary (attributes / fetch)
//!                             │  loop + change detection (TranslationCache)
//!                             │  translate (ConversationAgent)
//!                             └─ write-back (StateStore)
//! ```
//!
//! The host platform is consumed through three narrow trait seams:
//! [`state::StateStore`], [`agent::ConversationAgent`], and
//! [`fetch::ReleaseNotesFetcher`]. Failures are logged and dropped, never
//! retried; the only recovery mechanism is the next state-change event.

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod agent;
pub mod coordinator;
pub mod fetch;
pub mod state;
pub mod types;

// Internal utilities
pub mod observability;

pub use coordinator::{Outcome, TranslationCoordinator};
pub use types::{Error, Result, TranslatorConfig};
