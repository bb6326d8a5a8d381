//! Release-note retrieval capability.
//!
//! An update entity's "fetch full release notes" accessor delegates to one of
//! these providers. The default derives text from stored attributes; after a
//! successful write-back the coordinator swaps in [`FixedTranslation`] so
//! UI-triggered re-fetches return the translated text instead of re-deriving
//! the original.

use super::EntityState;
use async_trait::async_trait;
use std::fmt;

/// Capability backing an entity's release-note accessor.
#[async_trait]
pub trait ReleaseNotesProvider: Send + Sync + fmt::Debug {
    async fn release_notes(&self, state: &EntityState) -> Option<String>;
}

/// Derive release notes from the entity's stored attributes (priority scan).
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredAttributeNotes;

#[async_trait]
impl ReleaseNotesProvider for StoredAttributeNotes {
    async fn release_notes(&self, state: &EntityState) -> Option<String> {
        state.summary_from_attributes().map(str::to_string)
    }
}

/// Always return a fixed cached translation, ignoring stored attributes.
#[derive(Debug, Clone)]
pub struct FixedTranslation(pub String);

#[async_trait]
impl ReleaseNotesProvider for FixedTranslation {
    async fn release_notes(&self, _state: &EntityState) -> Option<String> {
        Some(self.0.clone())
    }
}
