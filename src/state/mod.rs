//! Entity state model and host-platform seams.
//!
//! The host platform owns the real entity/state registry and event bus; this
//! module defines the narrow view of it the coordinator consumes:
//!   - [`EntityState`] / [`StateChangedEvent`]: typed snapshots of what the
//!     host publishes
//!   - [`StateStore`]: read/write access to live entity state
//!   - [`ReleaseNotesProvider`]: the capability an update entity delegates
//!     its "fetch full release notes" accessor to
//!
//! [`MemoryStateStore`] is a complete in-process implementation used by tests
//! and by hosts without their own registry.

use crate::types::EntityId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

mod memory;
mod notes;

pub use memory::MemoryStateStore;
pub use notes::{FixedTranslation, ReleaseNotesProvider, StoredAttributeNotes};

// =============================================================================
// Attribute Names
// =============================================================================

/// Attribute names scanned for release-note text, in priority order.
/// First non-empty string wins.
pub const SUMMARY_ATTRIBUTES: [&str; 7] = [
    "summary",
    "release_summary",
    "release_notes",
    "latest_version_notes",
    "changelog",
    "body",
    "notes",
];

/// Attribute names overwritten by the write-back, so the UI picks up the
/// translation regardless of which attribute it prioritizes.
pub const WRITE_BACK_ATTRIBUTES: [&str; 4] = [
    "release_summary",
    "summary",
    "release_notes",
    "latest_version_notes",
];

/// Attribute holding a link to the release page (GitHub-based integrations).
pub const ATTR_RELEASE_URL: &str = "release_url";

/// Status values meaning "no update available/known".
pub const INACTIVE_STATUSES: [&str; 3] = ["off", "unavailable", "unknown"];

// =============================================================================
// Entity State
// =============================================================================

/// Snapshot of one entity's state as published by the host platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: EntityId,

    /// Raw status value. `off`/`unavailable`/`unknown` mean no update; any
    /// other value (including version strings) means an update is known.
    pub status: String,

    /// Free-form attribute bag.
    pub attributes: HashMap<String, Value>,
}

impl EntityState {
    pub fn new(entity_id: EntityId, status: impl Into<String>) -> Self {
        Self {
            entity_id,
            status: status.into(),
            attributes: HashMap::new(),
        }
    }

    /// Whether this entity currently reports an update.
    pub fn has_update(&self) -> bool {
        !INACTIVE_STATUSES.contains(&self.status.as_str())
    }

    /// Non-empty string value of an attribute, if present.
    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Scan [`SUMMARY_ATTRIBUTES`] in priority order for release-note text.
    pub fn summary_from_attributes(&self) -> Option<&str> {
        SUMMARY_ATTRIBUTES
            .iter()
            .find_map(|name| self.attr_str(name))
    }
}

/// State-change notification as delivered by the host's event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateChangedEvent {
    pub entity_id: EntityId,

    /// `None` when the entity was removed.
    pub new_state: Option<EntityState>,

    pub timestamp: DateTime<Utc>,
}

impl StateChangedEvent {
    pub fn new(entity_id: EntityId, new_state: Option<EntityState>) -> Self {
        Self {
            entity_id,
            new_state,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// State Store
// =============================================================================

/// Read/write access to the host platform's live entity states.
///
/// `set` must be atomic from the caller's perspective: status and the full
/// attribute bag are published together. `override_release_notes` is the
/// best-effort deep-patch seam; stores that cannot swap an entity's
/// release-note provider return [`crate::Error::NotesOverrideUnsupported`]
/// and the attribute-level write-back remains the authoritative path.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current state of an entity, or `None` if unknown.
    async fn get(&self, entity_id: &EntityId) -> Option<EntityState>;

    /// All currently known update-category entities (startup sweep).
    async fn all_update_entities(&self) -> Vec<EntityState>;

    /// Publish a new state for an entity.
    async fn set(
        &self,
        entity_id: &EntityId,
        status: String,
        attributes: HashMap<String, Value>,
    ) -> crate::Result<()>;

    /// Swap the provider backing an entity's "fetch full release notes"
    /// accessor.
    async fn override_release_notes(
        &self,
        entity_id: &EntityId,
        provider: Arc<dyn ReleaseNotesProvider>,
    ) -> crate::Result<()>;
}
