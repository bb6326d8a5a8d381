//! Strongly-typed identifiers.
//!
//! Entity ids are validated at construction time and implement common traits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain prefix of update-category entities.
pub const UPDATE_DOMAIN_PREFIX: &str = "update.";

/// Identifier of a host-platform entity, e.g. `update.widget_firmware`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    pub fn from_string(s: String) -> Result<Self, &'static str> {
        if s.is_empty() {
            return Err("EntityId cannot be empty");
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this entity belongs to the `update.` domain.
    pub fn is_update_entity(&self) -> bool {
        self.0.starts_with(UPDATE_DOMAIN_PREFIX)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
