//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. No error here is fatal to the process:
//! the coordinator logs each one and waits for the next state-change event.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the update translator.
#[derive(Error, Debug)]
pub enum Error {
    /// The conversational agent returned an error or an unusable response.
    #[error("agent error: {0}")]
    Agent(String),

    /// The agent replied, but with empty text.
    #[error("agent returned empty translation")]
    EmptyTranslation,

    /// Outbound HTTP transport errors (release-note fetch).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The release URL does not match a recognized hosting pattern.
    #[error("unsupported release url: {0}")]
    UnsupportedUrl(String),

    /// The release API answered with a non-200 status.
    #[error("release api returned http {0}")]
    HttpStatus(u16),

    /// The release API answered 200 but the `body` field was missing/empty.
    #[error("release api response had no body text")]
    EmptyBody,

    /// Entity disappeared from the state registry between extract and write-back.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The state registry rejected a write.
    #[error("state write failed: {0}")]
    StateWrite(String),

    /// The state registry cannot swap release-note providers (best-effort path).
    #[error("release-notes override unsupported: {0}")]
    NotesOverrideUnsupported(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Convenience constructors
impl Error {
    pub fn agent(msg: impl Into<String>) -> Self {
        Self::Agent(msg.into())
    }

    pub fn unsupported_url(url: impl Into<String>) -> Self {
        Self::UnsupportedUrl(url.into())
    }

    pub fn entity_not_found(id: impl Into<String>) -> Self {
        Self::EntityNotFound(id.into())
    }

    pub fn state_write(msg: impl Into<String>) -> Self {
        Self::StateWrite(msg.into())
    }

    pub fn notes_override_unsupported(msg: impl Into<String>) -> Self {
        Self::NotesOverrideUnsupported(msg.into())
    }
}
