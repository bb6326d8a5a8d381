//! Translation coordinator - the per-entity translate-and-overwrite state machine.
//!
//! For every observed update-entity state the coordinator decides between
//! three text-equality scenarios using only two string maps:
//!   - unchanged source, possibly reverted output → re-apply cached translation
//!   - our own output echoed back by the write-back → no-op (loop guard)
//!   - truly new source → one translator call, then write-back
//!
//! Nothing here retries: a failed fetch, translation, or write leaves the
//! entity untouched until the next state-change event re-enters the pipeline.

use crate::agent::{ConversationAgent, Translator};
use crate::fetch::ReleaseNotesFetcher;
use crate::state::{
    EntityState, FixedTranslation, StateChangedEvent, StateStore, ATTR_RELEASE_URL,
    WRITE_BACK_ATTRIBUTES,
};
use crate::types::{EntityId, Result, TranslatorConfig};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;

// =============================================================================
// Translation Cache
// =============================================================================

/// Process-local cache of source texts and their translations, keyed by
/// entity id.
///
/// Unbounded by design: one entry per distinct update entity ever observed,
/// no eviction, lifetime = lifetime of the coordinator. [`record`] is the
/// only mutator and always writes both maps together, so a translation
/// entry always has a matching original entry.
///
/// Access is not serialized per entity: two interleaved handlers for the
/// same entity may both read a stale entry and trigger one redundant
/// translation (accepted lost-update, last write wins).
///
/// [`record`]: TranslationCache::record
#[derive(Debug, Default)]
pub struct TranslationCache {
    /// entity_id -> last-seen source text
    original_texts: HashMap<EntityId, String>,

    /// entity_id -> last-produced translation
    translations: HashMap<EntityId, String>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-seen source text for an entity.
    pub fn original(&self, entity_id: &EntityId) -> Option<&str> {
        self.original_texts.get(entity_id).map(String::as_str)
    }

    /// Last-produced translation for an entity.
    pub fn translation(&self, entity_id: &EntityId) -> Option<&str> {
        self.translations.get(entity_id).map(String::as_str)
    }

    /// Record a source text and the translation it produced.
    pub fn record(&mut self, entity_id: EntityId, original: String, translation: String) {
        self.original_texts.insert(entity_id.clone(), original);
        self.translations.insert(entity_id, translation);
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.original_texts.clear();
        self.translations.clear();
    }

    /// Number of entities with a recorded translation.
    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// What one observation produced. Lets callers and tests distinguish
/// "nothing to do" from "attempted and failed"; the event loop ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Status was `off`/`unavailable`/`unknown`.
    NoUpdate,
    /// No usable summary text in attributes and no fetchable release URL.
    NoSummary,
    /// Source text unchanged and the translation is still in place.
    Unchanged,
    /// Source text unchanged but the translation had been reverted; cached
    /// translation re-applied without a translator call.
    Reapplied,
    /// Observed text is our own last translation (write-back feedback).
    Echo,
    /// New source text translated and written back.
    Translated,
    /// Translator call failed; entity left untranslated.
    TranslationFailed,
    /// Translation succeeded (and was cached) but the state write failed.
    WriteBackFailed,
}

// =============================================================================
// Translation Coordinator
// =============================================================================

/// Coordinates release-note translation for update entities.
///
/// Owns the [`TranslationCache`] and the runtime-replaceable
/// [`TranslatorConfig`]; everything else is a shared trait object supplied
/// by the host.
pub struct TranslationCoordinator {
    config: RwLock<TranslatorConfig>,
    cache: RwLock<TranslationCache>,
    store: Arc<dyn StateStore>,
    translator: Translator,
    fetcher: Arc<dyn ReleaseNotesFetcher>,
    intake: Mutex<Option<JoinHandle<()>>>,
}

impl fmt::Debug for TranslationCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationCoordinator")
            .field("translator", &self.translator)
            .finish_non_exhaustive()
    }
}

impl TranslationCoordinator {
    pub fn new(
        config: TranslatorConfig,
        store: Arc<dyn StateStore>,
        agent: Arc<dyn ConversationAgent>,
        fetcher: Arc<dyn ReleaseNotesFetcher>,
    ) -> Self {
        tracing::info!("Translation coordinator initialized");
        Self {
            config: RwLock::new(config),
            cache: RwLock::new(TranslationCache::new()),
            store,
            translator: Translator::new(agent),
            fetcher,
            intake: Mutex::new(None),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start consuming state-change events and sweep entities that already
    /// exist.
    ///
    /// Each event is handled on its own task; a storm of state changes means
    /// one task per change, all sharing the runtime (no queueing, no
    /// backpressure).
    pub async fn setup(self: Arc<Self>, mut events: mpsc::UnboundedReceiver<StateChangedEvent>) {
        let coordinator = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            // One-time sweep of update entities known at startup
            for state in coordinator.store.all_update_entities().await {
                let _ = coordinator.on_state_observed(state).await;
            }

            while let Some(event) = events.recv().await {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    coordinator.handle_event(event).await;
                });
            }
        });

        let mut intake = self.intake.lock().await;
        if let Some(previous) = intake.replace(handle) {
            previous.abort();
        }
    }

    /// Stop consuming events. In-flight translations run to completion;
    /// caches stay in memory until the coordinator is dropped.
    pub async fn teardown(&self) {
        if let Some(handle) = self.intake.lock().await.take() {
            handle.abort();
            tracing::info!("Translation coordinator torn down");
        }
    }

    /// Replace the runtime configuration (agent id, prompt, replace flag).
    pub async fn update_config(&self, config: TranslatorConfig) {
        *self.config.write().await = config;
    }

    /// Snapshot of all produced translations, keyed by entity id.
    pub async fn translations(&self) -> HashMap<EntityId, String> {
        let cache = self.cache.read().await;
        cache
            .translations
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    async fn handle_event(&self, event: StateChangedEvent) {
        if !event.entity_id.is_update_entity() {
            return;
        }
        let Some(state) = event.new_state else {
            return;
        };
        let _ = self.on_state_observed(state).await;
    }

    // =========================================================================
    // State Machine
    // =========================================================================

    /// Process one observed entity state.
    pub async fn on_state_observed(&self, state: EntityState) -> Outcome {
        tracing::info!(
            "Checking update entity: {} (status: {})",
            state.entity_id,
            state.status
        );

        if !state.has_update() {
            return Outcome::NoUpdate;
        }

        let Some(summary) = self.extract_summary(&state).await else {
            tracing::info!(
                "No update notes found for {} in attributes: {:?}",
                state.entity_id,
                state.attributes.keys().collect::<Vec<_>>()
            );
            return Outcome::NoSummary;
        };

        let (cached_original, cached_translation) = {
            let cache = self.cache.read().await;
            (
                cache.original(&state.entity_id).map(str::to_string),
                cache.translation(&state.entity_id).map(str::to_string),
            )
        };

        // Unchanged source text: at most a re-apply, never a re-translation.
        if cached_original.as_deref() == Some(summary.as_str()) {
            if let Some(translation) = cached_translation {
                let replace = self.config.read().await.replace_original;
                if replace && state.attr_str("release_summary") != Some(translation.as_str()) {
                    tracing::info!("Re-applying translation to {}", state.entity_id);
                    return match self.write_back(&state.entity_id, &translation).await {
                        Ok(()) => Outcome::Reapplied,
                        Err(err) => {
                            tracing::warn!(
                                "Re-apply write-back failed for {}: {}",
                                state.entity_id,
                                err
                            );
                            Outcome::WriteBackFailed
                        }
                    };
                }
            }
            return Outcome::Unchanged;
        }

        // The "new" text is our own last write-back observed again.
        if cached_translation.as_deref() == Some(summary.as_str()) {
            return Outcome::Echo;
        }

        tracing::debug!("Translating update for {}", state.entity_id);
        let config = self.config.read().await.clone();
        let translated = match self.translator.translate(&config, &summary).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("Translation failed for {}: {}", state.entity_id, err);
                return Outcome::TranslationFailed;
            }
        };

        self.cache
            .write()
            .await
            .record(state.entity_id.clone(), summary, translated.clone());

        match self.write_back(&state.entity_id, &translated).await {
            Ok(()) => Outcome::Translated,
            Err(err) => {
                tracing::warn!("Write-back failed for {}: {}", state.entity_id, err);
                Outcome::WriteBackFailed
            }
        }
    }

    /// Extract release-note text: attribute scan first, then the release-URL
    /// fallback.
    async fn extract_summary(&self, state: &EntityState) -> Option<String> {
        if let Some(summary) = state.summary_from_attributes() {
            return Some(summary.to_string());
        }

        let release_url = state.attr_str(ATTR_RELEASE_URL)?;
        tracing::info!(
            "Fetching release notes from URL for {}: {}",
            state.entity_id,
            release_url
        );
        match self.fetcher.fetch(release_url).await {
            Ok(body) => Some(body),
            Err(crate::Error::UnsupportedUrl(url)) => {
                tracing::debug!("release_url is not a recognized release URL: {}", url);
                None
            }
            Err(err) => {
                tracing::warn!(
                    "Failed to fetch release notes for {}: {}",
                    state.entity_id,
                    err
                );
                None
            }
        }
    }

    // =========================================================================
    // Write-Back
    // =========================================================================

    /// Overwrite the entity's release-note attributes with the translation
    /// and republish its state.
    ///
    /// Re-reads the live state first (attributes may have moved since the
    /// text was extracted) and publishes under the live status value. The
    /// provider override afterwards is best-effort only.
    async fn write_back(&self, entity_id: &EntityId, translated: &str) -> Result<()> {
        let current = self
            .store
            .get(entity_id)
            .await
            .ok_or_else(|| crate::Error::entity_not_found(entity_id.as_str()))?;

        let mut attributes = current.attributes;
        for name in WRITE_BACK_ATTRIBUTES {
            attributes.insert(name.to_string(), Value::String(translated.to_string()));
        }

        tracing::info!("Overwriting attributes for {} with translation", entity_id);
        self.store
            .set(entity_id, current.status, attributes)
            .await?;

        // Cosmetic: make UI-triggered "full release notes" fetches return the
        // translation too. The attribute write above already succeeded.
        if let Err(err) = self
            .store
            .override_release_notes(
                entity_id,
                Arc::new(FixedTranslation(translated.to_string())),
            )
            .await
        {
            tracing::debug!("Could not override release notes for {}: {}", entity_id, err);
        }

        Ok(())
    }
}
