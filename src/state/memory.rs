//! In-memory state store.
//!
//! Complete [`StateStore`] implementation backed by a `HashMap`, with
//! fan-out of [`StateChangedEvent`]s to subscribers. Used by integration
//! tests and by embedding hosts that have no registry of their own.

use super::{
    EntityState, ReleaseNotesProvider, StateChangedEvent, StateStore, StoredAttributeNotes,
};
use crate::types::EntityId;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// In-memory entity state registry with event fan-out.
#[derive(Debug)]
pub struct MemoryStateStore {
    /// entity_id -> current state
    states: Arc<RwLock<HashMap<EntityId, EntityState>>>,

    /// entity_id -> release-note provider (defaults to attribute derivation)
    notes_providers: Arc<RwLock<HashMap<EntityId, Arc<dyn ReleaseNotesProvider>>>>,

    /// Event subscribers. Closed channels are pruned on publish.
    subscribers: Arc<RwLock<Vec<mpsc::UnboundedSender<StateChangedEvent>>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self {
            states: Arc::new(RwLock::new(HashMap::new())),
            notes_providers: Arc::new(RwLock::new(HashMap::new())),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to state-changed events.
    pub async fn subscribe(&self) -> mpsc::UnboundedReceiver<StateChangedEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.write().await.push(tx);
        rx
    }

    /// Resolve the release-note text for an entity via its current provider.
    pub async fn release_notes(&self, entity_id: &EntityId) -> Option<String> {
        let state = self.get(entity_id).await?;
        let providers = self.notes_providers.read().await;
        match providers.get(entity_id) {
            Some(provider) => provider.release_notes(&state).await,
            None => StoredAttributeNotes.release_notes(&state).await,
        }
    }

    async fn publish(&self, event: StateChangedEvent) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, entity_id: &EntityId) -> Option<EntityState> {
        self.states.read().await.get(entity_id).cloned()
    }

    async fn all_update_entities(&self) -> Vec<EntityState> {
        self.states
            .read()
            .await
            .values()
            .filter(|s| s.entity_id.is_update_entity())
            .cloned()
            .collect()
    }

    async fn set(
        &self,
        entity_id: &EntityId,
        status: String,
        attributes: HashMap<String, Value>,
    ) -> crate::Result<()> {
        let state = EntityState {
            entity_id: entity_id.clone(),
            status,
            attributes,
        };

        self.states
            .write()
            .await
            .insert(entity_id.clone(), state.clone());

        tracing::debug!("State set for {}", entity_id);

        self.publish(StateChangedEvent::new(entity_id.clone(), Some(state)))
            .await;
        Ok(())
    }

    async fn override_release_notes(
        &self,
        entity_id: &EntityId,
        provider: Arc<dyn ReleaseNotesProvider>,
    ) -> crate::Result<()> {
        if !self.states.read().await.contains_key(entity_id) {
            return Err(crate::Error::entity_not_found(entity_id.as_str()));
        }
        self.notes_providers
            .write()
            .await
            .insert(entity_id.clone(), provider);
        Ok(())
    }
}
