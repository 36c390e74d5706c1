//! In-memory registration store
//!
//! Records live for the lifetime of the process. Swapping in a persistent
//! store only needs another `RegistrationRepository` implementation.

use crate::infrastructure::entities::{ConversationState, Registration, UserId};
use crate::infrastructure::traits::RegistrationRepository;
use async_trait::async_trait;
use di::{inject, injectable};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    registrations: HashMap<UserId, Registration>,
    states: HashMap<UserId, ConversationState>,
}

#[derive(Default)]
pub struct InMemoryRegistrationRepository {
    tables: RwLock<Tables>,
}

#[injectable(RegistrationRepository)]
impl InMemoryRegistrationRepository {
    #[inject]
    pub fn create() -> InMemoryRegistrationRepository {
        InMemoryRegistrationRepository::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn find_registration(&self, user_id: UserId) -> Option<Registration> {
        self.tables.read().await.registrations.get(&user_id).cloned()
    }

    async fn conversation_state(&self, user_id: UserId) -> ConversationState {
        self.tables
            .read()
            .await
            .states
            .get(&user_id)
            .copied()
            .unwrap_or_default()
    }

    async fn save(&self, user_id: UserId, registration: Registration, state: ConversationState) {
        // both maps change under one write guard so they never disagree
        let mut tables = self.tables.write().await;
        tables.registrations.insert(user_id, registration);
        tables.states.insert(user_id, state);
    }
}
