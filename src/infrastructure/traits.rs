//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::entities::{ConversationState, Registration, UserId};
use crate::infrastructure::telegram::{OutboundMessage, SendError};
use async_trait::async_trait;

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn find_registration(&self, user_id: UserId) -> Option<Registration>;

    /// Returns `ConversationState::Idle` for users the store has never seen.
    async fn conversation_state(&self, user_id: UserId) -> ConversationState;

    /// Writes the record and the conversation state of a user in one step.
    async fn save(&self, user_id: UserId, registration: Registration, state: ConversationState);
}

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Delivers one message to a chat.
    async fn send(&self, message: OutboundMessage) -> Result<(), SendError>;

    /// Answers an inline button press so the client stops its loading
    /// indicator. `text` is shown as a short notification.
    async fn answer_callback(&self, query_id: String, text: String) -> Result<(), SendError>;
}
