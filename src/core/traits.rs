//! DI "Interfaces"

use crate::infrastructure::entities::{ChatId, UserId};
use async_trait::async_trait;

#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Answers `/start`.
    ///
    /// Approved users get a welcome back naming their role, everyone else gets
    /// the role selection keyboard. Never changes stored state.
    async fn welcome(&self, chat_id: ChatId, user_id: UserId);

    /// Handles an inline button press.
    ///
    /// A role token starts (or restarts) registration with that role and
    /// answers the callback query when its id is known. Unknown tokens are
    /// ignored without a reply.
    async fn select_role(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        query_id: Option<&str>,
        action: &str,
    );

    /// Feeds free text into the registration flow.
    async fn handle_text(&self, chat_id: ChatId, user_id: UserId, text: &str);
}
