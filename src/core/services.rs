//! Implementations for the service the app needs.
//!

use crate::config::Settings;
use crate::core::messages;
use crate::core::traits::RegistrationService;
use crate::infrastructure::entities::{ChatId, ConversationState, Registration, Role, UserId};
use crate::infrastructure::telegram::OutboundMessage;
use crate::infrastructure::traits::{Messenger, RegistrationRepository};
use async_trait::async_trait;
use di::{Ref, injectable};
use log::{debug, error, info};

#[injectable(RegistrationService)]
pub struct MyRegistrationService {
    repo: Ref<dyn RegistrationRepository>,
    messenger: Ref<dyn Messenger>,
    settings: Ref<Settings>,
}

impl MyRegistrationService {
    pub fn new(
        repo: Ref<dyn RegistrationRepository>,
        messenger: Ref<dyn Messenger>,
        settings: Ref<Settings>,
    ) -> MyRegistrationService {
        MyRegistrationService {
            repo,
            messenger,
            settings,
        }
    }

    async fn send(&self, message: OutboundMessage) {
        let chat_id = message.chat_id;
        if let Err(e) = self.messenger.send(message).await {
            error!("failed to deliver message to chat {chat_id}: {e}");
        }
    }

    async fn notify_admins(&self, user_id: UserId, registration: &Registration) {
        for &admin_chat in &self.settings.admin_chat_ids {
            self.send(messages::admin_notification(admin_chat, user_id, registration))
                .await;
        }
    }
}

/// Outcome of feeding one text message into the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    NeedPhone,
    NeedRestaurant,
    Completed,
}

impl Step {
    fn next_state(self) -> ConversationState {
        match self {
            Step::NeedPhone => ConversationState::AwaitingPhone,
            Step::NeedRestaurant => ConversationState::AwaitingRestaurant,
            Step::Completed => ConversationState::Idle,
        }
    }
}

/// Stores `text` in the field the current state is waiting for. `None` means
/// the user is not in the middle of a registration.
fn advance(state: ConversationState, registration: &mut Registration, text: &str) -> Option<Step> {
    match state {
        ConversationState::Idle => None,
        ConversationState::AwaitingName => {
            registration.name = Some(text.to_owned());
            Some(Step::NeedPhone)
        }
        ConversationState::AwaitingPhone => {
            registration.phone = Some(text.to_owned());
            Some(Step::NeedRestaurant)
        }
        ConversationState::AwaitingRestaurant => {
            registration.restaurant_name = Some(text.to_owned());
            registration.approved = true;
            Some(Step::Completed)
        }
    }
}

#[async_trait]
impl RegistrationService for MyRegistrationService {
    async fn welcome(&self, chat_id: ChatId, user_id: UserId) {
        let message = match self.repo.find_registration(user_id).await {
            Some(registration) if registration.approved => {
                messages::welcome_back(chat_id, &registration)
            }
            _ => messages::role_selection(chat_id),
        };

        self.send(message).await;
    }

    async fn select_role(
        &self,
        chat_id: ChatId,
        user_id: UserId,
        query_id: Option<&str>,
        action: &str,
    ) {
        let Some(role) = Role::from_action_token(action) else {
            debug!("ignoring unknown action token {action:?} from user {user_id}");
            return;
        };

        info!("user {user_id} started registration as {role}");
        if let Some(query_id) = query_id
            && let Err(e) = self
                .messenger
                .answer_callback(query_id.to_owned(), messages::role_selected(role))
                .await
        {
            error!("failed to answer callback query {query_id}: {e}");
        }

        self.repo
            .save(
                user_id,
                Registration::new(role),
                ConversationState::AwaitingName,
            )
            .await;

        self.send(messages::ask_name(chat_id, role)).await;
    }

    async fn handle_text(&self, chat_id: ChatId, user_id: UserId, text: &str) {
        let state = self.repo.conversation_state(user_id).await;
        let Some(mut registration) = self.repo.find_registration(user_id).await else {
            return self.send(messages::reminder(chat_id)).await;
        };
        let Some(step) = advance(state, &mut registration, text) else {
            return self.send(messages::reminder(chat_id)).await;
        };

        debug!("user {user_id} advanced from {state:?} to {step:?}");
        self.repo
            .save(user_id, registration.clone(), step.next_state())
            .await;

        match step {
            Step::NeedPhone => self.send(messages::ask_phone(chat_id, &registration)).await,
            Step::NeedRestaurant => {
                self.send(messages::ask_restaurant(chat_id, &registration))
                    .await
            }
            Step::Completed => {
                info!(
                    "user {user_id} completed registration as {}",
                    registration.role
                );
                self.send(messages::registration_complete(chat_id, &registration))
                    .await;
                self.notify_admins(user_id, &registration).await;
            }
        }
    }
}
