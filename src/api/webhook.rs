//! Telegram webhook endpoint

use crate::api::ApiError;
use crate::api::webhook::schemas::{Acknowledgement, Event, Update};
use crate::core::traits::RegistrationService;
use async_trait::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use di_axum::Inject;
use log::debug;

pub fn router() -> Router {
    Router::new()
        .route("/", post(receive_update).fallback(method_not_allowed))
        .route("/webhook", post(receive_update).fallback(method_not_allowed))
}

/// A webhook update parsed from the JSON body. Malformed bodies are rejected
/// with `400` and a JSON error instead of axum's plain text rejection.
#[derive(Debug)]
pub struct WebhookUpdate(pub Update);

#[async_trait]
impl<S> FromRequest<S> for WebhookUpdate
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let Json(update) = Json::<Update>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        Ok(WebhookUpdate(update))
    }
}

async fn receive_update(
    Inject(registration_service): Inject<dyn RegistrationService>,
    WebhookUpdate(update): WebhookUpdate,
) -> (StatusCode, Json<Acknowledgement>) {
    let events = update.events();
    if events.is_empty() {
        debug!("update carries nothing to dispatch: {update:?}");
    }

    for event in events {
        match event {
            Event::Start { chat_id, user_id } => {
                registration_service.welcome(chat_id, user_id).await
            }
            Event::Text {
                chat_id,
                user_id,
                text,
            } => registration_service.handle_text(chat_id, user_id, text).await,
            Event::Callback {
                chat_id,
                user_id,
                query_id,
                action,
            } => {
                registration_service
                    .select_role(chat_id, user_id, query_id, action)
                    .await
            }
        }
    }

    (StatusCode::OK, Json(Acknowledgement::success()))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub mod schemas {
    use crate::infrastructure::entities::{ChatId, UserId};
    use serde::{Deserialize, Serialize};

    const START_COMMAND: &str = "/start";

    #[derive(Deserialize, Debug)]
    pub struct Chat {
        pub id: ChatId,
    }

    #[derive(Deserialize, Debug)]
    pub struct User {
        pub id: UserId,
    }

    #[derive(Deserialize, Debug)]
    pub struct Message {
        pub chat: Chat,
        pub from: User,
        pub text: Option<String>,
    }

    /// The message an inline keyboard was attached to.
    #[derive(Deserialize, Debug)]
    pub struct CallbackMessage {
        pub chat: Chat,
    }

    #[derive(Deserialize, Debug)]
    pub struct CallbackQuery {
        pub id: Option<String>,
        pub message: CallbackMessage,
        pub from: User,
        pub data: Option<String>,
    }

    /// The subset of a Telegram `Update` the bot reacts to. Other update kinds
    /// deserialize with both fields empty.
    #[derive(Deserialize, Debug, Default)]
    pub struct Update {
        pub message: Option<Message>,
        pub callback_query: Option<CallbackQuery>,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event<'a> {
        Start {
            chat_id: ChatId,
            user_id: UserId,
        },
        Text {
            chat_id: ChatId,
            user_id: UserId,
            text: &'a str,
        },
        Callback {
            chat_id: ChatId,
            user_id: UserId,
            query_id: Option<&'a str>,
            action: &'a str,
        },
    }

    impl Update {
        /// Classifies the update. Message text goes first, then the callback.
        pub fn events(&self) -> Vec<Event<'_>> {
            let mut events = Vec::new();

            if let Some(message) = &self.message
                && let Some(text) = message.text.as_deref()
            {
                let (chat_id, user_id) = (message.chat.id, message.from.id);
                events.push(if text.starts_with(START_COMMAND) {
                    Event::Start { chat_id, user_id }
                } else {
                    Event::Text {
                        chat_id,
                        user_id,
                        text,
                    }
                });
            }

            if let Some(query) = &self.callback_query
                && let Some(action) = query.data.as_deref()
            {
                events.push(Event::Callback {
                    chat_id: query.message.chat.id,
                    user_id: query.from.id,
                    query_id: query.id.as_deref(),
                    action,
                });
            }

            events
        }
    }

    #[derive(Serialize, Debug, PartialEq, Eq)]
    pub struct Acknowledgement {
        pub status: &'static str,
    }

    impl Acknowledgement {
        pub fn success() -> Acknowledgement {
            Acknowledgement { status: "success" }
        }
    }
}
