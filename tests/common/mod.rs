//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use di::{Injectable, Ref, ServiceCollection, singleton, singleton_as_self};
use di_axum::RouterServiceProviderExtensions;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use teloxide::{ApiError, RequestError};
use tower::ServiceExt;
use veripay_webhook_bot::api;
use veripay_webhook_bot::config::Settings;
use veripay_webhook_bot::core::services::MyRegistrationService;
use veripay_webhook_bot::infrastructure::repositories::InMemoryRegistrationRepository;
use veripay_webhook_bot::infrastructure::telegram::{OutboundMessage, SendError};
use veripay_webhook_bot::infrastructure::traits::{Messenger, RegistrationRepository};

/// Messenger that keeps every message instead of calling Telegram.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<OutboundMessage>>,
    answered: Mutex<Vec<(String, String)>>,
    failing: bool,
}

impl RecordingMessenger {
    /// Records messages but reports every delivery as failed.
    pub fn failing() -> RecordingMessenger {
        RecordingMessenger {
            sent: Mutex::default(),
            answered: Mutex::default(),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> OutboundMessage {
        self.sent().pop().expect("no message was sent")
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Answered callback queries as `(query_id, text)`.
    pub fn answered(&self) -> Vec<(String, String)> {
        self.answered.lock().unwrap().clone()
    }

    fn outcome(&self) -> Result<(), SendError> {
        if self.failing {
            Err(RequestError::Api(ApiError::BotBlocked).into())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, message: OutboundMessage) -> Result<(), SendError> {
        self.sent.lock().unwrap().push(message);
        self.outcome()
    }

    async fn answer_callback(&self, query_id: String, text: String) -> Result<(), SendError> {
        self.answered.lock().unwrap().push((query_id, text));
        self.outcome()
    }
}

pub fn test_settings() -> Settings {
    Settings::new("123456:TEST-TOKEN")
}

pub struct TestService {
    pub service: MyRegistrationService,
    pub repo: Arc<InMemoryRegistrationRepository>,
    pub messenger: Arc<RecordingMessenger>,
}

pub fn test_service_with(settings: Settings, messenger: RecordingMessenger) -> TestService {
    let repo = Arc::new(InMemoryRegistrationRepository::default());
    let messenger = Arc::new(messenger);
    let service = MyRegistrationService::new(
        repo.clone(),
        messenger.clone(),
        Ref::new(settings),
    );

    TestService {
        service,
        repo,
        messenger,
    }
}

pub fn test_service() -> TestService {
    test_service_with(test_settings(), RecordingMessenger::default())
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryRegistrationRepository>,
    pub messenger: Arc<RecordingMessenger>,
}

/// Router wired like production, except that the messenger records messages.
pub fn test_app_with(messenger: RecordingMessenger) -> TestApp {
    let settings = Ref::new(test_settings());
    let repo = Arc::new(InMemoryRegistrationRepository::default());
    let messenger = Arc::new(messenger);

    let provided_repo = repo.clone();
    let provided_messenger = messenger.clone();

    let provider = ServiceCollection::new()
        .add(singleton_as_self::<Settings>().from(move |_| settings.clone()))
        .add(
            singleton::<dyn RegistrationRepository, InMemoryRegistrationRepository>().from(
                move |_| -> Ref<dyn RegistrationRepository> { provided_repo.clone() },
            ),
        )
        .add(
            singleton::<dyn Messenger, RecordingMessenger>()
                .from(move |_| -> Ref<dyn Messenger> { provided_messenger.clone() }),
        )
        .add(MyRegistrationService::scoped())
        .build_provider()
        .unwrap();

    TestApp {
        router: api::router().with_provider(provider),
        repo,
        messenger,
    }
}

pub fn test_app() -> TestApp {
    test_app_with(RecordingMessenger::default())
}

impl TestApp {
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (status, json)
    }

    pub async fn post_update(&self, update: Value) -> (StatusCode, Value) {
        self.request(
            Request::builder()
                .method("POST")
                .uri("/webhook")
                .header("content-type", "application/json")
                .body(Body::from(update.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub fn text_update(chat_id: i64, user_id: i64, text: &str) -> Value {
    serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "chat": { "id": chat_id, "type": "private" },
            "from": { "id": user_id, "is_bot": false, "first_name": "Test" },
            "text": text
        }
    })
}

pub fn callback_update(chat_id: i64, user_id: i64, data: &str) -> Value {
    serde_json::json!({
        "update_id": 2,
        "callback_query": {
            "id": "cb-1",
            "message": { "message_id": 11, "chat": { "id": chat_id } },
            "from": { "id": user_id, "is_bot": false, "first_name": "Test" },
            "data": data
        }
    })
}
