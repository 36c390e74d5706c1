//! VeriPay registration bot webhook - Library exports for testing

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

use crate::config::Settings;
use crate::core::services::MyRegistrationService;
use crate::infrastructure::repositories::InMemoryRegistrationRepository;
use crate::infrastructure::telegram::TelegramMessenger;
use di::{Injectable, Ref, ServiceCollection, singleton_as_self};

/// Services wired for production: an in-memory store shared by every request
/// and a messenger talking to the Telegram Bot API.
pub fn services(settings: Settings) -> ServiceCollection {
    let settings = Ref::new(settings);
    let mut services = ServiceCollection::new();
    services
        .add(singleton_as_self::<Settings>().from(move |_| settings.clone()))
        .add(InMemoryRegistrationRepository::singleton())
        .add(TelegramMessenger::singleton())
        .add(MyRegistrationService::scoped());
    services
}
