//! Texts the bot sends, rendered for legacy Telegram Markdown.

use crate::infrastructure::entities::{ChatId, Registration, Role, UserId};
use crate::infrastructure::telegram::OutboundMessage;

/// Escapes the characters legacy Markdown treats as markup so user input is
/// echoed back verbatim.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn field(value: &Option<String>) -> String {
    value.as_deref().map(escape_markdown).unwrap_or_default()
}

pub fn role_selection(chat_id: ChatId) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        "🎉 *Welcome to VeriPay!*\n\n\
         I help restaurants verify payment screenshots quickly and securely.\n\n\
         Please choose how you want to register:",
    )
    .with_button("👨‍💼 Register as Waiter", Role::Waiter.action_token())
    .with_button("🏪 Register as Admin", Role::Admin.action_token())
}

pub fn welcome_back(chat_id: ChatId, registration: &Registration) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!(
            "👋 *Welcome back to VeriPay!*\n\nYou are registered as *{}*.",
            registration.role
        ),
    )
}

/// Notification shown when a role button is pressed.
pub fn role_selected(role: Role) -> String {
    format!("Starting {role} registration...")
}

pub fn ask_name(chat_id: ChatId, role: Role) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!("📝 *Registration as {role}*\n\nPlease provide your full name:"),
    )
}

pub fn ask_phone(chat_id: ChatId, registration: &Registration) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!(
            "✅ Name: {}\n\nPlease provide your phone number:",
            field(&registration.name)
        ),
    )
}

pub fn ask_restaurant(chat_id: ChatId, registration: &Registration) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!(
            "✅ Phone: {}\n\nPlease provide your restaurant name:",
            field(&registration.phone)
        ),
    )
}

fn summary(registration: &Registration) -> String {
    format!(
        "*Role:* {}\n*Name:* {}\n*Phone:* {}\n*Restaurant:* {}",
        registration.role,
        field(&registration.name),
        field(&registration.phone),
        field(&registration.restaurant_name),
    )
}

pub fn registration_complete(chat_id: ChatId, registration: &Registration) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!(
            "🎉 *Registration complete!*\n\n{}\n\nSend /start to open the menu.",
            summary(registration)
        ),
    )
}

pub fn admin_notification(
    chat_id: ChatId,
    user_id: UserId,
    registration: &Registration,
) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        format!(
            "🆕 *New registration*\n\n{}\n*User ID:* {user_id}\n*Started:* {}",
            summary(registration),
            registration.registered_at.format("%Y-%m-%d %H:%M UTC"),
        ),
    )
}

pub fn reminder(chat_id: ChatId) -> OutboundMessage {
    OutboundMessage::text(
        chat_id,
        "Please use the menu buttons or send /start to begin.",
    )
}
