//! Registration entities

use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter};

/// Telegram user identifier.
pub type UserId = i64;

/// Telegram chat identifier.
pub type ChatId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Waiter,
    Admin,
}

impl Role {
    /// Action token carried by the inline button that selects this role.
    pub fn action_token(self) -> &'static str {
        match self {
            Role::Waiter => "register_waiter",
            Role::Admin => "register_admin",
        }
    }

    /// Resolves an inline button action token. Unknown tokens yield `None`.
    pub fn from_action_token(token: &str) -> Option<Role> {
        match token {
            "register_waiter" => Some(Role::Waiter),
            "register_admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Waiter => f.write_str("waiter"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub role: Role,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub restaurant_name: Option<String>,
    pub approved: bool,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(role: Role) -> Registration {
        Registration {
            role,
            name: None,
            phone: None,
            restaurant_name: None,
            approved: false,
            registered_at: Utc::now(),
        }
    }
}

/// Where a user currently is in the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingName,
    AwaitingPhone,
    AwaitingRestaurant,
}
