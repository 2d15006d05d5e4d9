//! Capabilities the dashboard core borrows from its host: routing, toasts, and the signed-in session.

use std::sync::{Mutex, PoisonError};

use shared::domain::CurrentUser;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

pub trait Notifier: Send + Sync {
    fn notify_success(&self, text: &str);
    fn notify_error(&self, text: &str);
}

pub trait AuthSession: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;
    fn access_token(&self) -> Option<String>;
    fn logout(&self);
}

pub struct AnonymousSession;

impl AuthSession for AnonymousSession {
    fn current_user(&self) -> Option<CurrentUser> {
        None
    }

    fn access_token(&self) -> Option<String> {
        None
    }

    fn logout(&self) {}
}

#[derive(Default)]
struct SessionSlot {
    user: Option<CurrentUser>,
    token: Option<String>,
}

/// Session seeded from configuration; `logout` forgets both user and token.
#[derive(Default)]
pub struct StaticSession {
    slot: Mutex<SessionSlot>,
}

impl StaticSession {
    pub fn new(user: Option<CurrentUser>, token: Option<String>) -> Self {
        Self {
            slot: Mutex::new(SessionSlot { user, token }),
        }
    }
}

impl AuthSession for StaticSession {
    fn current_user(&self) -> Option<CurrentUser> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .user
            .clone()
    }

    fn access_token(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    fn logout(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(user) = slot.user.take() {
            info!(user_id = %user.user_id, "session logged out");
        }
        slot.token = None;
    }
}
