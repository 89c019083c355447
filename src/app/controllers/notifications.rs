use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient, auto-dismissing message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub expires_at: i64,
}

/// Queue of live notifications, oldest first. Expired entries are dropped by
/// [`Notifications::prune`].
#[derive(Debug, Clone)]
pub struct Notifications {
    ttl_millis: i64,
    items: VecDeque<Notification>,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl_millis: ttl.as_millis() as i64,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, level: NotificationLevel, now: i64) {
        let message = message.into();
        match level {
            NotificationLevel::Success => tracing::debug!("notify: {}", message),
            NotificationLevel::Error => tracing::warn!("notify: {}", message),
        }
        self.items.push_back(Notification {
            message,
            level,
            expires_at: now + self.ttl_millis,
        });
    }

    pub fn success(&mut self, message: impl Into<String>, now: i64) {
        self.push(message, NotificationLevel::Success, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: i64) {
        self.push(message, NotificationLevel::Error, now);
    }

    pub fn prune(&mut self, now: i64) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
