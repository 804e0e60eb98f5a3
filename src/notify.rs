//! Toast notifications.
//!
//! A [`Notifier`] is created once at the application root and cloned into
//! whatever needs to report something. Renderers subscribe to the event
//! stream; each notification dismisses itself after its duration when a
//! Tokio runtime is available.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn default_duration(&self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_millis(3000),
            Severity::Warning => Duration::from_millis(4000),
            Severity::Error => Duration::from_millis(5000),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub duration_ms: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    Shown(Notification),
    Dismissed(Uuid),
}

#[derive(Default)]
struct State {
    active: Vec<Notification>,
    timers: HashMap<Uuid, JoinHandle<()>>,
}

struct Inner {
    sender: broadcast::Sender<NotificationEvent>,
    state: Mutex<State>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: Uuid, abort_timer: bool) -> bool {
        let removed = {
            let mut state = self.state();
            if let Some(timer) = state.timers.remove(&id) {
                if abort_timer {
                    timer.abort();
                }
            }

            let before = state.active.len();
            state.active.retain(|n| n.id != id);
            state.active.len() != before
        };

        if removed {
            let _ = self.sender.send(NotificationEvent::Dismissed(id));
        }
        removed
    }
}

/// Cloneable handle to the application's notification store
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                sender,
                state: Mutex::new(State::default()),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.inner.sender.subscribe()
    }

    /// Publish with the severity's default duration
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        self.notify_for(message, severity, severity.default_duration())
    }

    pub fn notify_for(
        &self,
        message: impl Into<String>,
        severity: Severity,
        duration: Duration,
    ) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            duration_ms: duration.as_millis() as u64,
            created_at: Utc::now(),
        };
        let id = notification.id;

        match severity {
            Severity::Error => tracing::error!("{}", notification.message),
            Severity::Warning => tracing::warn!("{}", notification.message),
            _ => tracing::info!("{}", notification.message),
        }

        self.inner.state().active.push(notification.clone());
        let _ = self.inner.sender.send(NotificationEvent::Shown(notification));

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            // Held across the spawn: the timer's removal waits for the insert.
            let mut state = self.inner.state();
            let timer = handle.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id, false);
                }
            });
            state.timers.insert(id, timer);
        }

        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, Severity::Error)
    }

    pub fn warning(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, Severity::Warning)
    }

    pub fn info(&self, message: impl Into<String>) -> Uuid {
        self.notify(message, Severity::Info)
    }

    /// Dismiss early; returns `false` if it was already gone
    pub fn dismiss(&self, id: Uuid) -> bool {
        self.inner.remove(id, true)
    }

    /// Notifications currently on screen, oldest first
    pub fn active(&self) -> Vec<Notification> {
        self.inner.state().active.clone()
    }

    /// Cancel every pending dismissal timer and clear the store
    pub fn shutdown(&self) {
        let mut state = self.inner.state();
        for (_, timer) in state.timers.drain() {
            timer.abort();
        }
        state.active.clear();
    }
}
