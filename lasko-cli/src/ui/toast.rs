use colored::Colorize;
use lasko::{Notification, NotificationEvent, Notifier, Severity};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::Receiver;

/// Prints notifier toasts as they are published
pub struct Toasts {
    events: Receiver<NotificationEvent>,
}

impl Toasts {
    pub fn new(notifier: &Notifier) -> Self {
        Self {
            events: notifier.subscribe(),
        }
    }

    /// Print every toast shown since the last flush. Dismissals are ignored:
    /// a printed line cannot be taken back.
    pub fn flush(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(NotificationEvent::Shown(notification)) => {
                    println!("{}", format_toast(&notification));
                }
                Ok(NotificationEvent::Dismissed(_)) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} toasts", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
    }
}

pub fn format_toast(notification: &Notification) -> String {
    let message = notification.message.as_str();
    match notification.severity {
        Severity::Success => format!("{} {}", "✓".green().bold(), message.green()),
        Severity::Error => format!("{} {}", "✗".red().bold(), message.red()),
        Severity::Warning => format!("{} {}", "!".yellow().bold(), message.yellow()),
        Severity::Info => format!("{} {}", "i".blue().bold(), message),
    }
}
