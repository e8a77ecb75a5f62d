//! User-visible status notifications ("toasts")
//!
//! Flows report progress and outcomes through a [`Notifier`]. The CLI prints
//! them; the TUI keeps them in a [`ToastLog`] and shows the latest one in the
//! footer. Notifications are fire-and-forget.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// An operation is in progress
    Loading,
    Success,
    Error,
}

/// A single status message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn loading(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Loading,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for toasts
pub trait Notifier {
    /// Shows a toast
    fn notify(&self, toast: Toast);

    /// Removes any loading toast that is still showing
    fn dismiss_loading(&self) {}
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }

    fn dismiss_loading(&self) {
        (**self).dismiss_loading()
    }
}

/// Prints toasts to the terminal: progress and success on stdout, errors on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, toast: Toast) {
        match toast.level {
            ToastLevel::Loading => println!("\u{2026} {}", toast.message),
            ToastLevel::Success => println!("\u{2714} {}", toast.message),
            ToastLevel::Error => eprintln!("\u{2716} {}", toast.message),
        }
    }
}

/// Maximum number of toasts retained by a [`ToastLog`]
const TOAST_LOG_CAPACITY: usize = 16;

/// Shared, bounded history of toasts
///
/// Cloning yields another handle onto the same log.
#[derive(Debug, Clone, Default)]
pub struct ToastLog {
    toasts: Arc<Mutex<VecDeque<Toast>>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent toast still showing
    pub fn latest(&self) -> Option<Toast> {
        self.toasts.lock().ok()?.back().cloned()
    }

    /// Snapshot of every retained toast, oldest first
    pub fn all(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .map(|toasts| toasts.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.clear();
        }
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        if let Ok(mut toasts) = self.toasts.lock() {
            if toasts.len() == TOAST_LOG_CAPACITY {
                toasts.pop_front();
            }
            toasts.push_back(toast);
        }
    }

    fn dismiss_loading(&self) {
        if let Ok(mut toasts) = self.toasts.lock() {
            toasts.retain(|t| t.level != ToastLevel::Loading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_log_keeps_latest() {
        let log = ToastLog::new();
        log.notify(Toast::loading("Processing..."));
        log.notify(Toast::success("Done"));

        assert_eq!(log.latest(), Some(Toast::success("Done")));
        assert_eq!(log.all().len(), 2);
    }

    #[test]
    fn test_dismiss_loading_removes_only_loading_toasts() {
        let log = ToastLog::new();
        log.notify(Toast::loading("Processing..."));
        log.notify(Toast::error("Oops"));
        log.notify(Toast::loading("Verifying..."));

        log.dismiss_loading();

        assert_eq!(log.all(), vec![Toast::error("Oops")]);
    }

    #[test]
    fn test_toast_log_is_bounded() {
        let log = ToastLog::new();
        for i in 0..(TOAST_LOG_CAPACITY + 5) {
            log.notify(Toast::success(format!("toast {}", i)));
        }

        let all = log.all();
        assert_eq!(all.len(), TOAST_LOG_CAPACITY);
        assert_eq!(all[0].message, "toast 5");
    }

    #[test]
    fn test_clones_share_the_log() {
        let log = ToastLog::new();
        let handle = log.clone();
        handle.notify(Toast::success("shared"));

        assert_eq!(log.latest().map(|t| t.message), Some("shared".to_string()));
        log.clear();
        assert!(handle.latest().is_none());
    }
}
