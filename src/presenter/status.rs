//! Status line presenter
//!
//! Holds the single status message shown to the user. Renderers subscribe
//! to a watch channel. Success messages can revert to an idle prompt after
//! a delay; whether they do is decided by the presenter's `auto_hide` flag
//! and can be overridden per call.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const IDLE_MESSAGE: &str = "Ready for next action";
pub const AUTO_HIDE_DELAY: Duration = Duration::from_secs(3);

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    pub fn icon(&self) -> &'static str {
        match self {
            StatusKind::Info => "ℹ",
            StatusKind::Success => "✓",
            StatusKind::Warning => "⚠",
            StatusKind::Error => "✕",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusKind::Info => "info",
            StatusKind::Success => "success",
            StatusKind::Warning => "warning",
            StatusKind::Error => "error",
        };
        f.write_str(s)
    }
}

/// The message currently displayed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
    /// Increments on every update
    pub seq: u64,
}

/// Per-call auto-hide override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoHide {
    /// Follow the presenter's flag
    #[default]
    Default,
    Never,
}

/// Publishes status updates
#[derive(Clone)]
pub struct StatusPresenter {
    tx: Arc<watch::Sender<Status>>,
    seq: Arc<AtomicU64>,
    auto_hide: Arc<AtomicBool>,
    delay: Duration,
}

impl StatusPresenter {
    pub fn new(auto_hide: bool) -> Self {
        Self::with_delay(auto_hide, AUTO_HIDE_DELAY)
    }

    pub fn with_delay(auto_hide: bool, delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(Status {
            kind: StatusKind::Info,
            message: IDLE_MESSAGE.to_string(),
            seq: 0,
        });

        Self {
            tx: Arc::new(tx),
            seq: Arc::new(AtomicU64::new(0)),
            auto_hide: Arc::new(AtomicBool::new(auto_hide)),
            delay,
        }
    }

    pub fn set_auto_hide(&self, enabled: bool) {
        self.auto_hide.store(enabled, Ordering::Relaxed);
    }

    pub fn auto_hide(&self) -> bool {
        self.auto_hide.load(Ordering::Relaxed)
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Status {
        self.tx.borrow().clone()
    }

    pub fn info(&self, message: impl Into<String>) {
        self.set(StatusKind::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.set(StatusKind::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.set(StatusKind::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.set(StatusKind::Error, message);
    }

    pub fn set(&self, kind: StatusKind, message: impl Into<String>) {
        self.set_with(kind, message, AutoHide::Default);
    }

    /// Publish a status, scheduling the idle revert for successes
    pub fn set_with(&self, kind: StatusKind, message: impl Into<String>, hide: AutoHide) {
        let message = message.into();
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        match kind {
            StatusKind::Error => tracing::warn!(status = %kind, "{}", message),
            _ => tracing::info!(status = %kind, "{}", message),
        }

        self.tx.send_replace(Status { kind, message, seq });

        if kind == StatusKind::Success && hide == AutoHide::Default && self.auto_hide() {
            self.schedule_revert(seq);
        }
    }

    fn schedule_revert(&self, seq: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let tx = Arc::clone(&self.tx);
        let counter = Arc::clone(&self.seq);
        let delay = self.delay;

        handle.spawn(async move {
            tokio::time::sleep(delay).await;
            tx.send_if_modified(|status| {
                // Only revert if nothing replaced the success message
                if status.seq == seq && status.kind == StatusKind::Success {
                    *status = Status {
                        kind: StatusKind::Info,
                        message: IDLE_MESSAGE.to_string(),
                        seq: counter.fetch_add(1, Ordering::SeqCst) + 1,
                    };
                    true
                } else {
                    false
                }
            });
        });
    }
}
