use crate::notify::message::ToastMessage;
use crate::notify::ToastConfig;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: ToastMessage,
    pub shown_at: Instant,
    pub expires_at: Option<Instant>,
}

impl Toast {
    /// Fraction of the display time left, `1.0` for sticky toasts.
    pub fn remaining(&self, now: Instant) -> f32 {
        let Some(expires_at) = self.expires_at else {
            return 1.0;
        };
        let total = expires_at.saturating_duration_since(self.shown_at);
        if total.is_zero() {
            return 0.0;
        }
        let left = expires_at.saturating_duration_since(now);
        (left.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// The visible toast stack.
pub struct ToastQueue {
    config: ToastConfig,
    toasts: VecDeque<Toast>,
    next_id: u64,
    previous_html: Option<String>,
}

impl ToastQueue {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: VecDeque::new(),
            next_id: 1,
            previous_html: None,
        }
    }

    pub fn config(&self) -> &ToastConfig {
        &self.config
    }

    /// Shows a toast. Returns `None` when it repeats the message of the
    /// previous toast while duplicates are suppressed. Toasts that ran out
    /// before `now` are dropped first, so a repeat after the stack emptied
    /// is shown again.
    pub fn push(&mut self, message: ToastMessage, now: Instant) -> Option<u64> {
        self.expire(now);
        let html = message.to_html();
        if self.config.prevent_duplicates {
            if self.previous_html.as_deref() == Some(html.as_str()) {
                log::debug!("suppressed duplicate toast: {}", message.plain_text());
                return None;
            }
            self.previous_html = Some(html);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push_back(Toast {
            id,
            message,
            shown_at: now,
            expires_at: self.config.timeout().map(|timeout| now + timeout),
        });
        Some(id)
    }

    /// Removes toasts whose display time has run out and returns them.
    pub fn expire(&mut self, now: Instant) -> Vec<Toast> {
        let mut expired = Vec::new();
        self.toasts.retain(|toast| {
            if toast.is_expired(now) {
                expired.push(toast.clone());
                false
            } else {
                true
            }
        });
        self.forget_previous_if_empty();
        expired
    }

    /// User-initiated close; only honoured when the close button is shown.
    pub fn close(&mut self, id: u64) -> bool {
        if !self.config.close_button {
            return false;
        }
        self.dismiss(id)
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        let removed = self.toasts.len() != before;
        self.forget_previous_if_empty();
        removed
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
        self.previous_html = None;
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Toasts in display order.
    pub fn visible(&self) -> Vec<&Toast> {
        if self.config.newest_on_top {
            self.toasts.iter().rev().collect()
        } else {
            self.toasts.iter().collect()
        }
    }

    /// Time until the next toast expires, capped at `default_timeout`.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.toasts
            .iter()
            .filter_map(|toast| toast.expires_at)
            .map(|at| at.saturating_duration_since(now))
            .fold(default_timeout, Duration::min)
    }

    fn forget_previous_if_empty(&mut self) {
        if self.toasts.is_empty() {
            self.previous_html = None;
        }
    }
}
