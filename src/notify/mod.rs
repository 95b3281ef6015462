//! Toast notifications raised by step checks.
//!
//! The queue here is the host-independent model of the toast stack: it
//! applies the display options (ordering, duplicate suppression,
//! auto-dismiss) and leaves drawing to the host.

pub mod message;
pub mod queue;

pub use message::ToastMessage;
pub use queue::{Toast, ToastQueue};

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPosition {
    #[default]
    TopRight,
    TopLeft,
    TopCenter,
    TopFullWidth,
    BottomRight,
    BottomLeft,
    BottomCenter,
    BottomFullWidth,
}

impl ToastPosition {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::TopRight => "toast-top-right",
            Self::TopLeft => "toast-top-left",
            Self::TopCenter => "toast-top-center",
            Self::TopFullWidth => "toast-top-full-width",
            Self::BottomRight => "toast-bottom-right",
            Self::BottomLeft => "toast-bottom-left",
            Self::BottomCenter => "toast-bottom-center",
            Self::BottomFullWidth => "toast-bottom-full-width",
        }
    }
}

/// Display options for the toast stack, one value per option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    pub close_button: bool,
    pub progress_bar: bool,
    pub position: ToastPosition,
    /// Auto-dismiss delay; `0` keeps toasts until closed.
    pub timeout_ms: u64,
    pub prevent_duplicates: bool,
    pub newest_on_top: bool,
    pub toast_class: String,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            close_button: true,
            progress_bar: true,
            position: ToastPosition::TopRight,
            timeout_ms: 5_000,
            prevent_duplicates: true,
            newest_on_top: true,
            toast_class: "toast-error".to_string(),
        }
    }
}

impl ToastConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::{ToastConfig, ToastPosition};
    use std::time::Duration;

    #[test]
    fn defaults_match_registration_page() {
        let config = ToastConfig::default();
        assert!(config.close_button);
        assert!(config.progress_bar);
        assert_eq!(config.position.css_class(), "toast-top-right");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert!(config.prevent_duplicates);
        assert!(config.newest_on_top);
        assert_eq!(config.toast_class, "toast-error");
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: ToastConfig =
            serde_yaml::from_str("timeout_ms: 0\nposition: bottom_left\n").expect("toast config");
        assert_eq!(config.timeout(), None);
        assert_eq!(config.position, ToastPosition::BottomLeft);
        assert!(config.prevent_duplicates);
    }
}
