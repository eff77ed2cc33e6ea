//! One-shot user notifications.
//!
//! Fire and forget: the core pushes a message and moves on. A [`Toast`]
//! shows the latest message until [`DISPLAY_DURATION`] has passed.

use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(3);

/// User-facing status strings.
pub mod messages {
    pub const MIN_ONE_SLIDE: &str = "Minimum one slide.";
    pub const LIBRARIES_LOADING: &str = "Libraries loading... try again.";
    pub const EXPORT_BUSY: &str = "An export is already running.";
    pub const GENERATING_PDF: &str = "Generating PDF...";
    pub const GENERATING_PPTX: &str = "Generating PowerPoint...";
    pub const PDF_DONE: &str = "PDF exported successfully.";
    pub const PPTX_DONE: &str = "PPTX exported successfully.";
    pub const PDF_FAILED: &str = "Error generating PDF.";
    pub const PPTX_FAILED: &str = "Error generating PPTX.";
}

/// Sink for status messages.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Latest-message toast with auto-clear.
#[derive(Debug, Clone, Default)]
pub struct Toast {
    current: Option<(String, Instant)>,
    /// Every message shown since the last [`Toast::take_unseen`], oldest first.
    unseen: Vec<String>,
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` as of `now`, replacing any current one.
    pub fn show_at(&mut self, message: &str, now: Instant) {
        self.current = Some((message.to_string(), now));
        self.unseen.push(message.to_string());
    }

    /// The message visible at `now`, if any.
    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(_, shown)| now.saturating_duration_since(*shown) < DISPLAY_DURATION)
            .map(|(message, _)| message.as_str())
    }

    pub fn visible(&self) -> Option<&str> {
        self.visible_at(Instant::now())
    }

    /// Messages shown since the last call, including ones a later message
    /// already replaced on screen.
    pub fn take_unseen(&mut self) -> Vec<String> {
        std::mem::take(&mut self.unseen)
    }
}

impl Notifier for Toast {
    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
        self.show_at(message, Instant::now());
    }
}

/// Records every message; handy when the full history matters.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    pub messages: Vec<String>,
}

impl Notifier for NotificationLog {
    fn notify(&mut self, message: &str) {
        log::info!("{}", message);
        self.messages.push(message.to_string());
    }
}
