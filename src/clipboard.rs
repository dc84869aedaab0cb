//! Clipboard copy with a transient "copied" acknowledgment.

use std::error::Error;
use std::time::Duration;

pub const FEEDBACK_MESSAGE: &str = "Copied to clipboard!";

/// Delay before the feedback toast is shown.
pub const FEEDBACK_SHOW_DELAY: Duration = Duration::from_millis(10);
pub const FEEDBACK_VISIBLE: Duration = Duration::from_millis(2000);
pub const FEEDBACK_FADE: Duration = Duration::from_millis(500);
/// How long the copy button shows its check icon.
pub const ICON_RESTORE_DELAY: Duration = Duration::from_millis(2000);

/// Write-only clipboard access.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Nothing to copy.
    Skipped,
    Copied(Acknowledgment),
    /// The write failed; no acknowledgment is shown.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackPhase {
    Pending,
    Visible,
    Fading,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyIcon {
    Copy,
    Check,
}

/// Timing of the success acknowledgment, measured from the moment the
/// write succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Acknowledgment;

impl Acknowledgment {
    pub fn message(&self) -> &'static str {
        FEEDBACK_MESSAGE
    }

    pub fn phase_at(&self, elapsed: Duration) -> FeedbackPhase {
        let hide_at = FEEDBACK_SHOW_DELAY + FEEDBACK_VISIBLE;
        if elapsed < FEEDBACK_SHOW_DELAY {
            FeedbackPhase::Pending
        } else if elapsed < hide_at {
            FeedbackPhase::Visible
        } else if elapsed < hide_at + FEEDBACK_FADE {
            FeedbackPhase::Fading
        } else {
            FeedbackPhase::Removed
        }
    }

    pub fn icon_at(&self, elapsed: Duration) -> CopyIcon {
        if elapsed < ICON_RESTORE_DELAY {
            CopyIcon::Check
        } else {
            CopyIcon::Copy
        }
    }

    /// Total time until every visual trace is gone.
    pub fn lifetime(&self) -> Duration {
        (FEEDBACK_SHOW_DELAY + FEEDBACK_VISIBLE + FEEDBACK_FADE).max(ICON_RESTORE_DELAY)
    }
}

pub fn copy_text<W: ClipboardWriter + ?Sized>(writer: &mut W, text: &str) -> CopyOutcome {
    if text.is_empty() {
        return CopyOutcome::Skipped;
    }
    match writer.write_text(text) {
        Ok(()) => CopyOutcome::Copied(Acknowledgment),
        Err(e) => {
            log::debug!("clipboard write failed: {e}");
            CopyOutcome::Failed
        }
    }
}

/// System clipboard via `arboard`.
#[cfg(feature = "native")]
pub struct ArboardClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "native")]
impl ArboardClipboard {
    pub fn new() -> Result<Self, arboard::Error> {
        Ok(ArboardClipboard {
            inner: arboard::Clipboard::new()?,
        })
    }
}

#[cfg(feature = "native")]
impl ClipboardWriter for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn Error>> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }
}
