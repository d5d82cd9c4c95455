//! Clipboard sinks for share links.
//!
//! Copying is a convenience: a failure is logged and reported back to the
//! caller but never fails the share itself.

/// Something that can receive the share URL.
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Whether a copy should be attempted at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Discards everything. The default when no clipboard is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Err("no clipboard configured".into())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// The system clipboard via `arboard` (requires the `clipboard` feature).
#[cfg(feature = "clipboard")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClipboard;

#[cfg(feature = "clipboard")]
impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Copy `text`, logging instead of failing. Returns whether it was copied.
pub(crate) fn copy_or_warn(clipboard: &dyn Clipboard, text: &str) -> bool {
    if !clipboard.is_available() {
        tracing::debug!("No clipboard configured, share link not copied");
        return false;
    }
    match clipboard.write_text(text) {
        Ok(()) => {
            tracing::debug!("Copied share link to clipboard");
            true
        }
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingClipboard {
        writes: AtomicUsize,
        available: bool,
    }

    impl Clipboard for CountingClipboard {
        fn write_text(&self, _text: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    #[test]
    fn no_clipboard_reports_not_copied() {
        assert!(!NoClipboard.is_available());
        assert!(!copy_or_warn(&NoClipboard, "https://t.example"));
    }

    #[test]
    fn unavailable_clipboard_is_not_written() {
        let clipboard = CountingClipboard::default();
        assert!(!copy_or_warn(&clipboard, "https://t.example"));
        assert_eq!(clipboard.writes.load(Ordering::SeqCst), 0);

        let clipboard = CountingClipboard {
            available: true,
            ..Default::default()
        };
        assert!(copy_or_warn(&clipboard, "https://t.example"));
        assert_eq!(clipboard.writes.load(Ordering::SeqCst), 1);
    }
}
