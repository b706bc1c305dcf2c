//! Clipboard and browser access, plus the per-record "copied" indicator.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use uuid::Uuid;

/// How long a record shows as copied.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

/// Write-only clipboard.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// System clipboard via `arboard`. The handle is opened on first use and
/// kept so the contents survive on X11.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new().context("clipboard unavailable")?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard
                .set_text(text.to_string())
                .context("failed to write clipboard")?;
        }
        Ok(())
    }
}

/// Opens URLs outside the terminal.
pub trait UrlOpener {
    fn open(&mut self, url: &str) -> Result<()>;
}

/// Default browser via the `open` crate.
#[derive(Debug, Default)]
pub struct SystemBrowser;

impl UrlOpener for SystemBrowser {
    fn open(&mut self, url: &str) -> Result<()> {
        open::that(url).with_context(|| format!("failed to open {url}"))
    }
}

/// Per-record copy deadlines. Marking one record never touches another.
#[derive(Debug, Default)]
pub struct CopyTracker {
    marks: HashMap<Uuid, Instant>,
}

impl CopyTracker {
    pub fn mark(&mut self, id: Uuid, now: Instant) {
        self.marks.insert(id, now + COPY_FEEDBACK);
    }

    pub fn is_copied(&self, id: Uuid, now: Instant) -> bool {
        self.marks.get(&id).is_some_and(|deadline| now < *deadline)
    }

    /// Forget expired marks.
    pub fn prune(&mut self, now: Instant) {
        self.marks.retain(|_, deadline| now < *deadline);
    }
}

/// Copy `text` and mark `id` on success. Failures are logged and leave the
/// indicator untouched.
pub fn copy_record(
    sink: &mut dyn ClipboardSink,
    tracker: &mut CopyTracker,
    id: Uuid,
    text: &str,
    now: Instant,
) -> bool {
    match sink.set_text(text) {
        Ok(()) => {
            tracker.mark(id, now);
            tracing::debug!(%id, "copied to clipboard");
            true
        }
        Err(err) => {
            tracing::warn!(%id, error = %err, "clipboard write failed");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Clipboard that records writes, or fails every write.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingClipboard {
        pub(crate) writes: Arc<Mutex<Vec<String>>>,
        pub(crate) fail: bool,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("no display");
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    pub(crate) struct RecordingBrowser {
        pub(crate) opened: Arc<Mutex<Vec<String>>>,
    }

    impl UrlOpener for RecordingBrowser {
        fn open(&mut self, url: &str) -> Result<()> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn indicator_lasts_two_seconds() {
        let mut tracker = CopyTracker::default();
        let id = Uuid::new_v4();
        let start = Instant::now();
        tracker.mark(id, start);

        assert!(tracker.is_copied(id, start + Duration::from_millis(1999)));
        assert!(!tracker.is_copied(id, start + Duration::from_millis(2000)));
    }

    #[test]
    fn records_keep_independent_deadlines() {
        let mut tracker = CopyTracker::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let start = Instant::now();
        tracker.mark(a, start);
        tracker.mark(b, start + Duration::from_millis(1500));

        let later = start + Duration::from_millis(2500);
        assert!(!tracker.is_copied(a, later));
        assert!(tracker.is_copied(b, later));

        tracker.prune(later);
        assert!(tracker.is_copied(b, later));
    }

    #[test]
    fn failed_write_sets_no_indicator() {
        let mut sink = RecordingClipboard {
            fail: true,
            ..RecordingClipboard::default()
        };
        let mut tracker = CopyTracker::default();
        let id = Uuid::new_v4();
        let now = Instant::now();

        assert!(!copy_record(&mut sink, &mut tracker, id, "df -h", now));
        assert!(!tracker.is_copied(id, now));
    }
}
