//! Progress reporting for downloads.
//!
//! The download stage drives a [`ProgressSink`], an injected capability
//! rather than process-global state: each pipeline owns its sink, and two
//! pipelines share one only when the caller passes the same sink to both.
//! One sink is driven by at most one download at a time, matching the
//! one-cycle-at-a-time pipeline constraint.
//!
//! [`IndicatifSink`] renders a terminal progress bar; [`SilentSink`] is a
//! no-op for quiet mode and tests. Progress output can be globally disabled
//! by setting the `UPDRAFT_NO_PROGRESS` environment variable, which is
//! useful in CI and scripted environments.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};

/// Checks if progress bars should be disabled.
///
/// Progress bars are disabled when the `UPDRAFT_NO_PROGRESS` environment
/// variable is set to any value.
fn is_progress_disabled() -> bool {
    std::env::var("UPDRAFT_NO_PROGRESS").is_ok()
}

/// Receives progress events from a running download.
///
/// The contract mirrors a simple determinate progress bar: `start` begins a
/// run with a value range of `0..=length`, `set_value`/`set_label` update it,
/// and `done` ends it. Implementations must tolerate `done` without a
/// preceding `start` and repeated `done` calls.
pub trait ProgressSink: Send + Sync {
    /// Begin a progress run titled `title` ranging over `0..=length`.
    fn start(&self, title: &str, length: u64, label: &str);

    /// Update the current value.
    fn set_value(&self, value: f64);

    /// Update the text label shown alongside the bar.
    fn set_label(&self, label: &str);

    /// End the run and release the display.
    fn done(&self);
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn start(&self, title: &str, length: u64, label: &str) {
        (**self).start(title, length, label);
    }

    fn set_value(&self, value: f64) {
        (**self).set_value(value);
    }

    fn set_label(&self, label: &str) {
        (**self).set_label(label);
    }

    fn done(&self) {
        (**self).done();
    }
}

/// Terminal progress bar backed by `indicatif`.
///
/// The bar is created lazily on [`start`](ProgressSink::start) and dropped on
/// [`done`](ProgressSink::done); between runs the sink holds no display
/// state. Hidden entirely when `UPDRAFT_NO_PROGRESS` is set.
pub struct IndicatifSink {
    bar: Mutex<Option<IndicatifBar>>,
}

impl IndicatifSink {
    /// Create a sink with no active bar.
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for IndicatifSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for IndicatifSink {
    fn start(&self, title: &str, length: u64, label: &str) {
        let bar = if is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new(length);
            bar.set_style(download_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_prefix(title.to_string());
        bar.set_message(label.to_string());
        *self.bar.lock().expect("progress bar lock poisoned") = Some(bar);
    }

    fn set_value(&self, value: f64) {
        if let Some(bar) = self.bar.lock().expect("progress bar lock poisoned").as_ref() {
            bar.set_position(value.round().max(0.0) as u64);
        }
    }

    fn set_label(&self, label: &str) {
        if let Some(bar) = self.bar.lock().expect("progress bar lock poisoned").as_ref() {
            bar.set_message(label.to_string());
        }
    }

    fn done(&self) {
        if let Some(bar) = self.bar.lock().expect("progress bar lock poisoned").take() {
            bar.finish_and_clear();
        }
    }
}

fn download_style() -> IndicatifStyle {
    IndicatifStyle::default_bar()
        .template("{prefix:.bold} [{bar:40.cyan/blue}] {percent}% {msg}")
        .unwrap()
        .progress_chars("━╸━")
}

/// Sink that swallows every event. Used in quiet mode and in tests that do
/// not care about progress output.
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn start(&self, _title: &str, _length: u64, _label: &str) {}
    fn set_value(&self, _value: f64) {}
    fn set_label(&self, _label: &str) {}
    fn done(&self) {}
}
