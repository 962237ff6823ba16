//! Shared spinner state and the tokio update loop.
//!
//! `SharedSpinner` provides thread-safe access to a single [`Spinner`] so
//! input handlers and the timer task can drive it concurrently.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_spinner::services::SharedSpinner;
//!
//! let shared = Arc::new(SharedSpinner::new(spinner));
//!
//! // Input handlers use with_spinner() for operations
//! shared.with_spinner(|spinner| spinner.start_spin_up());
//!
//! // Change detection for publishing the value elsewhere
//! if let Some(text) = shared.check_changes() {
//!     // Publish text
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::events::Outcome;
use crate::spin::SpinState;
use crate::spinner::Spinner;
use crate::traits::{Clock, HostField};

/// Tracks the last reported field text for change detection.
#[derive(Clone, Debug, Default)]
pub struct ChangeDetection {
    /// Last reported text
    pub last_text: String,
}

/// Thread-safe wrapper around one spinner.
///
/// # Thread Safety
///
/// - Uses `Mutex` (not `RwLock`) because the update loop writes on every tick.
/// - Change detection has a separate lock to keep publishing off the hot path.
/// - A poisoned lock is recovered; listener panics are already isolated by
///   the spinner, so the state behind it is consistent.
pub struct SharedSpinner<F: HostField, C: Clock> {
    spinner: Mutex<Spinner<F, C>>,
    change_detection: Mutex<ChangeDetection>,
}

impl<F: HostField, C: Clock> SharedSpinner<F, C> {
    /// Wrap a spinner.
    ///
    /// The current text becomes the change detection baseline.
    pub fn new(spinner: Spinner<F, C>) -> Self {
        let last_text = spinner.field().text();
        Self {
            spinner: Mutex::new(spinner),
            change_detection: Mutex::new(ChangeDetection { last_text }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Spinner<F, C>> {
        self.spinner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Access the spinner with a mutable lock.
    ///
    /// The closure pattern prevents accidentally holding the lock across
    /// await points.
    pub fn with_spinner<R, Op>(&self, op: Op) -> R
    where
        Op: FnOnce(&mut Spinner<F, C>) -> R,
    {
        let mut guard = self.lock();
        op(&mut *guard)
    }

    /// Fire due timers.
    pub fn update(&self) -> Outcome {
        self.lock().update()
    }

    /// Parsed value
    pub fn value(&self) -> f64 {
        self.lock().value()
    }

    /// Spin state snapshot
    pub fn spin_state(&self) -> SpinState {
        self.lock().spin_state()
    }

    /// Returns the field text if it changed since the last call.
    pub fn check_changes(&self) -> Option<String> {
        let text = self.lock().field().text();
        let mut detection = self
            .change_detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if detection.last_text == text {
            None
        } else {
            detection.last_text = text.clone();
            Some(text)
        }
    }

    /// Current change detection baseline (for debugging/testing).
    pub fn change_detection_state(&self) -> ChangeDetection {
        self.change_detection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Call [`SharedSpinner::update`] every `tick_ms` until `shutdown` turns
/// true or its sender is dropped.
///
/// Missed ticks are skipped by the interval; the spinner itself catches up
/// on any spin ticks it owes.
pub async fn run_update_loop<F, C>(
    shared: Arc<SharedSpinner<F, C>>,
    tick_ms: u64,
    mut shutdown: watch::Receiver<bool>,
) where
    F: HostField,
    C: Clock,
{
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms.max(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    log::debug!(target: "spinner.spin", "update loop started ({} ms)", tick_ms);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                shared.update();
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    shared.with_spinner(|spinner| spinner.stop_spin());
    log::debug!(target: "spinner.spin", "update loop stopped");
}

/// Spawn [`run_update_loop`] on the current runtime.
///
/// Send `true` on the returned sender (or drop it) to stop the loop; any
/// active spin is stopped on the way out.
pub fn spawn_update_loop<F, C>(
    shared: Arc<SharedSpinner<F, C>>,
    tick_ms: u64,
) -> (JoinHandle<()>, watch::Sender<bool>)
where
    F: HostField + Send + 'static,
    C: Clock + Send + 'static,
{
    let (sender, receiver) = watch::channel(false);
    let handle = tokio::spawn(run_update_loop(shared, tick_ms, receiver));
    (handle, sender)
}
