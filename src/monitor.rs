//! Idle-close and rollover monitor
//!
//! A named background thread owned by the `Logger`:
//! - each tick, closes the file once it has seen no emission attempt for
//!   longer than the idle timeout
//! - on a slower cadence, forces a close when the file was opened on a
//!   previous calendar day, even if recently active, so a new day's writes
//!   land in a freshly dated file
//!
//! Both checks and the close run under the same lock `ensure_open` takes,
//! so the monitor can never close a handle out from under a concurrent
//! emission. When the idle and rollover thresholds land on the same tick,
//! idle-close is evaluated first and rollover only applies if the file is
//! still open afterwards.
//!
//! The thread is cancellable: dropping the handle disconnects the stop
//! channel, which wakes the tick wait immediately, and the thread is
//! joined before the drop returns.

use crate::error::{Error, Result};
use crate::lifecycle::LoggerState;
use chrono::Local;
use parking_lot::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::info;

/// Cadences of the two policies
#[derive(Debug, Clone, Copy)]
pub(crate) struct MonitorSettings {
    /// Interval of the idle-close check
    pub(crate) tick: Duration,
    /// Interval of the daily-rollover check
    pub(crate) rollover_check: Duration,
}

/// Owned handle of the monitor thread; stops it on drop
pub(crate) struct MonitorHandle {
    stop_tx: Option<SyncSender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the thread and wait for it to exit; idempotent
    pub(crate) fn stop(&mut self) {
        // Dropping the sender disconnects the channel and wakes the wait
        self.stop_tx.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the monitor over the shared state
pub(crate) fn spawn(
    state: Arc<Mutex<LoggerState>>,
    settings: MonitorSettings,
) -> Result<MonitorHandle> {
    let (stop_tx, stop_rx) = mpsc::sync_channel::<()>(1);

    let thread = thread::Builder::new()
        .name("rotolog-monitor".to_string())
        .spawn(move || run(state, stop_rx, settings))
        .map_err(|e| Error::MonitorSpawn { source: e })?;

    Ok(MonitorHandle {
        stop_tx: Some(stop_tx),
        thread: Some(thread),
    })
}

fn run(state: Arc<Mutex<LoggerState>>, stop_rx: Receiver<()>, settings: MonitorSettings) {
    let mut last_rollover_check = Instant::now();

    loop {
        match stop_rx.recv_timeout(settings.tick) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        let mut state = state.lock();

        if state.is_open() {
            let idle = state.idle_elapsed();
            // A timeout of zero or less closes on the fastest polling interval
            let timeout = Duration::from_secs(state.idle_timeout_secs.max(0) as u64);
            if idle > timeout {
                info!(idle_secs = idle.as_secs(), "closing idle log file");
                state.close();
            }
        }

        if last_rollover_check.elapsed() >= settings.rollover_check {
            last_rollover_check = Instant::now();
            if state.is_open() && state.last_open_day() != Local::now().date_naive() {
                info!("closing log file opened on a previous day");
                state.close();
            }
        }
    }
}
