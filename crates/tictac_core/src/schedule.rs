//! Delayed delivery of computer moves.
//!
//! A [`Scheduler`] only reports *when* the computer may move by handing an
//! [`AutoMoveTicket`] back to its owner. It never touches game state.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Identifies one armed auto-move timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("ticket#{}", _0)]
pub struct AutoMoveTicket(pub u64);

/// Arms one-shot timers for computer moves.
pub trait Scheduler: Send {
    /// Delivers `ticket` after `delay` unless `cancel` fires first.
    fn schedule(&mut self, ticket: AutoMoveTicket, delay: Duration, cancel: CancellationToken);
}

/// Scheduler backed by tokio timers.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<AutoMoveTicket>,
}

impl TokioScheduler {
    /// Creates a scheduler and the receiver its tickets arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AutoMoveTicket>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Scheduler for TokioScheduler {
    #[instrument(skip_all, fields(%ticket, delay_ms = delay.as_millis() as u64))]
    fn schedule(&mut self, ticket: AutoMoveTicket, delay: Duration, cancel: CancellationToken) {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(%ticket, "Auto move cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    if tx.send(ticket).is_err() {
                        warn!(%ticket, "Ticket receiver dropped");
                    }
                }
            }
        });
    }
}

#[derive(Debug)]
struct Armed {
    ticket: AutoMoveTicket,
    delay: Duration,
    cancel: CancellationToken,
}

/// Scheduler whose timers fire only when asked.
///
/// Clones share one queue, so a test can keep a handle while the session
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<Vec<Armed>>>,
}

impl ManualScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every armed ticket that was not cancelled, oldest first.
    pub fn take_due(&self) -> Vec<AutoMoveTicket> {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue
            .drain(..)
            .filter(|armed| !armed.cancel.is_cancelled())
            .map(|armed| armed.ticket)
            .collect()
    }

    /// Number of armed timers, cancelled ones included.
    pub fn armed(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Delay requested for the most recently armed timer.
    pub fn last_delay(&self) -> Option<Duration> {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .map(|armed| armed.delay)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, ticket: AutoMoveTicket, delay: Duration, cancel: CancellationToken) {
        self.queue
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Armed {
                ticket,
                delay,
                cancel,
            });
    }
}
