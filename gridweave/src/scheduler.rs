//! Refresh scheduling.
//!
//! Writes to grid state do not re-layout synchronously. They mark the
//! scheduler dirty; the host flushes on its next tick and observes only the
//! state as of the flush. Any number of writes between two flushes produce
//! a single refresh.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use log::trace;
use tokio::sync::mpsc;

/// Pending wakeups the channel holds before further signals are dropped.
///
/// One pending signal already tells the host to flush; the extra room
/// lets several grids share a sender.
const PENDING_WAKEUPS: usize = 4;

/// Signals the host that some grid has changes to flush.
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
}

impl WakeupSender {
    /// Queue a wakeup. Returns false if it was dropped because the host
    /// already has enough pending or stopped listening.
    pub fn wake(&self) -> bool {
        self.tx.try_send(()).is_ok()
    }
}

/// Host end of the wakeup channel.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
}

impl WakeupReceiver {
    /// Wait until a grid needs flushing. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Take one pending wakeup without waiting.
    pub fn try_recv(&mut self) -> Option<()> {
        self.rx.try_recv().ok()
    }

    /// Discard the wakeups queued behind the one being handled, returning
    /// how many there were. A single flush pass serves all of them.
    pub fn drain(&mut self) -> usize {
        let mut skipped = 0;
        while self.rx.try_recv().is_ok() {
            skipped += 1;
        }
        skipped
    }
}

/// Create a sender/receiver pair for host wakeups.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(PENDING_WAKEUPS);
    (WakeupSender { tx }, WakeupReceiver { rx })
}

/// Dirty flag plus an optional wakeup sender installed by the host.
#[derive(Debug, Default, Clone)]
pub struct RefreshScheduler {
    dirty: Arc<AtomicBool>,
    wakeup: Arc<Mutex<Option<WakeupSender>>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the sender used to wake the host.
    pub fn install(&self, sender: WakeupSender) {
        if let Ok(mut guard) = self.wakeup.lock() {
            *guard = Some(sender);
        }
    }

    /// Request a refresh on the next tick.
    ///
    /// Only the clean -> dirty transition wakes the host.
    pub fn mark_dirty(&self) {
        if !self.dirty.swap(true, Ordering::SeqCst)
            && let Ok(guard) = self.wakeup.lock()
            && let Some(sender) = guard.as_ref()
            && !sender.wake()
        {
            trace!("Wakeup dropped, host already has enough pending");
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag, returning whether a refresh was pending.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_marks_send_one_wakeup() {
        let scheduler = RefreshScheduler::new();
        let (tx, mut rx) = channel();
        scheduler.install(tx);

        scheduler.mark_dirty();
        scheduler.mark_dirty();
        scheduler.mark_dirty();

        assert!(rx.try_recv().is_some());
        assert!(rx.try_recv().is_none(), "marks coalesce until taken");

        assert!(scheduler.take_dirty());
        assert!(!scheduler.take_dirty());

        scheduler.mark_dirty();
        assert!(rx.try_recv().is_some(), "next tick wakes again");
    }

    #[test]
    fn full_channel_drops_extra_wakeups() {
        let (tx, mut rx) = channel();

        for _ in 0..PENDING_WAKEUPS {
            assert!(tx.wake());
        }
        assert!(!tx.wake(), "queue is full");

        assert!(rx.try_recv().is_some());
        assert_eq!(rx.drain(), PENDING_WAKEUPS - 1);
        assert!(rx.try_recv().is_none());
    }
}
