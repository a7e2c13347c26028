//! Deferred menu-open scheduling.
//!
//! A contact must settle before its menu opens, so the dispatcher hands a
//! [`PendingMenu`] to this scheduler instead of presenting immediately.
//! Wake-ups come back to the host over a channel once the delay elapses;
//! the host then runs `InteractionDispatcher::complete_open`, which treats
//! everything captured here as possibly stale and re-validates it. The
//! queue keeps no references into live state, only identifiers.

use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};

use crate::dispatch::PendingMenu;

struct QueuedWakeup {
    earliest: Instant,
    pending: PendingMenu,
}

enum SchedCommand {
    Schedule(QueuedWakeup),
    Shutdown(oneshot::Sender<()>),
}

/// Handle for enqueueing wake-ups. Cheap to clone.
#[derive(Clone)]
pub struct MenuScheduler {
    tx: mpsc::UnboundedSender<SchedCommand>,
}

impl MenuScheduler {
    /// Deliver `pending` to the host after `delay`.
    pub fn schedule(&self, pending: PendingMenu, delay: Duration) {
        let _ = self.tx.send(SchedCommand::Schedule(QueuedWakeup {
            earliest: Instant::now() + delay,
            pending,
        }));
    }

    /// Stop the scheduler loop; queued wake-ups are dropped.
    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        if self.tx.send(SchedCommand::Shutdown(tx)).is_ok() {
            let _ = rx.await;
        }
    }
}

/// Start the scheduler loop. Returns the enqueue handle and the receiver
/// the host drains on its tick thread.
pub fn start_menu_scheduler() -> (MenuScheduler, mpsc::UnboundedReceiver<PendingMenu>) {
    let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<SchedCommand>();
    let (due_tx, due_rx) = mpsc::unbounded_channel::<PendingMenu>();
    let handle = MenuScheduler { tx: cmd_tx };

    tokio::spawn(async move {
        // Queue sizes are tiny (one entry per settling contact), so a
        // plain Vec with a coarse tick is enough.
        const TICK: Duration = Duration::from_millis(25);
        let mut queue: Vec<QueuedWakeup> = Vec::new();
        loop {
            tokio::select! {
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SchedCommand::Schedule(wakeup)) => queue.push(wakeup),
                        Some(SchedCommand::Shutdown(done)) => {
                            let _ = done.send(());
                            break;
                        }
                        None => break,
                    }
                }
                _ = tokio::time::sleep(TICK) => {}
            }
            let now = Instant::now();
            queue.sort_by_key(|w| w.earliest);
            while queue.first().is_some_and(|w| w.earliest <= now) {
                let wakeup = queue.remove(0);
                if due_tx.send(wakeup.pending).is_err() {
                    log::debug!("menu scheduler: host receiver closed");
                    return;
                }
            }
        }
        log::debug!("menu scheduler loop terminated");
    });

    (handle, due_rx)
}
