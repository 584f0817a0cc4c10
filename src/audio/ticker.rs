use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::warn;

use super::types::Command;

/// Recurring position refresh: posts `Command::Tick` to the owner thread
/// every `interval` until cancelled or the owner goes away.
pub struct Ticker {
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(interval: Duration, tx: Sender<Command>) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = cancel.clone();

        let handle = thread::Builder::new()
            .name("cadence-ticker".into())
            .spawn(move || {
                loop {
                    thread::sleep(interval);
                    if flag.load(Ordering::Relaxed) || tx.send(Command::Tick).is_err() {
                        break;
                    }
                }
            });

        let handle = match handle {
            Ok(h) => Some(h),
            Err(e) => {
                warn!(error = %e, "position ticker unavailable");
                None
            }
        };

        Self { cancel, handle }
    }

    /// Stop ticking and wait for the timer thread to finish.
    pub fn cancel(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
