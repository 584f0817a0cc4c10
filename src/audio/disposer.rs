use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use super::backend::{OutputDevice, SharedPipeline};
use super::types::SessionId;

/// What is left of a session once its device has been stopped.
pub(crate) struct Retired {
    pub session: SessionId,
    pub device: Box<dyn OutputDevice>,
    pub pipeline: SharedPipeline,
}

/// Drops retired devices and decode streams on a background thread so that
/// `play`/`stop` never wait on device teardown.
pub(crate) struct Disposer {
    tx: Option<Sender<Retired>>,
    handle: Option<JoinHandle<()>>,
}

impl Disposer {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Retired>();

        let spawned = thread::Builder::new()
            .name("cadence-dispose".into())
            .spawn(move || {
                for retired in rx {
                    let Retired {
                        session,
                        device,
                        pipeline,
                    } = retired;
                    drop(device);
                    drop(pipeline);
                    debug!(session = session.0, "session resources released");
                }
            });

        match spawned {
            Ok(handle) => Self {
                tx: Some(tx),
                handle: Some(handle),
            },
            Err(e) => {
                warn!(error = %e, "disposal thread unavailable; releasing inline");
                Self {
                    tx: None,
                    handle: None,
                }
            }
        }
    }

    pub fn retire(&self, retired: Retired) {
        match &self.tx {
            Some(tx) => {
                // Thread gone: the returned value is dropped here instead.
                let _ = tx.send(retired);
            }
            None => drop(retired),
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}
