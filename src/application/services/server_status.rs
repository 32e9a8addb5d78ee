// src/application/services/server_status.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, instrument};

use crate::domain::repositories::remote_tag_repository::RemoteTagRepository;

/// Last known liveness of the file-save server
#[derive(Debug)]
pub struct ServerStatus {
    remote: Option<Arc<dyn RemoteTagRepository>>,
    online: Arc<AtomicBool>,
}

impl ServerStatus {
    pub fn new(remote: Option<Arc<dyn RemoteTagRepository>>) -> Self {
        Self {
            remote,
            online: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Probes once and records the result
    #[instrument(skip(self), level = "debug")]
    pub fn check(&self) -> bool {
        let online = self.remote.as_ref().is_some_and(|r| r.is_online());
        self.online.store(online, Ordering::Relaxed);
        online
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// Spawns a poller refreshing the flag every `interval`; it stops when
    /// the returned handle is dropped
    pub fn start(&self, interval: Duration) -> StatusPoller {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let remote = self.remote.clone();
        let online = self.online.clone();

        let handle = thread::spawn(move || loop {
            let status = remote.as_ref().is_some_and(|r| r.is_online());
            online.store(status, Ordering::Relaxed);
            debug!(online = status, "Server status refreshed");

            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });

        StatusPoller {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }
}

/// Handle of a running status poller
#[derive(Debug)]
pub struct StatusPoller {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
