//! Asynchronous remote tier.
//!
//! Writes are queued to a single worker thread that applies them to the
//! remote store in submission order. A failed write is logged and kept as a
//! warning; it never feeds back into the local state that produced it.

use super::remote::{RemoteError, RemoteStore, Table};
use serde_json::Value;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

#[derive(Debug, Clone)]
pub enum RemoteOp {
    Upsert { table: Table, id: String, row: Value },
    Delete { table: Table, id: String },
}

impl RemoteOp {
    fn describe(&self) -> String {
        match self {
            RemoteOp::Upsert { table, id, .. } => format!("upsert {} '{}'", table, id),
            RemoteOp::Delete { table, id } => format!("delete {} '{}'", table, id),
        }
    }
}

enum Job {
    Apply(RemoteOp),
    Barrier(Sender<()>),
}

/// A remote write that did not go through.
#[derive(Debug, Clone)]
pub struct SyncFailure {
    pub op: String,
    pub error: RemoteError,
}

pub struct RemoteSync {
    store: Arc<dyn RemoteStore>,
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    failures: Arc<Mutex<Vec<SyncFailure>>>,
}

impl RemoteSync {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let failures = Arc::new(Mutex::new(Vec::new()));

        let worker_store = Arc::clone(&store);
        let worker_failures = Arc::clone(&failures);
        let worker = thread::Builder::new()
            .name("remote-sync".into())
            .spawn(move || {
                for job in rx {
                    let op = match job {
                        Job::Apply(op) => op,
                        Job::Barrier(done) => {
                            let _ = done.send(());
                            continue;
                        }
                    };
                    let result = match &op {
                        RemoteOp::Upsert { table, row, .. } => {
                            worker_store.upsert(*table, row.clone())
                        }
                        RemoteOp::Delete { table, id } => worker_store.delete(*table, id),
                    };

                    match result {
                        Ok(()) => log::debug!("remote {} ok", op.describe()),
                        Err(error) => {
                            log::warn!("remote {} failed: {}", op.describe(), error);
                            if let Ok(mut f) = worker_failures.lock() {
                                f.push(SyncFailure {
                                    op: op.describe(),
                                    error,
                                });
                            }
                        }
                    }
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::error!("cannot start remote sync worker: {}", e);
                None
            }
        };

        Self {
            store,
            tx: worker.as_ref().map(|_| tx),
            worker,
            failures,
        }
    }

    /// Read side of the remote tier (reads are not queued).
    pub fn store(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    /// Queue a write. Returns immediately.
    pub fn submit(&self, op: RemoteOp) {
        let sent = self.tx.as_ref().map(|tx| tx.send(Job::Apply(op.clone())).is_ok());
        if sent != Some(true) {
            log::warn!("remote sync worker unavailable; dropped {}", op.describe());
            if let Ok(mut f) = self.failures.lock() {
                f.push(SyncFailure {
                    op: op.describe(),
                    error: RemoteError::Transport("sync worker unavailable".into()),
                });
            }
        }
    }

    /// Wait until every write queued so far has been applied, then return
    /// the failures collected since the last call.
    pub fn flush(&self) -> Vec<SyncFailure> {
        if let Some(tx) = &self.tx {
            let (done_tx, done_rx) = mpsc::channel();
            if tx.send(Job::Barrier(done_tx)).is_ok() && done_rx.recv().is_err() {
                log::error!("remote sync worker stopped before flushing");
            }
        }
        self.take_failures()
    }

    pub fn take_failures(&self) -> Vec<SyncFailure> {
        self.failures
            .lock()
            .map(|mut f| std::mem::take(&mut *f))
            .unwrap_or_default()
    }
}

impl Drop for RemoteSync {
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.worker.take()
            && handle.join().is_err()
        {
            log::error!("remote sync worker panicked");
        }
    }
}
