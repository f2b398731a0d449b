//! Background execution of plot and export jobs.
//!
//! A [`Dispatcher`] runs at most one job at a time on a dedicated thread so
//! the interactive thread stays responsive while a large figure is built or
//! written to disk.
//!
//! ```text
//! ┌─────────────┐   submit(job)    ┌──────────────────┐
//! │ Interactive │ ───────────────▶ │ logview-worker   │
//! │   thread    │                  │ (build / export) │
//! │             │ ◀── one result ─ │                  │
//! └─────────────┘  bounded(1) chan └──────────────────┘
//! ```
//!
//! Policy for overlapping requests: a second [`Dispatcher::submit`] while a
//! job is in flight is rejected with [`WorkflowError::Busy`]. Jobs are never
//! queued, cancelled, or timed out; once started a job runs to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::{debug, warn};

use crate::workflow::WorkflowError;

/// Clears the busy flag when the job finishes, including by panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs one background job at a time
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    busy: Arc<AtomicBool>,
}

impl Dispatcher {
    /// Create an idle dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a job is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start `job` on the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] if another job is still running, or
    /// [`WorkflowError::Spawn`] if the thread cannot be created.
    pub fn submit<T, F>(&self, job: F) -> Result<JobHandle<T>, WorkflowError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, WorkflowError> + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejecting request: another job is already running");
            return Err(WorkflowError::Busy);
        }

        let guard = BusyGuard(Arc::clone(&self.busy));
        let (sender, receiver) = bounded(1);

        let handle = thread::Builder::new()
            .name("logview-worker".to_string())
            .spawn(move || {
                let result = job();
                // idle before the result is visible, so the receiver may submit again at once
                drop(guard);
                if sender.send(result).is_err() {
                    debug!("Job finished after its handle was dropped");
                }
            })
            .map_err(WorkflowError::Spawn)?;

        Ok(JobHandle {
            receiver,
            handle: Some(handle),
        })
    }
}

/// Handle to a submitted job's single terminal result
#[derive(Debug)]
pub struct JobHandle<T> {
    receiver: Receiver<Result<T, WorkflowError>>,
    handle: Option<JoinHandle<()>>,
}

impl<T> JobHandle<T> {
    /// Block until the job finishes.
    pub fn wait(mut self) -> Result<T, WorkflowError> {
        match self.receiver.recv() {
            Ok(result) => {
                self.join();
                result
            }
            // sender dropped without a result: the job panicked
            Err(_) => {
                self.join();
                Err(WorkflowError::WorkerPanicked)
            }
        }
    }

    /// Non-blocking poll; `None` while the job is still running.
    ///
    /// Returns the result once; later calls report [`WorkflowError::WorkerPanicked`]
    /// because the channel is closed.
    pub fn try_result(&mut self) -> Option<Result<T, WorkflowError>> {
        match self.receiver.try_recv() {
            Ok(result) => {
                self.join();
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(WorkflowError::WorkerPanicked))
            }
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}
