//! Bounded worker pool for collaborator calls
//!
//! Every outbound call takes a semaphore permit, runs under the per-call
//! timeout, and gives up as soon as the run is cancelled.

use crate::cancel::CancelSignal;
use crate::error::TaskFailure;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Pool statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Calls that obtained a permit
    pub started: usize,
    /// Calls that finished within the timeout
    pub completed: usize,
    /// Calls abandoned on timeout
    pub timed_out: usize,
    /// Calls abandoned on cancellation
    pub cancelled: usize,
}

/// Concurrency-limited executor for collaborator calls
#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    call_timeout: Duration,
    stats: Mutex<PoolStats>,
}

impl WorkerPool {
    /// Create a pool; a zero limit is raised to one
    #[must_use]
    pub fn new(max_concurrency: usize, call_timeout: Duration) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
            call_timeout,
            stats: Mutex::new(PoolStats::default()),
        }
    }

    /// Maximum number of calls in flight
    #[inline]
    #[must_use]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Per-call timeout
    #[inline]
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Snapshot of statistics
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        *self.stats.lock()
    }

    /// Run `call` once a permit is free
    ///
    /// # Errors
    /// Returns [`TaskFailure`] if the call timed out, the run was cancelled
    /// before it finished, or the pool was closed
    pub async fn run<F, T>(&self, cancel: &CancelSignal, call: F) -> Result<T, TaskFailure>
    where
        F: Future<Output = T>,
    {
        if cancel.is_cancelled() {
            self.stats.lock().cancelled += 1;
            return Err(TaskFailure::Cancelled);
        }

        let permit = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                self.stats.lock().cancelled += 1;
                return Err(TaskFailure::Cancelled);
            }
            permit = self.permits.acquire() => permit.map_err(|_| TaskFailure::PoolClosed)?,
        };
        self.stats.lock().started += 1;

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TaskFailure::Cancelled),
            result = tokio::time::timeout(self.call_timeout, call) => {
                result.map_err(|_| TaskFailure::Timeout {
                    millis: u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        };
        drop(permit);

        {
            let mut stats = self.stats.lock();
            match &outcome {
                Ok(_) => stats.completed += 1,
                Err(TaskFailure::Timeout { .. }) => stats.timed_out += 1,
                Err(TaskFailure::Cancelled) => stats.cancelled += 1,
                Err(TaskFailure::PoolClosed) => {}
            }
        }
        outcome
    }

    /// Refuse further calls
    pub fn close(&self) {
        self.permits.close();
    }
}
