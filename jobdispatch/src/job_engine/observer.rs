// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error, info, warn};

use crate::error::ProcessingError;

/// Receives the diagnostic side effects of dispatching: worker lifecycle and
/// per-job outcome. Nothing here feeds back into the dispatcher.
///
/// All methods default to doing nothing, so an observer only implements the
/// events it cares about. Calls come from worker and coordinator threads. A
/// panicking observer is logged and otherwise ignored.
pub trait DispatchObserver: Send + Sync {
    fn worker_started(&self, _worker_id: usize) {}

    /// The coordination loop handed a job to a worker.
    fn job_dispatched(&self, _worker_id: usize, _desc: &str) {}

    fn job_started(&self, _worker_id: usize, _desc: &str) {}

    fn job_finished(&self, _worker_id: usize, _desc: &str) {}

    fn job_failed(&self, _worker_id: usize, _desc: &str, _err: &ProcessingError) {}

    /// The worker's hand-off channel was closed and its loop exited.
    fn worker_stopped(&self, _worker_id: usize) {}

    fn dispatcher_stopped(&self) {}
}

/// Default observer, forwards everything to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DispatchObserver for LogObserver {
    fn worker_started(&self, worker_id: usize) {
        debug!("Worker {worker_id} started");
    }

    fn job_dispatched(&self, worker_id: usize, desc: &str) {
        debug!("Dispatched {desc:?} to worker {worker_id}");
    }

    fn job_started(&self, worker_id: usize, desc: &str) {
        info!("Worker {worker_id} started job {desc:?}");
    }

    fn job_finished(&self, worker_id: usize, desc: &str) {
        info!("Worker {worker_id} finished job {desc:?}");
    }

    fn job_failed(&self, worker_id: usize, desc: &str, err: &ProcessingError) {
        warn!("Worker {worker_id} error processing job {desc:?}: {err:#}");
    }

    fn worker_stopped(&self, worker_id: usize) {
        info!("Worker {worker_id} stopping due to job channel closure");
    }

    fn dispatcher_stopped(&self) {
        info!("Dispatcher stopped, all workers have shut down");
    }
}

/// Delivers one event to the observer. A panic in the observer must not take
/// down the worker or coordinator thread that reports it.
pub(crate) fn notify(observer: &dyn DispatchObserver, event: impl FnOnce(&dyn DispatchObserver)) {
    if panic::catch_unwind(AssertUnwindSafe(|| event(observer))).is_err() {
        error!("Dispatch observer panicked, event dropped");
    }
}
