// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::{Condvar, Mutex, PoisonError};

/// Counts jobs that were submitted but not yet handed to a worker.
///
/// Incremented by `add_job` before the job enters the queue, decremented by
/// the coordination loop right after the hand-off. `stop` waits for zero.
#[derive(Debug, Default)]
pub struct PendingJobs {
    count: Mutex<usize>,
    drained: Condvar,
}

impl PendingJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
    }

    pub fn done(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    pub fn get(&self) -> usize {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until every added job has been marked done.
    pub fn wait_until_zero(&self) {
        // pattern is described on https://doc.rust-lang.org/stable/std/sync/struct.Condvar.html
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        while *count > 0 {
            count = self
                .drained
                .wait(count)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}
