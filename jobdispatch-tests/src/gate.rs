// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::{Arc, Condvar, Mutex};

use jobdispatch::{Job, ProcessingError};

/// One-shot latch: `wait` blocks until `open` has been called once.
#[derive(Debug, Clone, Default)]
pub struct Latch {
    sync_state: Arc<(Mutex<bool>, Condvar)>,
}

impl Latch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        let (lock, cvar) = &*self.sync_state;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    pub fn is_open(&self) -> bool {
        *self.sync_state.0.lock().unwrap()
    }

    pub fn wait(&self) {
        let (lock, cvar) = &*self.sync_state;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

/// Occupies a worker until released. `started` opens once the job runs.
#[derive(Debug, Clone, Default)]
pub struct GateJob {
    pub started: Latch,
    pub release: Latch,
}

impl GateJob {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Job for GateJob {
    fn desc(&self) -> &str {
        "gate"
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        self.started.open();
        self.release.wait();
        Ok(())
    }
}
