// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use jobdispatch::{Job, ProcessingError};

#[derive(Debug, Default)]
pub struct SlowJobFlags {
    pub started: AtomicBool,
    pub finished: AtomicBool,
}

impl SlowJobFlags {
    pub fn started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

/// Sleeps for `delay`, flagging when it starts and when it is done.
#[derive(Debug, Clone)]
pub struct SlowJob {
    delay: Duration,
    flags: Arc<SlowJobFlags>,
}

impl SlowJob {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            flags: Arc::new(SlowJobFlags::default()),
        }
    }

    pub fn flags(&self) -> Arc<SlowJobFlags> {
        self.flags.clone()
    }
}

impl Job for SlowJob {
    fn desc(&self) -> &str {
        "slow"
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        self.flags.started.store(true, Ordering::SeqCst);
        thread::sleep(self.delay);
        self.flags.finished.store(true, Ordering::SeqCst);
        Ok(())
    }
}
