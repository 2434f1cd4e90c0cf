// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use jobdispatch::{Job, ProcessingError};

/// Tracks how many gauged jobs run at the same time.
#[derive(Debug, Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
    completed: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn job(self: &Arc<Self>, hold: Duration) -> GaugedJob {
        GaugedJob {
            gauge: self.clone(),
            hold,
        }
    }
}

pub struct GaugedJob {
    gauge: Arc<ConcurrencyGauge>,
    hold: Duration,
}

impl Job for GaugedJob {
    fn desc(&self) -> &str {
        "gauged"
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        let now = self.gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.gauge.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(self.hold);
        self.gauge.current.fetch_sub(1, Ordering::SeqCst);
        self.gauge.completed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
