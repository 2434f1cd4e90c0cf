// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::sync::{Arc, Mutex};

use anyhow::bail;
use jobdispatch::{Job, ProcessingError};

/// Indices of processed jobs, in the order they ran.
pub type Collector = Arc<Mutex<Vec<usize>>>;

pub fn collector() -> Collector {
    Arc::new(Mutex::new(Vec::new()))
}

/// Appends its submission index to a shared collector. Optionally fails
/// afterwards, to check that failures are absorbed.
#[derive(Debug)]
pub struct RecordingJob {
    index: usize,
    desc: String,
    fail: bool,
    collector: Collector,
}

impl RecordingJob {
    pub fn new(index: usize, collector: &Collector) -> Self {
        Self {
            index,
            desc: format!("record {index}"),
            fail: false,
            collector: collector.clone(),
        }
    }

    pub fn failing(index: usize, collector: &Collector) -> Self {
        Self {
            fail: true,
            ..Self::new(index, collector)
        }
    }
}

impl Job for RecordingJob {
    fn desc(&self) -> &str {
        &self.desc
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        self.collector.lock().unwrap().push(self.index);
        if self.fail {
            bail!("job {} failed on purpose", self.index);
        }
        Ok(())
    }
}
