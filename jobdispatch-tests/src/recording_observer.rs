// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::BTreeSet;
use std::sync::Mutex;

use jobdispatch::{DispatchObserver, ProcessingError};

#[derive(Debug, Default)]
struct Recorded {
    dispatched: Vec<(usize, String)>,
    finished: usize,
    failures: Vec<(usize, String)>,
    started_workers: BTreeSet<usize>,
    stopped_workers: BTreeSet<usize>,
}

/// Keeps what the dispatcher reports so tests can assert on it.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    recorded: Mutex<Recorded>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptions in hand-off order.
    pub fn dispatched(&self) -> Vec<String> {
        let recorded = self.recorded.lock().unwrap();
        recorded.dispatched.iter().map(|(_, d)| d.clone()).collect()
    }

    pub fn dispatched_worker_ids(&self) -> BTreeSet<usize> {
        let recorded = self.recorded.lock().unwrap();
        recorded.dispatched.iter().map(|(id, _)| *id).collect()
    }

    pub fn finished(&self) -> usize {
        self.recorded.lock().unwrap().finished
    }

    pub fn failures(&self) -> Vec<(usize, String)> {
        self.recorded.lock().unwrap().failures.clone()
    }

    pub fn started_workers(&self) -> BTreeSet<usize> {
        self.recorded.lock().unwrap().started_workers.clone()
    }

    pub fn stopped_workers(&self) -> BTreeSet<usize> {
        self.recorded.lock().unwrap().stopped_workers.clone()
    }
}

impl DispatchObserver for RecordingObserver {
    fn worker_started(&self, worker_id: usize) {
        self.recorded.lock().unwrap().started_workers.insert(worker_id);
    }

    fn job_dispatched(&self, worker_id: usize, desc: &str) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.dispatched.push((worker_id, desc.to_owned()));
    }

    fn job_finished(&self, _worker_id: usize, _desc: &str) {
        self.recorded.lock().unwrap().finished += 1;
    }

    fn job_failed(&self, worker_id: usize, _desc: &str, err: &ProcessingError) {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.failures.push((worker_id, err.to_string()));
    }

    fn worker_stopped(&self, worker_id: usize) {
        self.recorded.lock().unwrap().stopped_workers.insert(worker_id);
    }
}
