// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use crate::error::ProcessingError;
use crate::job_engine::job::Job;

/// A job whose body is a closure. Handy for tests and one-off work.
pub struct ClosureJob {
    desc: String,
    body: Box<dyn FnOnce() -> Result<(), ProcessingError> + Send + 'static>,
}

impl ClosureJob {
    pub fn new<F>(desc: impl Into<String>, f: F) -> Self
    where
        F: FnOnce() -> Result<(), ProcessingError> + Send + 'static,
    {
        Self {
            desc: desc.into(),
            body: Box::new(f),
        }
    }

    /// Same as [`ClosureJob::new`], boxed so it can go straight into `add_job`.
    pub fn boxed<F>(desc: impl Into<String>, f: F) -> Box<dyn Job>
    where
        F: FnOnce() -> Result<(), ProcessingError> + Send + 'static,
    {
        Box::new(Self::new(desc, f))
    }
}

impl Job for ClosureJob {
    fn desc(&self) -> &str {
        &self.desc
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        (self.body)()
    }
}

/// Example usage
#[test]
pub fn example() {
    use std::sync::{Arc, Mutex};

    use crate::job_engine::dispatcher::Dispatcher;

    let dispatcher = Dispatcher::new(1, 1).unwrap();
    dispatcher.start().unwrap();

    let ran = Arc::new(Mutex::new(false));
    let ran_in_job = ran.clone();
    dispatcher
        .add_job(ClosureJob::boxed("Host maintenance", move || {
            *ran_in_job.lock().unwrap() = true;
            Ok(())
        }))
        .unwrap();

    // stop drains the queue before the workers are closed
    dispatcher.stop().unwrap();
    assert!(*ran.lock().unwrap());
}
