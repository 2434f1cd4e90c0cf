// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use crate::error::ProcessingError;

/// A unit of work handed to exactly one worker.
///
/// The dispatcher never looks inside a job. It only asks for a description
/// (for logging) and calls `process` once, consuming the job.
pub trait Job: Send + 'static {
    /// Free-form description, used for logging or debugging
    fn desc(&self) -> &str {
        "job"
    }

    /// Main entry point. Runs on a worker thread.
    fn process(self: Box<Self>) -> Result<(), ProcessingError>;
}

impl std::fmt::Debug for dyn Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job").field("desc", &self.desc()).finish()
    }
}
