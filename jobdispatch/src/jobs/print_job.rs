// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::io::Write;

use crate::error::ProcessingError;
use crate::job_engine::job::Job;

/// Writes its message to stdout.
#[derive(Clone, Debug)]
pub struct PrintJob {
    message: String,
}

impl PrintJob {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Job for PrintJob {
    fn desc(&self) -> &str {
        "print message"
    }

    fn process(self: Box<Self>) -> Result<(), ProcessingError> {
        // stdout may be a closed pipe, report that instead of panicking in println!
        writeln!(std::io::stdout().lock(), "{}", self.message)?;
        Ok(())
    }
}
