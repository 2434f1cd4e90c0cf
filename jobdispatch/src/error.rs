// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use thiserror::Error;

/// What a job reports when `process` fails. Absorbed by the worker and only
/// surfaced through the [`DispatchObserver`](crate::job_engine::observer::DispatchObserver).
pub type ProcessingError = anyhow::Error;

/// Failures of the dispatcher itself. Misuse of the lifecycle (submitting
/// after `stop`, stopping twice, ...) ends up here instead of panicking.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid dispatcher configuration: {0}")]
    InvalidConfig(String),

    #[error("dispatcher has already been started")]
    AlreadyStarted,

    #[error("dispatcher has not been started")]
    NotStarted,

    #[error("job queue is closed, the dispatcher is stopping or stopped")]
    QueueClosed,

    #[error("dispatcher has already been stopped")]
    AlreadyStopped,

    #[error("failed to spawn dispatcher thread: {0}")]
    Spawn(#[from] std::io::Error),
}
