// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_QUEUE_SIZE: usize = 50;

/// Sizing of a [`Dispatcher`](crate::job_engine::dispatcher::Dispatcher).
/// Both values are fixed for the lifetime of the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Number of worker threads, and capacity of the idle-worker pool.
    pub max_workers: usize,
    /// Capacity of the submission queue.
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

fn default_queue_size() -> usize {
    DEFAULT_QUEUE_SIZE
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }
}

impl DispatcherConfig {
    pub fn new(max_workers: usize, queue_size: usize) -> Self {
        Self {
            max_workers,
            queue_size,
        }
    }

    /// Parses a JSON document such as `{"max-workers": 4, "queue-size": 16}`.
    pub fn from_json(json: &str) -> Result<Self, DispatchError> {
        let config: DispatcherConfig = serde_json::from_str(json)
            .map_err(|e| DispatchError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.max_workers == 0 {
            return Err(DispatchError::InvalidConfig(
                "max-workers must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// A queue size of zero means producers hand jobs straight to the
    /// coordination loop instead of buffering them.
    pub fn is_rendezvous(&self) -> bool {
        self.queue_size == 0
    }

    /// async-channel has no zero-capacity channels. A rendezvous queue gets one
    /// slot, and producers only use it after the coordination loop signalled
    /// that it is waiting to receive.
    pub(crate) fn queue_capacity(&self) -> usize {
        self.queue_size.max(1)
    }
}
