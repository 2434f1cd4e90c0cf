// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Bounded job dispatching: a fixed pool of worker threads fed from a bounded
//! FIFO queue, with a shutdown that drains everything submitted first.
//!
//! ```no_run
//! use jobdispatch::{ClosureJob, Dispatcher};
//!
//! let dispatcher = Dispatcher::new(4, 16)?;
//! dispatcher.start()?;
//! for i in 0..100 {
//!     dispatcher.add_job(ClosureJob::boxed(format!("job {i}"), move || {
//!         println!("Processing job {i}");
//!         Ok(())
//!     }))?;
//! }
//! dispatcher.stop()?;
//! # Ok::<(), jobdispatch::DispatchError>(())
//! ```

pub mod config;
pub mod error;
pub mod job_engine;
pub mod jobs;

pub use config::DispatcherConfig;
pub use error::{DispatchError, ProcessingError};
pub use job_engine::closure_job::ClosureJob;
pub use job_engine::dispatcher::Dispatcher;
pub use job_engine::job::Job;
pub use job_engine::observer::{DispatchObserver, LogObserver};
