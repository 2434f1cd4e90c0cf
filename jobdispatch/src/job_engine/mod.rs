// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! # Design: Bounded Job Dispatcher
//!
//! ## Overview
//! A fixed pool of worker threads fed from one bounded queue.
//!
//! - Producers submit jobs into a bounded queue and block while it is full.
//! - Each worker owns a single-slot hand-off channel. When idle, it publishes
//!   that channel into a shared, bounded idle pool and waits on it.
//! - One coordination loop takes jobs off the queue in FIFO order and hands
//!   each to whichever worker handle it pulls from the idle pool next.
//! - Shutdown closes the queue, waits until every submitted job has been handed
//!   off, then collects every worker's handle and closes it.
//!
//! Completion order across workers is not ordered; only the hand-off is FIFO.
//!
//! ```text
//! +-----------+      +---------------+
//! | add_job() | ---> | bounded queue |
//! +-----------+      +-------+-------+
//!                            |
//!                            v
//!                  +---------+---------+      +-----------+
//!                  | coordination loop | <--- | idle pool |
//!                  +---------+---------+      +-----^-----+
//!                            |                      |
//!             +--------------+-------------+        | re-register
//!             v              v             v        |
//!         +--------+    +--------+    +--------+    |
//!         | worker |    | worker |    | worker | ---+
//!         +--------+    +--------+    +--------+
//! ```

pub mod closure_job;
pub mod dispatcher;
pub mod job;
pub mod observer;
pub mod pending;
pub mod worker;
