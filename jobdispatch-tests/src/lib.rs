// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod concurrency_gauge;
pub mod gate;
pub mod recording_job;
pub mod recording_observer;
pub mod slow_job;

/// Routes `LogObserver` output through the test harness. Safe to call from
/// every test.
pub fn init_test_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}
