// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use jobdispatch::{DispatchError, Dispatcher, DispatcherConfig, Job};
use jobdispatch_tests::concurrency_gauge::ConcurrencyGauge;
use jobdispatch_tests::gate::GateJob;
use jobdispatch_tests::init_test_log;
use jobdispatch_tests::recording_job::{collector, RecordingJob};
use jobdispatch_tests::recording_observer::RecordingObserver;
use jobdispatch_tests::slow_job::SlowJob;

fn observed(max_workers: usize, queue_size: usize) -> (Dispatcher, Arc<RecordingObserver>) {
    let observer = Arc::new(RecordingObserver::new());
    let dispatcher = Dispatcher::with_observer(
        &DispatcherConfig::new(max_workers, queue_size),
        observer.clone(),
    )
    .expect("valid configuration");
    (dispatcher, observer)
}

#[test]
fn test_end_to_end_ten_jobs_two_workers() {
    init_test_log();
    let dispatcher = Dispatcher::new(2, 5).unwrap();
    dispatcher.start().unwrap();

    let collected = collector();
    for i in 0..10 {
        dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
    }
    dispatcher.stop().unwrap();

    let mut indices = collected.lock().unwrap().clone();
    assert_eq!(indices.len(), 10, "stop returned before all jobs ran");
    indices.sort();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_conservation_every_job_runs_exactly_once() {
    let (dispatcher, observer) = observed(4, 8);
    dispatcher.start().unwrap();

    let collected = collector();
    for i in 0..500 {
        dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
    }
    dispatcher.stop().unwrap();

    let indices = collected.lock().unwrap().clone();
    assert_eq!(indices.len(), 500);
    let unique: BTreeSet<usize> = indices.into_iter().collect();
    assert_eq!(unique, (0..500).collect::<BTreeSet<_>>());
    assert_eq!(observer.finished(), 500);
    assert!(observer.dispatched_worker_ids().iter().all(|id| (1..=4).contains(id)));
}

#[test]
fn test_concurrent_producers() {
    let dispatcher = Arc::new(Dispatcher::new(3, 4).unwrap());
    dispatcher.start().unwrap();
    let collected = collector();

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let dispatcher = dispatcher.clone();
            let collected = collected.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    dispatcher
                        .submit(RecordingJob::new(p * 50 + i, &collected))
                        .unwrap();
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }
    dispatcher.stop().unwrap();

    let unique: BTreeSet<usize> = collected.lock().unwrap().iter().copied().collect();
    assert_eq!(unique.len(), 200);
}

#[test]
fn test_bounded_concurrency() {
    let dispatcher = Dispatcher::new(3, 10).unwrap();
    dispatcher.start().unwrap();

    let gauge = ConcurrencyGauge::new();
    for _ in 0..30 {
        dispatcher.submit(gauge.job(Duration::from_millis(10))).unwrap();
    }
    dispatcher.stop().unwrap();

    assert_eq!(gauge.completed(), 30);
    assert!(gauge.peak() <= 3, "peak concurrency was {}", gauge.peak());
    assert!(gauge.peak() >= 1);
}

#[test]
fn test_backpressure_blocks_add_job_on_full_queue() {
    let dispatcher = Arc::new(Dispatcher::new(1, 1).unwrap());
    dispatcher.start().unwrap();

    // occupy the only worker
    let gate = GateJob::new();
    dispatcher.submit(gate.clone()).unwrap();
    gate.started.wait();

    // one job is held by the coordination loop, one fits in the queue,
    // the third submission has to wait
    let returned = Arc::new(AtomicUsize::new(0));
    let producer = {
        let dispatcher = dispatcher.clone();
        let returned = returned.clone();
        thread::spawn(move || {
            let collected = collector();
            for i in 0..3 {
                dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
                returned.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    thread::sleep(Duration::from_millis(200));
    assert_eq!(returned.load(Ordering::SeqCst), 2);
    assert_eq!(dispatcher.queued_jobs(), 1);

    gate.release.open();
    producer.join().unwrap();
    assert_eq!(returned.load(Ordering::SeqCst), 3);
    dispatcher.stop().unwrap();
}

#[test]
fn test_unbuffered_queue_hands_over_without_buffering() {
    let dispatcher = Arc::new(Dispatcher::new(1, 0).unwrap());
    dispatcher.start().unwrap();

    let gate = GateJob::new();
    dispatcher.submit(gate.clone()).unwrap();
    gate.started.wait();

    // the coordination loop takes the first job and waits for the busy
    // worker; with nothing to buffer into, the second submission must wait
    let returned = Arc::new(AtomicUsize::new(0));
    let collected = collector();
    let producer = {
        let dispatcher = dispatcher.clone();
        let returned = returned.clone();
        let collected = collected.clone();
        thread::spawn(move || {
            for i in 0..3 {
                dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
                returned.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    thread::sleep(Duration::from_millis(200));
    assert_eq!(returned.load(Ordering::SeqCst), 1);
    assert_eq!(dispatcher.queued_jobs(), 0);

    gate.release.open();
    producer.join().unwrap();
    dispatcher.stop().unwrap();
    assert_eq!(*collected.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn test_fifo_dispatch_order() {
    let (dispatcher, observer) = observed(3, 2);
    dispatcher.start().unwrap();

    let collected = collector();
    for i in 0..60 {
        dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
    }
    dispatcher.stop().unwrap();

    let expected: Vec<String> = (0..60).map(|i| format!("record {i}")).collect();
    assert_eq!(observer.dispatched(), expected);
}

#[test]
fn test_single_worker_processes_in_submission_order() {
    let dispatcher = Dispatcher::new(1, 3).unwrap();
    dispatcher.start().unwrap();

    let collected = collector();
    for i in 0..20 {
        dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
    }
    dispatcher.stop().unwrap();

    assert_eq!(*collected.lock().unwrap(), (0..20).collect::<Vec<_>>());
}

#[test]
fn test_drain_before_terminate() {
    let (dispatcher, observer) = observed(2, 4);
    dispatcher.start().unwrap();

    let slow = SlowJob::new(Duration::from_millis(300));
    let flags = slow.flags();
    dispatcher.submit(slow).unwrap();

    let begin = Instant::now();
    dispatcher.stop().unwrap();

    assert!(flags.started(), "slow job was not dispatched before stop returned");
    assert!(flags.finished());
    assert!(begin.elapsed() >= Duration::from_millis(100));
    assert_eq!(observer.stopped_workers(), BTreeSet::from([1, 2]));
}

#[test]
fn test_error_isolation() {
    init_test_log();
    let (dispatcher, observer) = observed(1, 4);
    dispatcher.start().unwrap();

    let collected = collector();
    dispatcher.submit(RecordingJob::failing(0, &collected)).unwrap();
    for i in 1..5 {
        dispatcher.submit(RecordingJob::new(i, &collected)).unwrap();
    }
    dispatcher.stop().unwrap();

    assert_eq!(*collected.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(
        observer.failures(),
        vec![(1, "job 0 failed on purpose".to_string())]
    );
    assert_eq!(observer.finished(), 5);
}

#[test]
fn test_submission_after_stop_is_rejected() {
    let dispatcher = Dispatcher::new(1, 1).unwrap();
    dispatcher.start().unwrap();
    dispatcher.stop().unwrap();

    let collected = collector();
    let job: Box<dyn Job> = Box::new(RecordingJob::new(0, &collected));
    assert!(matches!(
        dispatcher.add_job(job),
        Err(DispatchError::QueueClosed)
    ));
    assert!(matches!(dispatcher.stop(), Err(DispatchError::AlreadyStopped)));
    assert!(collected.lock().unwrap().is_empty());
}

#[test]
fn test_workers_started_equals_max_workers() {
    let (dispatcher, observer) = observed(5, 1);
    dispatcher.start().unwrap();
    dispatcher.stop().unwrap();

    assert_eq!(observer.started_workers(), (1..=5).collect::<BTreeSet<_>>());
    assert_eq!(observer.stopped_workers(), (1..=5).collect::<BTreeSet<_>>());
}
