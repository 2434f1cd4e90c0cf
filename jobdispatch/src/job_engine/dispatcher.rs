// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::mem;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use async_channel::{Receiver, Sender};
use log::warn;

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::job_engine::job::Job;
use crate::job_engine::observer::{self, DispatchObserver, LogObserver};
use crate::job_engine::pending::PendingJobs;
use crate::job_engine::worker::{Worker, WorkerHandle};

enum Lifecycle {
    Created,
    Started {
        threads: Vec<JoinHandle<()>>,
        workers: Vec<WorkerHandle>,
    },
    Stopped,
}

/// Owns the bounded job queue and the pool of idle workers, and matches one
/// to the other in submission order.
///
/// Single use: `start` once, `add_job` any number of times, `stop` once.
/// `stop` must not race with `add_job`; a submission that loses that race is
/// rejected with [`DispatchError::QueueClosed`].
pub struct Dispatcher {
    config: DispatcherConfig,
    jobs_tx: Sender<Box<dyn Job>>,
    jobs_rx: Receiver<Box<dyn Job>>,
    idle_tx: Sender<WorkerHandle>,
    idle_rx: Receiver<WorkerHandle>,
    /// Only for a rendezvous queue: the coordination loop posts a token each
    /// time it waits for the next job, and a producer must take one before
    /// sending. Jobs therefore never wait in the queue.
    ready: Option<(Sender<()>, Receiver<()>)>,
    pending: Arc<PendingJobs>,
    observer: Arc<dyn DispatchObserver>,
    lifecycle: Mutex<Lifecycle>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("queued_jobs", &self.queued_jobs())
            .field("pending_jobs", &self.pending_jobs())
            .finish()
    }
}

impl Dispatcher {
    /// Creates a dispatcher with `max_workers` workers and room for
    /// `queue_size` queued jobs. Nothing runs until [`Dispatcher::start`].
    pub fn new(max_workers: usize, queue_size: usize) -> Result<Self, DispatchError> {
        Self::from_config(&DispatcherConfig::new(max_workers, queue_size))
    }

    pub fn from_config(config: &DispatcherConfig) -> Result<Self, DispatchError> {
        Self::with_observer(config, Arc::new(LogObserver))
    }

    pub fn with_observer(
        config: &DispatcherConfig,
        observer: Arc<dyn DispatchObserver>,
    ) -> Result<Self, DispatchError> {
        config.validate()?;

        let (jobs_tx, jobs_rx) = async_channel::bounded(config.queue_capacity());
        let (idle_tx, idle_rx) = async_channel::bounded(config.max_workers);
        let ready = config.is_rendezvous().then(|| async_channel::bounded(1));

        Ok(Self {
            config: *config,
            jobs_tx,
            jobs_rx,
            idle_tx,
            idle_rx,
            ready,
            pending: Arc::new(PendingJobs::new()),
            observer,
            lifecycle: Mutex::new(Lifecycle::Created),
        })
    }

    pub fn max_workers(&self) -> usize {
        self.config.max_workers
    }

    pub fn queue_size(&self) -> usize {
        self.config.queue_size
    }

    /// Jobs submitted but not yet handed to a worker.
    pub fn pending_jobs(&self) -> usize {
        self.pending.get()
    }

    /// Jobs currently sitting in the queue. Always zero for a rendezvous
    /// queue, apart from the instant between a hand-over and its receipt.
    pub fn queued_jobs(&self) -> usize {
        self.jobs_rx.len()
    }

    /// Spawns the workers and the coordination loop, each on its own thread.
    pub fn start(&self) -> Result<(), DispatchError> {
        let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        match *lifecycle {
            Lifecycle::Created => {}
            Lifecycle::Started { .. } => return Err(DispatchError::AlreadyStarted),
            Lifecycle::Stopped => return Err(DispatchError::AlreadyStopped),
        }

        let mut threads = Vec::with_capacity(self.config.max_workers + 1);
        let mut workers = Vec::with_capacity(self.config.max_workers);

        for id in 1..=self.config.max_workers {
            let worker = Worker::new(id, self.idle_tx.clone(), self.observer.clone());
            workers.push(worker.handle());
            match worker.spawn() {
                Ok(thread) => threads.push(thread),
                Err(e) => {
                    workers.iter().for_each(|w| {
                        w.close();
                    });
                    return Err(e.into());
                }
            }
        }

        let jobs = self.jobs_rx.clone();
        let ready = self.ready.as_ref().map(|(tx, _)| tx.clone());
        let idle_workers = self.idle_rx.clone();
        let pending = self.pending.clone();
        let observer = self.observer.clone();
        let coordinator = thread::Builder::new()
            .name("jobdispatch-coordinator".into())
            .spawn(move || {
                futures::executor::block_on(coordination_loop(
                    jobs,
                    ready,
                    idle_workers,
                    pending,
                    observer,
                ))
            });
        match coordinator {
            Ok(thread) => threads.push(thread),
            Err(e) => {
                workers.iter().for_each(|w| {
                    w.close();
                });
                return Err(e.into());
            }
        }

        *lifecycle = Lifecycle::Started { threads, workers };
        Ok(())
    }

    /// Submits a job. Blocks while the queue is full. With a queue size of
    /// zero it blocks until the coordination loop takes the job.
    ///
    /// Jobs may be submitted before `start`; they wait in the queue (or, for
    /// a rendezvous queue, the call waits for `start`).
    pub fn add_job(&self, job: Box<dyn Job>) -> Result<(), DispatchError> {
        self.pending.add();
        if let Some((_, ready_rx)) = &self.ready {
            if ready_rx.recv_blocking().is_err() {
                self.pending.done();
                return Err(DispatchError::QueueClosed);
            }
        }
        if self.jobs_tx.send_blocking(job).is_err() {
            self.pending.done();
            return Err(DispatchError::QueueClosed);
        }
        Ok(())
    }

    /// Boxes `job` and submits it, see [`Dispatcher::add_job`].
    pub fn submit<J: Job>(&self, job: J) -> Result<(), DispatchError> {
        self.add_job(Box::new(job))
    }

    /// Closes the queue, waits until every submitted job has been handed to a
    /// worker, then shuts the workers down.
    ///
    /// Workers only return to the idle pool after finishing their current
    /// job, so by the time this returns every submitted job has run.
    pub fn stop(&self) -> Result<(), DispatchError> {
        let threads = {
            let mut lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
            match mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
                Lifecycle::Started { threads, .. } => threads,
                Lifecycle::Created => {
                    *lifecycle = Lifecycle::Created;
                    return Err(DispatchError::NotStarted);
                }
                Lifecycle::Stopped => return Err(DispatchError::AlreadyStopped),
            }
        };

        self.close_queue();
        self.pending.wait_until_zero();

        for _ in 0..self.config.max_workers {
            match self.idle_rx.recv_blocking() {
                Ok(worker) => {
                    worker.close();
                }
                Err(_) => break,
            }
        }

        for thread in threads {
            let name = thread.thread().name().unwrap_or("<unnamed>").to_owned();
            if thread.join().is_err() {
                warn!("Thread {name} panicked during shutdown");
            }
        }

        observer::notify(&*self.observer, |o| o.dispatcher_stopped());
        Ok(())
    }

    fn close_queue(&self) {
        self.jobs_tx.close();
        if let Some((ready_tx, _)) = &self.ready {
            ready_tx.close();
        }
    }
}

impl Drop for Dispatcher {
    /// A dispatcher dropped without `stop` abandons its queued jobs. Threads
    /// are signalled but not joined.
    fn drop(&mut self) {
        let lifecycle = self
            .lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        if let Lifecycle::Started { workers, .. } = lifecycle {
            self.jobs_tx.close();
            if let Some((ready_tx, _)) = &self.ready {
                ready_tx.close();
            }
            for worker in workers.iter() {
                worker.close();
            }
        }
    }
}

/// Takes jobs from the queue in FIFO order and hands each one to the next
/// idle worker. Ends when the queue is closed and empty.
async fn coordination_loop(
    jobs: Receiver<Box<dyn Job>>,
    ready: Option<Sender<()>>,
    idle_workers: Receiver<WorkerHandle>,
    pending: Arc<PendingJobs>,
    observer: Arc<dyn DispatchObserver>,
) {
    loop {
        if let Some(ready) = &ready {
            // fails once the queue is closed, the remaining jobs still drain
            let _ = ready.send(()).await;
        }
        let Ok(job) = jobs.recv().await else {
            break;
        };

        let Ok(worker) = idle_workers.recv().await else {
            // every worker is gone, the job cannot run anymore
            pending.done();
            continue;
        };

        let desc = job.desc().to_owned();
        match worker.hand_off(job).await {
            Ok(()) => observer::notify(&*observer, |o| o.job_dispatched(worker.id(), &desc)),
            Err(_job) => warn!("Worker {} closed before it could take {desc:?}", worker.id()),
        }
        pending.done();
    }
}
