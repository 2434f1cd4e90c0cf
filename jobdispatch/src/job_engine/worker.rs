// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::anyhow;
use async_channel::{Receiver, Sender};

use crate::job_engine::job::Job;
use crate::job_engine::observer::{self, DispatchObserver};

/// What an idle worker publishes into the idle pool: its id and the sending
/// side of its hand-off channel.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    id: usize,
    jobs: Sender<Box<dyn Job>>,
}

impl WorkerHandle {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Hands a job to the worker. Gives the job back if the worker is gone.
    pub async fn hand_off(&self, job: Box<dyn Job>) -> Result<(), Box<dyn Job>> {
        self.jobs.send(job).await.map_err(|e| e.into_inner())
    }

    /// Closes the hand-off channel. The worker exits once it sees the closure.
    pub fn close(&self) -> bool {
        self.jobs.close()
    }
}

pub struct Worker {
    id: usize,
    idle_pool: Sender<WorkerHandle>,
    jobs_tx: Sender<Box<dyn Job>>,
    jobs_rx: Receiver<Box<dyn Job>>,
    observer: Arc<dyn DispatchObserver>,
}

impl Worker {
    pub fn new(
        id: usize,
        idle_pool: Sender<WorkerHandle>,
        observer: Arc<dyn DispatchObserver>,
    ) -> Self {
        // single slot: a worker holds at most one job at a time
        let (jobs_tx, jobs_rx) = async_channel::bounded(1);
        Self {
            id,
            idle_pool,
            jobs_tx,
            jobs_rx,
            observer,
        }
    }

    pub fn handle(&self) -> WorkerHandle {
        WorkerHandle {
            id: self.id,
            jobs: self.jobs_tx.clone(),
        }
    }

    /// Runs the worker loop on a dedicated thread.
    pub fn spawn(self) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name(format!("jobdispatch-worker-{}", self.id))
            .spawn(move || futures::executor::block_on(self.run()))
    }

    async fn run(self) {
        self.notify(|o| o.worker_started(self.id));
        loop {
            // Blocks while the pool is full, i.e. while the dispatcher has not
            // yet picked up the handles of other idle workers.
            if self.idle_pool.send(self.handle()).await.is_err() {
                break;
            }

            match self.jobs_rx.recv().await {
                Ok(job) => self.execute(job),
                // channel has been closed
                Err(_) => break,
            }
        }
        self.notify(|o| o.worker_stopped(self.id));
    }

    fn execute(&self, job: Box<dyn Job>) {
        let desc = job.desc().to_owned();
        self.notify(|o| o.job_started(self.id, &desc));

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.process())).unwrap_or_else(|payload| {
            Err(anyhow!("job panicked: {}", panic_message(&*payload)))
        });
        if let Err(err) = outcome {
            self.notify(|o| o.job_failed(self.id, &desc, &err));
        }

        self.notify(|o| o.job_finished(self.id, &desc));
    }

    fn notify(&self, event: impl FnOnce(&dyn DispatchObserver)) {
        observer::notify(&*self.observer, event);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
