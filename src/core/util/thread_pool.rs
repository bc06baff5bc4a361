// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-size thread pool with one queue per worker and work stealing.
//!
//! Each worker first sweeps every queue with non-blocking pops, starting at
//! its home queue, and only then parks on a blocking pop of its home queue.
//! Submission round-robins over the queues with a bounded number of
//! non-blocking pushes before falling back to a blocking push.
//!
//! Dropping the pool (or calling [`ThreadPool::shutdown`]) marks every queue
//! done and joins the workers; queued jobs are drained first.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::utils::CachePadded;
use log::{debug, error};

use super::work_queue::{Job, WorkQueue};

/// Rounds over all queues a submission attempts before blocking.
const SUBMIT_ROUNDS: usize = 4;

type Queues = Arc<[CachePadded<WorkQueue<Job>>]>;

/// Worker count used when none is configured: one per CPU, at least one.
pub fn default_thread_count() -> usize {
    num_cpus::get().max(1)
}

pub struct ThreadPool {
    queues: Queues,
    workers: Vec<JoinHandle<()>>,
    next_queue: AtomicUsize,
}

impl ThreadPool {
    /// Start a pool with `thread_count` workers; `0` means one per available CPU.
    pub fn new(thread_count: usize) -> io::Result<Self> {
        let thread_count = if thread_count == 0 {
            default_thread_count()
        } else {
            thread_count
        };

        let queues: Queues = (0..thread_count)
            .map(|_| CachePadded::new(WorkQueue::new()))
            .collect();

        let mut pool = Self {
            queues,
            workers: Vec::with_capacity(thread_count),
            next_queue: AtomicUsize::new(0),
        };

        for home in 0..thread_count {
            let queues = Arc::clone(&pool.queues);
            // on error, dropping `pool` retires the workers spawned so far
            let worker = thread::Builder::new()
                .name(format!("portquery-worker-{}", home))
                .spawn(move || worker_loop(&queues, home))?;
            pool.workers.push(worker);
        }

        debug!("thread pool started with {} workers", thread_count);
        Ok(pool)
    }

    pub fn thread_count(&self) -> usize {
        self.queues.len()
    }

    /// Queue a job. Jobs on different queues complete in no particular order.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let count = self.queues.len();
        let start = self.next_queue.fetch_add(1, Ordering::Relaxed);
        let mut job: Job = Box::new(job);

        for attempt in 0..count * SUBMIT_ROUNDS {
            match self.queues[(start + attempt) % count].non_blocking_push(job) {
                Ok(()) => return,
                Err(rejected) => job = rejected,
            }
        }

        self.queues[start % count].blocking_push(job);
    }

    /// Jobs queued but not yet picked up by a worker.
    pub fn pending(&self) -> usize {
        self.queues.iter().map(|q| q.len()).sum()
    }

    /// Drain every queue and join the workers.
    pub fn shutdown(self) {
        drop(self);
    }

    fn stop(&mut self) {
        for queue in self.queues.iter() {
            queue.set_done();
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                error!("thread pool worker terminated abnormally");
            }
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.stop();
        debug!("thread pool stopped");
    }
}

fn worker_loop(queues: &[CachePadded<WorkQueue<Job>>], home: usize) {
    let count = queues.len();
    loop {
        let stolen = (0..count).find_map(|offset| queues[(home + offset) % count].non_blocking_pop());
        let job = match stolen {
            Some(job) => job,
            None => match queues[home].blocking_pop() {
                Some(job) => job,
                None => return,
            },
        };

        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(
                "bug: a job panicked on worker {}; the panic was contained and the worker keeps serving its queue",
                home
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;
    use std::sync::Mutex;

    #[test]
    fn test_zero_threads_uses_hardware_parallelism() {
        let pool = ThreadPool::new(0).unwrap();
        assert!(pool.thread_count() >= 1);
        assert_eq!(pool.thread_count(), default_thread_count());
    }

    #[test]
    fn test_submit_blocks_until_a_queue_is_free() {
        use std::time::Duration;

        let pool = ThreadPool::new(2).unwrap();
        let counter = Arc::new(AtomicU64::new(0));

        thread::scope(|scope| {
            let guards: Vec<_> = pool.queues.iter().map(|queue| queue.hold()).collect();

            let job_counter = Arc::clone(&counter);
            let submitter = scope.spawn(|| {
                pool.submit(move || {
                    job_counter.fetch_add(1, Ordering::SeqCst);
                });
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!submitter.is_finished());
            assert_eq!(counter.load(Ordering::SeqCst), 0);

            drop(guards);
            submitter.join().unwrap();
        });

        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_every_job_runs_once() {
        let counter = Arc::new(AtomicU64::new(0));
        let pool = ThreadPool::new(4).unwrap();
        for _ in 0..1000 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1000);
    }

    #[test]
    fn test_single_worker_preserves_fifo() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let pool = ThreadPool::new(1).unwrap();
        for i in 0..50 {
            let seen = Arc::clone(&seen);
            pool.submit(move || seen.lock().unwrap().push(i));
        }
        pool.shutdown();
        assert_eq!(*seen.lock().unwrap(), (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let counter = Arc::new(AtomicU64::new(0));
        let pool = ThreadPool::new(1).unwrap();
        pool.submit(|| panic!("boom"));
        {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        pool.shutdown();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nothing_pending_after_shutdown() {
        let pool = ThreadPool::new(2).unwrap();
        let queues = Arc::clone(&pool.queues);
        for _ in 0..100 {
            pool.submit(|| thread::yield_now());
        }
        pool.shutdown();
        assert!(queues.iter().all(|q| q.is_empty() && q.is_done()));
    }

    #[test]
    fn test_idle_worker_steals_from_busy_queue() {
        use std::sync::mpsc;
        use std::time::Duration;

        let pool = ThreadPool::new(2).unwrap();
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        pool.submit(move || {
            let name = thread::current().name().unwrap_or_default().to_string();
            started_tx.send(name).unwrap();
            let _ = release_rx.recv();
        });

        let busy_name = started_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let busy = if busy_name.ends_with("-0") { 0 } else { 1 };
        let idle = 1 - busy;

        let (done_tx, done_rx) = mpsc::channel();
        for i in 0..5 {
            let done_tx = done_tx.clone();
            pool.queues[busy].blocking_push(Box::new(move || {
                let name = thread::current().name().unwrap_or_default().to_string();
                done_tx.send((i, name)).unwrap();
            }));
        }
        // wake the idle worker so it sweeps the other queue
        pool.queues[idle].blocking_push(Box::new(|| {}));

        let mut stolen = Vec::new();
        for _ in 0..5 {
            stolen.push(done_rx.recv_timeout(Duration::from_secs(5)).unwrap());
        }
        release_tx.send(()).unwrap();
        pool.shutdown();

        let idle_name = format!("portquery-worker-{}", idle);
        assert!(stolen.iter().all(|(_, name)| *name == idle_name));
        let order: Vec<_> = stolen.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
