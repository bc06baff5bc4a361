// SPDX-License-Identifier: MIT OR Apache-2.0

//! Executes a prepared statement against one target.
//!
//! Every candidate port is first evaluated with only its port number. Ports
//! already proven FALSE are skipped, ports proven TRUE that need no probe are
//! delivered straight away, and everything else becomes a job on the thread
//! pool that probes the required protocols and re-evaluates the statement
//! with the results.

use std::any::Any;
use std::net::IpAddr;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};

use crate::core::config::PortQueryConfig;
use crate::core::error::{PortQueryError, PortQueryResult};
use crate::core::network::NetworkProber;
use crate::core::util::ThreadPool;
use crate::query_api::expression::Tristate;
use crate::query_api::protocol::{ProbeResults, Row};
use crate::query_api::select_statement::SelectStatement;

/// Opaque value handed back to the result callback with every row.
pub type UserContext = Arc<dyn Any + Send + Sync>;

/// Invoked once per produced row, possibly from a worker thread.
pub type ResultCallback = Arc<dyn Fn(UserContext, Row) + Send + Sync>;

/// Counters describing one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub ports_considered: u64,
    pub ports_pruned: u64,
    pub probes_submitted: u64,
    pub rows_delivered: u64,
}

#[derive(Clone)]
struct Delivery {
    callback: Option<ResultCallback>,
    context: UserContext,
    delivered: Arc<AtomicU64>,
}

impl Delivery {
    fn deliver(&self, row: Row) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
        if let Some(callback) = &self.callback {
            callback(Arc::clone(&self.context), row);
        }
    }
}

pub struct ScanRunner {
    statement: Arc<SelectStatement>,
    target: IpAddr,
    prober: Arc<dyn NetworkProber>,
    config: PortQueryConfig,
    ports: RangeInclusive<u16>,
    delivery: Delivery,
}

impl ScanRunner {
    pub fn new(
        statement: Arc<SelectStatement>,
        target: IpAddr,
        prober: Arc<dyn NetworkProber>,
        config: PortQueryConfig,
    ) -> Self {
        Self {
            statement,
            target,
            prober,
            config,
            ports: 1..=u16::MAX,
            delivery: Delivery {
                callback: None,
                context: Arc::new(()),
                delivered: Arc::new(AtomicU64::new(0)),
            },
        }
    }

    pub fn with_callback(mut self, callback: Option<ResultCallback>, context: UserContext) -> Self {
        self.delivery.callback = callback;
        self.delivery.context = context;
        self
    }

    /// Restrict the candidate ports (all of 1..=65535 by default).
    pub fn with_ports(mut self, ports: RangeInclusive<u16>) -> Self {
        self.ports = ports;
        self
    }

    /// Run to completion. Returns once every submitted probe has finished
    /// and its row, if any, has been delivered.
    pub fn run(&self) -> PortQueryResult<ScanSummary> {
        let required = self.statement.required_protocols();
        let timeout = self.config.timeout();
        let delay = self.config.delay();
        let pool = ThreadPool::new(self.config.effective_thread_count())?;
        let undecided = Arc::new(AtomicU64::new(0));

        info!(
            "scanning {} ({}) ports {}-{} requiring {} with {} workers",
            self.statement.table_reference(),
            self.target,
            self.ports.start(),
            self.ports.end(),
            required,
            pool.thread_count()
        );

        let mut summary = ScanSummary::default();
        for port in self.ports.clone() {
            summary.ports_considered += 1;
            match self.statement.evaluate_pre_network(port) {
                Tristate::False => {
                    summary.ports_pruned += 1;
                    continue;
                }
                Tristate::True if required.is_empty() => {
                    self.delivery
                        .deliver(self.statement.project(port, &ProbeResults::default()));
                    continue;
                }
                _ => {}
            }

            let statement = Arc::clone(&self.statement);
            let prober = Arc::clone(&self.prober);
            let delivery = self.delivery.clone();
            let target = self.target;
            let undecided = Arc::clone(&undecided);
            pool.submit(move || {
                let probes = prober.probe(target, port, required, timeout);
                match statement.evaluate(port, &probes) {
                    Tristate::True => delivery.deliver(statement.project(port, &probes)),
                    Tristate::False => {}
                    Tristate::Unknown => {
                        undecided.fetch_add(1, Ordering::Relaxed);
                        warn!("port {} still undecided after probing {}", port, required)
                    }
                }
            });
            summary.probes_submitted += 1;

            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }

        debug!(
            "{} ports pruned before probing, waiting on {} probes ({} still queued)",
            summary.ports_pruned,
            summary.probes_submitted,
            pool.pending()
        );
        pool.shutdown();

        let undecided = undecided.load(Ordering::Relaxed);
        if undecided > 0 {
            return Err(PortQueryError::runtime(format!(
                "prober left {} ports undecided; {} results were required",
                undecided, required
            )));
        }

        summary.rows_delivered = self.delivery.delivered.load(Ordering::Relaxed);
        info!(
            "scan of {} finished: {} rows from {} ports",
            self.statement.table_reference(),
            summary.rows_delivered,
            summary.ports_considered
        );
        Ok(summary)
    }
}
