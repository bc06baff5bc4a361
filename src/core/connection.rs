// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection facade: prepare a query, run it, finalize it.
//!
//! ```rust,ignore
//! let mut conn = PortQueryConnection::new(PortQueryConfig::default());
//! conn.set_user_callback(|_ctx, row| println!("{:?}", row));
//! conn.execute("SELECT PORT FROM 127.0.0.1 WHERE PORT BETWEEN 1 AND 1024 AND TCP = OPEN")?;
//! ```

use std::any::Any;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::Arc;

use log::{debug, warn};

use crate::core::config::PortQueryConfig;
use crate::core::error::{PortQueryError, PortQueryResult};
use crate::core::network::{NetworkProber, SocketProber};
use crate::core::query::{ResultCallback, ScanRunner, ScanSummary, UserContext};
use crate::query_api::protocol::Row;
use crate::query_api::select_statement::SelectStatement;
use crate::sql_compiler::parse_sosql;

pub struct PortQueryConnection {
    config: PortQueryConfig,
    prober: Arc<dyn NetworkProber>,
    callback: Option<ResultCallback>,
    context: UserContext,
    statement: Option<Arc<SelectStatement>>,
    error_string: String,
}

impl PortQueryConnection {
    /// Connection probing over real sockets.
    pub fn new(config: PortQueryConfig) -> Self {
        Self::with_prober(config, Arc::new(SocketProber::new()))
    }

    pub fn with_prober(config: PortQueryConfig, prober: Arc<dyn NetworkProber>) -> Self {
        Self {
            config,
            prober,
            callback: None,
            context: Arc::new(()),
            statement: None,
            error_string: String::new(),
        }
    }

    pub fn set_user_callback<F>(&mut self, callback: F)
    where
        F: Fn(UserContext, Row) + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
    }

    pub fn set_user_data<T>(&mut self, context: T)
    where
        T: Any + Send + Sync,
    {
        self.context = Arc::new(context);
    }

    pub fn set_timeout(&mut self, timeout_secs: u64) {
        self.config.timeout_secs = timeout_secs;
    }

    pub fn set_thread_count(&mut self, thread_count: usize) {
        self.config.thread_count = thread_count;
    }

    pub fn set_delay(&mut self, delay_ms: u64) {
        self.config.delay_ms = delay_ms;
    }

    pub fn config(&self) -> &PortQueryConfig {
        &self.config
    }

    pub fn statement(&self) -> Option<&SelectStatement> {
        self.statement.as_deref()
    }

    /// Last fatal error, empty when the last operation succeeded.
    pub fn error_string(&self) -> &str {
        &self.error_string
    }

    /// Parse `query` and keep it for [`PortQueryConnection::run`]. A failed
    /// parse leaves no statement behind.
    pub fn prepare(&mut self, query: &str) -> PortQueryResult<()> {
        self.error_string.clear();
        self.statement = None;
        let statement = self.record(parse_sosql(query).map_err(PortQueryError::from))?;
        debug!("prepared: {}", statement);
        self.statement = Some(Arc::new(statement));
        Ok(())
    }

    /// Execute the prepared statement, blocking until every row has been delivered.
    pub fn run(&mut self) -> PortQueryResult<ScanSummary> {
        self.error_string.clear();
        let result = self.run_prepared();
        self.record(result)
    }

    /// Discard the prepared statement.
    pub fn finalize(&mut self) {
        self.statement = None;
    }

    pub fn execute(&mut self, query: &str) -> PortQueryResult<ScanSummary> {
        self.prepare(query)?;
        let summary = self.run();
        self.finalize();
        summary
    }

    fn run_prepared(&self) -> PortQueryResult<ScanSummary> {
        let statement = self.statement.clone().ok_or(PortQueryError::NoStatement)?;
        self.config.validate()?;
        let target = resolve_target(statement.table_reference())?;

        ScanRunner::new(statement, target, Arc::clone(&self.prober), self.config.clone())
            .with_callback(self.callback.clone(), Arc::clone(&self.context))
            .run()
    }

    fn record<T>(&mut self, result: PortQueryResult<T>) -> PortQueryResult<T> {
        if let Err(e) = &result {
            self.error_string = e.to_string();
        }
        result
    }
}

/// Resolve a table reference to the address probes are sent to.
pub fn resolve_target(host: &str) -> PortQueryResult<IpAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let mut addrs = (host, 0)
        .to_socket_addrs()
        .map_err(|e| PortQueryError::resolve(host, e))?
        .map(|addr| addr.ip())
        .collect::<Vec<_>>();

    match addrs.iter().position(|ip| ip.is_ipv4()) {
        Some(index) => Ok(addrs.swap_remove(index)),
        None => {
            let ip = addrs.pop().ok_or_else(|| {
                PortQueryError::resolve(
                    host,
                    io::Error::new(io::ErrorKind::NotFound, "no addresses found"),
                )
            })?;
            warn!("{} has no IPv4 address, probing {}", host, ip);
            Ok(ip)
        }
    }
}
