// SPDX-License-Identifier: MIT OR Apache-2.0

//! Probing capability injected into the scan runtime.
//!
//! The runtime never opens sockets itself; it hands a port and the set of
//! protocols it needs to a [`NetworkProber`] and evaluates whatever comes
//! back. Tests substitute their own implementation.

pub mod socket_prober;

use std::net::IpAddr;
use std::time::Duration;

use crate::query_api::protocol::{NetworkProtocols, ProbeResults};

pub use socket_prober::SocketProber;

pub trait NetworkProber: Send + Sync {
    /// Probe `port` on `target` for each protocol in `protocols`.
    ///
    /// Implementations classify failures (refused, timed out, unreachable)
    /// as a result rather than reporting an error, and must fill in a result
    /// for every requested protocol.
    fn probe(
        &self,
        target: IpAddr,
        port: u16,
        protocols: NetworkProtocols,
        timeout: Duration,
    ) -> ProbeResults;
}
