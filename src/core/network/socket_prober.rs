// SPDX-License-Identifier: MIT OR Apache-2.0

//! `std::net` backed prober.
//!
//! TCP: a completed handshake is OPEN, a refused connection is CLOSED and
//! anything else (timeout, unreachable) is REJECTED.
//!
//! UDP: an empty datagram is sent on a connected socket. A reply or silence
//! is OPEN, an ICMP port-unreachable surfaces as `ConnectionRefused` and is
//! CLOSED, any other failure is REJECTED.

use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;

use log::trace;

use super::NetworkProber;
use crate::query_api::protocol::{NetworkProtocols, ProbeResults, QueryResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct SocketProber;

impl SocketProber {
    pub fn new() -> Self {
        Self
    }

    fn probe_tcp(&self, addr: SocketAddr, timeout: Duration) -> QueryResult {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => QueryResult::Open,
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => QueryResult::Closed,
            Err(e) => {
                trace!("tcp probe of {} failed: {}", addr, e);
                QueryResult::Rejected
            }
        }
    }

    fn probe_udp(&self, addr: SocketAddr, timeout: Duration) -> QueryResult {
        let local: SocketAddr = match addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };

        let exchange = || -> std::io::Result<()> {
            let socket = UdpSocket::bind(local)?;
            socket.set_read_timeout(Some(timeout))?;
            socket.connect(addr)?;
            socket.send(&[])?;
            let mut buf = [0u8; 512];
            socket.recv(&mut buf)?;
            Ok(())
        };

        match exchange() {
            Ok(()) => QueryResult::Open,
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => QueryResult::Closed,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                QueryResult::Open
            }
            Err(e) => {
                trace!("udp probe of {} failed: {}", addr, e);
                QueryResult::Rejected
            }
        }
    }
}

impl NetworkProber for SocketProber {
    fn probe(
        &self,
        target: IpAddr,
        port: u16,
        protocols: NetworkProtocols,
        timeout: Duration,
    ) -> ProbeResults {
        let addr = SocketAddr::new(target, port);
        let mut results = ProbeResults::new();
        if protocols.contains(NetworkProtocols::TCP) {
            results.tcp = Some(self.probe_tcp(addr, timeout));
        }
        if protocols.contains(NetworkProtocols::UDP) {
            results.udp = Some(self.probe_udp(addr, timeout));
        }
        results
    }
}
