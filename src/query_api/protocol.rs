// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protocol, column and probe-result vocabulary shared by the parser, the
//! expression evaluator and the scan runtime.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

/// Set of transport protocols a statement needs probed.
///
/// Backed by a bitmask; `NONE` is the empty set and the identity for union.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NetworkProtocols(u8);

impl NetworkProtocols {
    pub const NONE: NetworkProtocols = NetworkProtocols(0);
    pub const TCP: NetworkProtocols = NetworkProtocols(0b01);
    pub const UDP: NetworkProtocols = NetworkProtocols(0b10);
    pub const ALL: NetworkProtocols = NetworkProtocols(0b11);

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, other: NetworkProtocols) -> bool {
        self.0 & other.0 == other.0
    }

    /// Iterate over the single-protocol members of this set, TCP first.
    pub fn iter(self) -> impl Iterator<Item = NetworkProtocols> {
        [NetworkProtocols::TCP, NetworkProtocols::UDP]
            .into_iter()
            .filter(move |p| self.contains(*p))
    }
}

impl BitOr for NetworkProtocols {
    type Output = NetworkProtocols;

    fn bitor(self, rhs: Self) -> Self::Output {
        NetworkProtocols(self.0 | rhs.0)
    }
}

impl BitOrAssign for NetworkProtocols {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for NetworkProtocols {
    type Output = NetworkProtocols;

    fn bitand(self, rhs: Self) -> Self::Output {
        NetworkProtocols(self.0 & rhs.0)
    }
}

impl BitAndAssign for NetworkProtocols {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl fmt::Display for NetworkProtocols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(Self::TCP), self.contains(Self::UDP)) {
            (false, false) => write!(f, "NONE"),
            (true, false) => write!(f, "TCP"),
            (false, true) => write!(f, "UDP"),
            (true, true) => write!(f, "TCP|UDP"),
        }
    }
}

/// Columns of the single virtual table a query selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Port,
    Tcp,
    Udp,
}

impl Column {
    /// Every column, in the order `*` expands to.
    pub const ALL: [Column; 3] = [Column::Port, Column::Tcp, Column::Udp];

    /// Protocol that must be probed to know this column's value.
    pub const fn protocol(self) -> NetworkProtocols {
        match self {
            Column::Port => NetworkProtocols::NONE,
            Column::Tcp => NetworkProtocols::TCP,
            Column::Udp => NetworkProtocols::UDP,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Column::Port => "PORT",
            Column::Tcp => "TCP",
            Column::Udp => "UDP",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryResult {
    Open,
    Closed,
    Rejected,
}

impl QueryResult {
    pub const fn as_str(self) -> &'static str {
        match self {
            QueryResult::Open => "OPEN",
            QueryResult::Closed => "CLOSED",
            QueryResult::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cell of a delivered row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnValue {
    Port(u16),
    Result(QueryResult),
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Port(port) => write!(f, "{}", port),
            ColumnValue::Result(result) => write!(f, "{}", result),
        }
    }
}

/// A delivered row, ordered like the statement's select list.
pub type Row = Vec<ColumnValue>;

/// Per-protocol outcome of probing a single port.
///
/// A protocol that was not probed stays `None`; the evaluator treats it as
/// not yet known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeResults {
    pub tcp: Option<QueryResult>,
    pub udp: Option<QueryResult>,
}

impl ProbeResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tcp(mut self, result: QueryResult) -> Self {
        self.tcp = Some(result);
        self
    }

    pub fn with_udp(mut self, result: QueryResult) -> Self {
        self.udp = Some(result);
        self
    }

    /// Result recorded for a protocol column, `None` for `PORT` or an unprobed protocol.
    pub fn get(&self, column: Column) -> Option<QueryResult> {
        match column {
            Column::Port => None,
            Column::Tcp => self.tcp,
            Column::Udp => self.udp,
        }
    }
}
