// SPDX-License-Identifier: MIT OR Apache-2.0

//! Expression leaves and comparison operators.

use std::cmp::Ordering;
use std::fmt;

use super::tristate::Tristate;
use crate::query_api::protocol::{Column, NetworkProtocols, ProbeResults, QueryResult};

/// Comparison operator of a `Comparison` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ComparisonOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
        }
    }

    /// `=` and `!=` are the only operators defined for probe results.
    pub const fn is_equality(self) -> bool {
        matches!(self, ComparisonOp::Eq | ComparisonOp::Ne)
    }

    pub fn matches(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Ge => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaf value of a boolean expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Column(Column),
    Numeric(u16),
    QueryResult(QueryResult),
}

/// Which family of values a terminal produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    /// `PORT` and numeric literals, known before probing.
    Numeric,
    /// `TCP`, `UDP` and `OPEN` / `CLOSED` / `REJECTED`.
    Result,
}

/// A terminal resolved against what is currently known about a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalValue {
    Number(u16),
    Result(QueryResult),
    Unknown,
}

impl Terminal {
    pub const fn kind(self) -> TerminalKind {
        match self {
            Terminal::Column(Column::Port) | Terminal::Numeric(_) => TerminalKind::Numeric,
            Terminal::Column(_) | Terminal::QueryResult(_) => TerminalKind::Result,
        }
    }

    /// Protocol whose probe determines this terminal's value.
    pub const fn protocol(self) -> NetworkProtocols {
        match self {
            Terminal::Column(column) => column.protocol(),
            Terminal::Numeric(_) | Terminal::QueryResult(_) => NetworkProtocols::NONE,
        }
    }

    pub fn resolve(self, port: u16, probes: &ProbeResults) -> TerminalValue {
        match self {
            Terminal::Column(Column::Port) => TerminalValue::Number(port),
            Terminal::Column(column) => probes
                .get(column)
                .map_or(TerminalValue::Unknown, TerminalValue::Result),
            Terminal::Numeric(value) => TerminalValue::Number(value),
            Terminal::QueryResult(result) => TerminalValue::Result(result),
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Column(column) => write!(f, "{}", column),
            Terminal::Numeric(value) => write!(f, "{}", value),
            Terminal::QueryResult(result) => write!(f, "{}", result),
        }
    }
}

/// Compare two resolved terminals. Anything not yet known is `Unknown`;
/// operands of different kinds never compare equal.
pub fn compare(op: ComparisonOp, lhs: TerminalValue, rhs: TerminalValue) -> Tristate {
    match (lhs, rhs) {
        (TerminalValue::Unknown, _) | (_, TerminalValue::Unknown) => Tristate::Unknown,
        (TerminalValue::Number(a), TerminalValue::Number(b)) => op.matches(a.cmp(&b)).into(),
        (TerminalValue::Result(a), TerminalValue::Result(b)) => op.matches(a.cmp(&b)).into(),
        _ => Tristate::False,
    }
}
