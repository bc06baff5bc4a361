// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query object model: protocols, expressions and the select statement.

pub mod expression;
pub mod protocol;
pub mod select_statement;

pub use expression::{ComparisonOp, Expression, Terminal, Tristate};
pub use protocol::{Column, ColumnValue, NetworkProtocols, ProbeResults, QueryResult, Row};
pub use select_statement::{SelectSet, SelectStatement};
