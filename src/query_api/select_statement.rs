// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsed SOSQL `SELECT` statement.

use std::fmt;

use super::expression::{Expression, Tristate};
use super::protocol::{Column, ColumnValue, NetworkProtocols, ProbeResults, Row};

/// Ordered, duplicate-free list of selected columns.
pub type SelectSet = Vec<Column>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    selected: SelectSet,
    table_reference: String,
    expression: Expression,
}

impl SelectStatement {
    pub fn new(selected: SelectSet, table_reference: String, expression: Expression) -> Self {
        Self {
            selected,
            table_reference,
            expression,
        }
    }

    pub fn select_set(&self) -> &[Column] {
        &self.selected
    }

    /// Host name or address the query targets.
    pub fn table_reference(&self) -> &str {
        &self.table_reference
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn evaluate_pre_network(&self, port: u16) -> Tristate {
        self.expression.evaluate_pre_network(port)
    }

    pub fn evaluate(&self, port: u16, probes: &ProbeResults) -> Tristate {
        self.expression.evaluate(port, probes)
    }

    /// Protocols needed to produce a row: everything the WHERE clause refers
    /// to plus every selected protocol column.
    pub fn required_protocols(&self) -> NetworkProtocols {
        self.selected
            .iter()
            .fold(self.expression.required_protocols(), |acc, column| {
                acc | column.protocol()
            })
    }

    /// Build the output row for `port`. Selected protocol columns that were
    /// not probed are left out.
    pub fn project(&self, port: u16, probes: &ProbeResults) -> Row {
        self.selected
            .iter()
            .filter_map(|column| match column {
                Column::Port => Some(ColumnValue::Port(port)),
                _ => probes.get(*column).map(ColumnValue::Result),
            })
            .collect()
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<&str> = self.selected.iter().map(|c| c.as_str()).collect();
        write!(f, "SELECT {} FROM {}", columns.join(", "), self.table_reference)?;
        if !self.expression.is_null() {
            write!(f, " WHERE {}", self.expression)?;
        }
        f.write_str(";")
    }
}
