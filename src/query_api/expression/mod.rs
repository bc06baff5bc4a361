// SPDX-License-Identifier: MIT OR Apache-2.0

//! WHERE-clause expression tree.
//!
//! The tree is built once by the parser and is read-only afterwards. Two
//! questions are answered without touching the network:
//!
//! - [`Expression::evaluate_pre_network`]: is the clause already decided for a
//!   port, using only the port number?
//! - [`Expression::required_protocols`]: which probes could the clause
//!   possibly depend on?
//!
//! Once probes have run, [`Expression::evaluate`] re-walks the same tree with
//! the probe results substituted, using the same three-valued rules.

pub mod terminal;
pub mod tristate;

use std::fmt;

use crate::query_api::protocol::{NetworkProtocols, ProbeResults};

pub use terminal::{ComparisonOp, Terminal, TerminalKind, TerminalValue};
pub use tristate::Tristate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Or(Box<Expression>, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
    Comparison {
        op: ComparisonOp,
        lhs: Terminal,
        rhs: Terminal,
    },
    /// Inclusive range test; the parser only allows `PORT` as the subject.
    Between {
        terminal: Terminal,
        lower: u16,
        upper: u16,
    },
    /// Absent WHERE clause.
    Null,
}

impl Expression {
    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Expression) -> Self {
        Expression::Not(Box::new(inner))
    }

    pub fn comparison(op: ComparisonOp, lhs: Terminal, rhs: Terminal) -> Self {
        Expression::Comparison { op, lhs, rhs }
    }

    pub fn between(terminal: Terminal, lower: u16, upper: u16) -> Self {
        Expression::Between {
            terminal,
            lower,
            upper,
        }
    }

    /// Evaluate using only the destination port. Any comparison that needs a
    /// probe result comes back `Unknown`.
    pub fn evaluate_pre_network(&self, port: u16) -> Tristate {
        self.evaluate(port, &ProbeResults::default())
    }

    /// Evaluate with whatever probe results are available for `port`.
    pub fn evaluate(&self, port: u16, probes: &ProbeResults) -> Tristate {
        match self {
            Expression::Or(left, right) => {
                left.evaluate(port, probes) | right.evaluate(port, probes)
            }
            Expression::And(left, right) => {
                left.evaluate(port, probes) & right.evaluate(port, probes)
            }
            Expression::Not(inner) => !inner.evaluate(port, probes),
            Expression::Comparison { op, lhs, rhs } => terminal::compare(
                *op,
                lhs.resolve(port, probes),
                rhs.resolve(port, probes),
            ),
            Expression::Between {
                terminal,
                lower,
                upper,
            } => match terminal.resolve(port, probes) {
                TerminalValue::Number(value) => Tristate::from(*lower <= value && value <= *upper),
                TerminalValue::Unknown => Tristate::Unknown,
                TerminalValue::Result(_) => Tristate::False,
            },
            Expression::Null => Tristate::True,
        }
    }

    /// Union of every protocol referenced anywhere in the tree. Structural:
    /// does not depend on which branches a particular port would evaluate.
    pub fn required_protocols(&self) -> NetworkProtocols {
        match self {
            Expression::Or(left, right) | Expression::And(left, right) => {
                left.required_protocols() | right.required_protocols()
            }
            Expression::Not(inner) => inner.required_protocols(),
            Expression::Comparison { lhs, rhs, .. } => lhs.protocol() | rhs.protocol(),
            Expression::Between { terminal, .. } => terminal.protocol(),
            Expression::Null => NetworkProtocols::NONE,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expression::Null)
    }

    fn precedence(&self) -> u8 {
        match self {
            Expression::Or(..) => 0,
            Expression::And(..) => 1,
            Expression::Not(_) => 2,
            _ => 3,
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>, min_precedence: u8) -> fmt::Result {
        if self.precedence() < min_precedence {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

/// Canonical SOSQL text; parses back to an equal tree.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Or(left, right) => {
                left.fmt_operand(f, 0)?;
                f.write_str(" OR ")?;
                right.fmt_operand(f, 1)
            }
            Expression::And(left, right) => {
                left.fmt_operand(f, 1)?;
                f.write_str(" AND ")?;
                right.fmt_operand(f, 2)
            }
            Expression::Not(inner) => {
                f.write_str("NOT ")?;
                inner.fmt_operand(f, 3)
            }
            Expression::Comparison { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Expression::Between {
                terminal,
                lower,
                upper,
            } => write!(f, "{} BETWEEN {} AND {}", terminal, lower, upper),
            Expression::Null => Ok(()),
        }
    }
}
