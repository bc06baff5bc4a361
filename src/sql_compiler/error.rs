// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexing and parsing errors.

use thiserror::Error;

use super::token::Token;

pub type SosqlResult<T> = Result<T, SosqlError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SosqlError {
    /// The lexer was asked for another token after it already returned end of input.
    #[error("Cannot scan past end of input (offset {offset})")]
    ScanPastEnd { offset: usize },

    #[error("Unexpected {found} in {context}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        context: String,
    },

    #[error("Only PORT may be the subject of BETWEEN, found {found}")]
    InvalidBetweenSubject { found: String },

    #[error("Column {column} appears more than once in the select list")]
    DuplicateColumn { column: String },

    #[error("Cannot compare {lhs} with {rhs}")]
    IncompatibleOperands { lhs: String, rhs: String },

    #[error("Operator '{op}' is not defined for {operand}")]
    InvalidOperator { op: String, operand: String },
}

impl SosqlError {
    pub fn unexpected(
        found: &Token,
        expected: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            found: found.to_string(),
            expected: expected.into(),
            context: context.into(),
        }
    }

    pub fn invalid_between_subject(found: impl ToString) -> Self {
        Self::InvalidBetweenSubject {
            found: found.to_string(),
        }
    }

    pub fn duplicate_column(column: impl ToString) -> Self {
        Self::DuplicateColumn {
            column: column.to_string(),
        }
    }

    pub fn incompatible_operands(lhs: impl ToString, rhs: impl ToString) -> Self {
        Self::IncompatibleOperands {
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        }
    }

    pub fn invalid_operator(op: impl ToString, operand: impl ToString) -> Self {
        Self::InvalidOperator {
            op: op.to_string(),
            operand: operand.to_string(),
        }
    }

    /// True for the scanning failure, false for grammar violations.
    pub fn is_lex_error(&self) -> bool {
        matches!(self, Self::ScanPastEnd { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_token_message() {
        let error = SosqlError::unexpected(&Token::Eof, "a terminal", "WHERE clause");
        assert_eq!(
            error.to_string(),
            "Unexpected end of input in WHERE clause, expected a terminal"
        );
        assert!(!error.is_lex_error());
    }

    #[test]
    fn test_scan_past_end_is_lex_error() {
        assert!(SosqlError::ScanPastEnd { offset: 3 }.is_lex_error());
    }
}
