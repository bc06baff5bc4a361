// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recursive-descent parser for SOSQL.
//!
//! ```text
//! statement       := SELECT select-list FROM table-ref [ WHERE or-expr ] [ ';' ]
//! select-list     := '*' | column (',' column)*
//! table-ref       := USER-TOKEN
//! or-expr         := and-expr (OR and-expr)*
//! and-expr        := factor (AND factor)*
//! factor          := [NOT] bool-expr
//! bool-expr       := '(' or-expr ')' | terminal (comparison-expr | is-expr | between-expr)
//! comparison-expr := COMPARISON terminal
//! is-expr         := IS [NOT] terminal
//! between-expr    := BETWEEN NUMERIC AND NUMERIC
//! terminal        := column | query-result | numeric
//! ```
//!
//! Any mismatch aborts the parse; no partial statement is returned.

use log::debug;

use super::error::{SosqlError, SosqlResult};
use super::lexer::Lexer;
use super::token::Token;
use crate::query_api::expression::{ComparisonOp, Expression, Terminal, TerminalKind};
use crate::query_api::protocol::Column;
use crate::query_api::select_statement::{SelectSet, SelectStatement};

const TERMINAL_EXPECTATION: &str = "PORT, TCP, UDP, OPEN, CLOSED, REJECTED or a number";

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }

    pub fn parse_statement(mut self) -> SosqlResult<SelectStatement> {
        let first = self.lexer.next_token()?;
        if first != Token::Select {
            return Err(SosqlError::unexpected(&first, "SELECT", "statement start"));
        }

        let selected = self.parse_select_set()?;
        let table_reference = self.parse_table_reference()?;
        let expression = self.parse_table_expression()?;
        self.parse_statement_end()?;

        debug!(
            "parsed SELECT of {} columns from '{}' (where: {})",
            selected.len(),
            table_reference,
            if expression.is_null() { "none" } else { "present" }
        );
        Ok(SelectStatement::new(selected, table_reference, expression))
    }

    fn parse_select_set(&mut self) -> SosqlResult<SelectSet> {
        match self.lexer.peek()? {
            Token::Punctuation('*') => {
                self.lexer.next_token()?;
                Ok(Column::ALL.to_vec())
            }
            Token::Column(_) => self.parse_select_list(),
            other => Err(SosqlError::unexpected(other, "'*' or a column", "select list")),
        }
    }

    fn parse_select_list(&mut self) -> SosqlResult<SelectSet> {
        let mut selected = SelectSet::new();
        loop {
            match self.lexer.next_token()? {
                Token::Column(column) => {
                    if selected.contains(&column) {
                        return Err(SosqlError::duplicate_column(column));
                    }
                    selected.push(column);
                }
                other => {
                    return Err(SosqlError::unexpected(
                        &other,
                        "PORT, TCP or UDP",
                        "select list",
                    ))
                }
            }

            if !self.lexer.peek()?.is_punctuation(',') {
                return Ok(selected);
            }
            self.lexer.next_token()?;
        }
    }

    fn parse_table_reference(&mut self) -> SosqlResult<String> {
        let token = self.lexer.next_token()?;
        if token != Token::From {
            return Err(SosqlError::unexpected(&token, "FROM", "select list"));
        }

        match self.lexer.next_token()? {
            Token::User(host) => Ok(host),
            other => Err(SosqlError::unexpected(
                &other,
                "a host name or address",
                "FROM clause",
            )),
        }
    }

    fn parse_table_expression(&mut self) -> SosqlResult<Expression> {
        if *self.lexer.peek()? != Token::Where {
            return Ok(Expression::Null);
        }

        self.lexer.next_token()?;
        self.parse_or_expression()
    }

    fn parse_statement_end(&mut self) -> SosqlResult<()> {
        let mut token = self.lexer.next_token()?;
        if token.is_punctuation(';') {
            token = self.lexer.next_token()?;
            if token != Token::Eof {
                return Err(SosqlError::unexpected(&token, "end of input", "after ';'"));
            }
        }

        match token {
            Token::Eof => Ok(()),
            other => Err(SosqlError::unexpected(
                &other,
                "';' or end of input",
                "end of statement",
            )),
        }
    }

    fn parse_or_expression(&mut self) -> SosqlResult<Expression> {
        let mut expression = self.parse_and_expression()?;
        while *self.lexer.peek()? == Token::Or {
            self.lexer.next_token()?;
            let right = self.parse_and_expression()?;
            expression = Expression::or(expression, right);
        }
        Ok(expression)
    }

    fn parse_and_expression(&mut self) -> SosqlResult<Expression> {
        let mut expression = self.parse_boolean_factor()?;
        while *self.lexer.peek()? == Token::And {
            self.lexer.next_token()?;
            let right = self.parse_boolean_factor()?;
            expression = Expression::and(expression, right);
        }
        Ok(expression)
    }

    fn parse_boolean_factor(&mut self) -> SosqlResult<Expression> {
        if *self.lexer.peek()? == Token::Not {
            self.lexer.next_token()?;
            return Ok(Expression::not(self.parse_boolean_expression()?));
        }
        self.parse_boolean_expression()
    }

    fn parse_boolean_expression(&mut self) -> SosqlResult<Expression> {
        if self.lexer.peek()?.is_punctuation('(') {
            self.lexer.next_token()?;
            let inner = self.parse_or_expression()?;
            let close = self.lexer.next_token()?;
            if !close.is_punctuation(')') {
                return Err(SosqlError::unexpected(&close, "')'", "parenthesised expression"));
            }
            return Ok(inner);
        }

        let lhs = self.expect_terminal("WHERE clause")?;
        match self.lexer.peek()? {
            Token::Comparison(_) => self.parse_comparison_expression(lhs),
            Token::Is => self.parse_is_expression(lhs),
            Token::Between => self.parse_between_expression(lhs),
            other => Err(SosqlError::unexpected(
                other,
                "a comparison operator, IS or BETWEEN",
                format!("expression on {}", lhs),
            )),
        }
    }

    fn parse_comparison_expression(&mut self, lhs: Terminal) -> SosqlResult<Expression> {
        let op = match self.lexer.next_token()? {
            Token::Comparison(op) => op,
            other => {
                return Err(SosqlError::unexpected(
                    &other,
                    "a comparison operator",
                    "comparison",
                ))
            }
        };
        let rhs = self.expect_terminal("comparison")?;
        build_comparison(op, lhs, rhs)
    }

    fn parse_is_expression(&mut self, lhs: Terminal) -> SosqlResult<Expression> {
        self.lexer.next_token()?;
        let mut op = ComparisonOp::Eq;
        if *self.lexer.peek()? == Token::Not {
            self.lexer.next_token()?;
            op = ComparisonOp::Ne;
        }
        let rhs = self.expect_terminal("IS expression")?;
        build_comparison(op, lhs, rhs)
    }

    fn parse_between_expression(&mut self, lhs: Terminal) -> SosqlResult<Expression> {
        if lhs != Terminal::Column(Column::Port) {
            return Err(SosqlError::invalid_between_subject(lhs));
        }

        self.lexer.next_token()?;
        let lower = self.expect_numeric("BETWEEN lower bound")?;
        let and = self.lexer.next_token()?;
        if and != Token::And {
            return Err(SosqlError::unexpected(&and, "AND", "BETWEEN clause"));
        }
        let upper = self.expect_numeric("BETWEEN upper bound")?;
        Ok(Expression::between(lhs, lower, upper))
    }

    fn expect_terminal(&mut self, context: &str) -> SosqlResult<Terminal> {
        let token = self.lexer.next_token()?;
        token
            .as_terminal()
            .ok_or_else(|| SosqlError::unexpected(&token, TERMINAL_EXPECTATION, context))
    }

    fn expect_numeric(&mut self, context: &str) -> SosqlResult<u16> {
        match self.lexer.next_token()? {
            Token::Numeric(value) => Ok(value),
            other => Err(SosqlError::unexpected(&other, "a number", context)),
        }
    }
}

/// Both operands must be of the same kind; probe results only support `=` and `!=`.
fn build_comparison(op: ComparisonOp, lhs: Terminal, rhs: Terminal) -> SosqlResult<Expression> {
    if lhs.kind() != rhs.kind() {
        return Err(SosqlError::incompatible_operands(lhs, rhs));
    }
    if lhs.kind() == TerminalKind::Result && !op.is_equality() {
        return Err(SosqlError::invalid_operator(op, lhs));
    }
    Ok(Expression::comparison(op, lhs, rhs))
}
