// SPDX-License-Identifier: MIT OR Apache-2.0

//! SOSQL token model and keyword table.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::query_api::expression::{ComparisonOp, Terminal};
use crate::query_api::protocol::{Column, QueryResult};

/// Characters that always form a token on their own.
pub const PUNCTUATION: [char; 5] = ['*', '(', ')', ',', ';'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Select,
    From,
    Where,
    And,
    Or,
    Not,
    Is,
    Between,
    Comparison(ComparisonOp),
    Column(Column),
    QueryResult(QueryResult),
    Numeric(u16),
    /// Identifier or host literal, original case preserved.
    User(String),
    /// One of [`PUNCTUATION`].
    Punctuation(char),
    Eof,
}

/// Upper-cased lexeme to token.
static KEYWORDS: Lazy<HashMap<&'static str, Token>> = Lazy::new(|| {
    HashMap::from([
        ("SELECT", Token::Select),
        ("FROM", Token::From),
        ("WHERE", Token::Where),
        ("AND", Token::And),
        ("OR", Token::Or),
        ("NOT", Token::Not),
        ("IS", Token::Is),
        ("BETWEEN", Token::Between),
        ("PORT", Token::Column(Column::Port)),
        ("TCP", Token::Column(Column::Tcp)),
        ("UDP", Token::Column(Column::Udp)),
        ("OPEN", Token::QueryResult(QueryResult::Open)),
        ("CLOSED", Token::QueryResult(QueryResult::Closed)),
        ("REJECTED", Token::QueryResult(QueryResult::Rejected)),
        ("=", Token::Comparison(ComparisonOp::Eq)),
        ("!=", Token::Comparison(ComparisonOp::Ne)),
        ("<>", Token::Comparison(ComparisonOp::Ne)),
        ("<", Token::Comparison(ComparisonOp::Lt)),
        ("<=", Token::Comparison(ComparisonOp::Le)),
        (">", Token::Comparison(ComparisonOp::Gt)),
        (">=", Token::Comparison(ComparisonOp::Ge)),
    ])
});

impl Token {
    /// Classify a lexeme that is not punctuation: keyword table first
    /// (case-insensitive), then all-digit numeric literals, then user text.
    pub fn classify(lexeme: &str) -> Token {
        if let Some(keyword) = KEYWORDS.get(lexeme.to_ascii_uppercase().as_str()) {
            return keyword.clone();
        }

        if !lexeme.is_empty() && lexeme.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = lexeme.parse::<u16>() {
                return Token::Numeric(value);
            }
        }

        Token::User(lexeme.to_string())
    }

    /// The expression leaf this token denotes, if any.
    pub fn as_terminal(&self) -> Option<Terminal> {
        match self {
            Token::Column(column) => Some(Terminal::Column(*column)),
            Token::Numeric(value) => Some(Terminal::Numeric(*value)),
            Token::QueryResult(result) => Some(Terminal::QueryResult(*result)),
            _ => None,
        }
    }

    pub fn is_punctuation(&self, c: char) -> bool {
        matches!(self, Token::Punctuation(p) if *p == c)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Select => write!(f, "SELECT keyword"),
            Token::From => write!(f, "FROM keyword"),
            Token::Where => write!(f, "WHERE keyword"),
            Token::And => write!(f, "AND keyword"),
            Token::Or => write!(f, "OR keyword"),
            Token::Not => write!(f, "NOT keyword"),
            Token::Is => write!(f, "IS keyword"),
            Token::Between => write!(f, "BETWEEN keyword"),
            Token::Comparison(op) => write!(f, "comparison '{}'", op),
            Token::Column(column) => write!(f, "column {}", column),
            Token::QueryResult(result) => write!(f, "query result {}", result),
            Token::Numeric(value) => write!(f, "numeric literal {}", value),
            Token::User(text) => write!(f, "identifier '{}'", text),
            Token::Punctuation(c) => write!(f, "'{}'", c),
            Token::Eof => write!(f, "end of input"),
        }
    }
}
