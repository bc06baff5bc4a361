// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-demand SOSQL tokenizer with one token of lookahead.

use log::trace;

use super::error::{SosqlError, SosqlResult};
use super::token::{Token, PUNCTUATION};

pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    peeked: Option<Token>,
    eof_returned: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            peeked: None,
            eof_returned: false,
        }
    }

    /// Consume and return the next token. A token cached by [`Lexer::peek`]
    /// is handed out without rescanning.
    pub fn next_token(&mut self) -> SosqlResult<Token> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> SosqlResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        let cached: &Token = self.peeked.insert(token);
        Ok(cached)
    }

    fn scan(&mut self) -> SosqlResult<Token> {
        if self.eof_returned {
            return Err(SosqlError::ScanPastEnd {
                offset: self.offset,
            });
        }

        let rest = &self.input[self.offset..];
        let trimmed = rest.trim_start();
        self.offset += rest.len() - trimmed.len();

        let Some(first) = trimmed.chars().next() else {
            self.eof_returned = true;
            return Ok(Token::Eof);
        };

        if PUNCTUATION.contains(&first) {
            self.offset += first.len_utf8();
            return Ok(Token::Punctuation(first));
        }

        let end = trimmed
            .find(|c: char| c.is_whitespace() || PUNCTUATION.contains(&c))
            .unwrap_or(trimmed.len());
        let lexeme = &trimmed[..end];
        self.offset += end;

        let token = Token::classify(lexeme);
        trace!("scanned {:?} as {}", lexeme, token);
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_api::expression::ComparisonOp;
    use crate::query_api::protocol::{Column, QueryResult};

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            let done = token == Token::Eof;
            out.push(token);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn test_scan_statement() {
        assert_eq!(
            tokens("SELECT tcp, udp FROM 10.0.0.1 WHERE port <= 1024;"),
            vec![
                Token::Select,
                Token::Column(Column::Tcp),
                Token::Punctuation(','),
                Token::Column(Column::Udp),
                Token::From,
                Token::User("10.0.0.1".to_string()),
                Token::Where,
                Token::Column(Column::Port),
                Token::Comparison(ComparisonOp::Le),
                Token::Numeric(1024),
                Token::Punctuation(';'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_punctuation_splits_lexemes() {
        assert_eq!(
            tokens("*,(open)"),
            vec![
                Token::Punctuation('*'),
                Token::Punctuation(','),
                Token::Punctuation('('),
                Token::QueryResult(QueryResult::Open),
                Token::Punctuation(')'),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_whitespace_bounds_tokens() {
        // no whitespace, no split
        assert_eq!(
            tokens("port=53"),
            vec![Token::User("port=53".to_string()), Token::Eof]
        );
    }

    #[test]
    fn test_peek_then_next_returns_same_token() {
        let mut lexer = Lexer::new("select from");
        assert_eq!(lexer.peek().unwrap(), &Token::Select);
        assert_eq!(lexer.peek().unwrap(), &Token::Select);
        assert_eq!(lexer.next_token().unwrap(), Token::Select);
        assert_eq!(lexer.next_token().unwrap(), Token::From);
    }

    #[test]
    fn test_eof_is_one_shot() {
        let mut lexer = Lexer::new("   ");
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert!(matches!(
            lexer.next_token(),
            Err(SosqlError::ScanPastEnd { .. })
        ));
        assert!(lexer.peek().is_err());
    }

    #[test]
    fn test_peeked_eof_can_be_consumed_once() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.peek().unwrap(), &Token::Eof);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert!(lexer.next_token().is_err());
    }
}
