// SPDX-License-Identifier: MIT OR Apache-2.0

//! SOSQL compiler: query text to [`SelectStatement`].
//!
//! ```rust,ignore
//! use portquery_rust::sql_compiler::parse_sosql;
//!
//! let stmt = parse_sosql("SELECT TCP FROM 127.0.0.1 WHERE PORT BETWEEN 1 AND 1024;")?;
//! assert_eq!(stmt.table_reference(), "127.0.0.1");
//! ```

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

pub use error::{SosqlError, SosqlResult};
pub use lexer::Lexer;
pub use parser::Parser;
pub use token::Token;

use crate::query_api::select_statement::SelectStatement;

/// Parse a complete SOSQL statement.
pub fn parse_sosql(input: &str) -> SosqlResult<SelectStatement> {
    Parser::new(input).parse_statement()
}
