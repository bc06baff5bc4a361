// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port scanning described with SOSQL, a small SQL dialect over a single
//! virtual table (the target host) with columns `PORT`, `TCP` and `UDP`.
//!
//! The query is parsed into a [`query_api::SelectStatement`], its WHERE clause
//! is partially evaluated per port to prune probes that cannot change the
//! outcome, and the remaining probes run on a work-stealing thread pool.

pub mod core;
pub mod query_api;
pub mod sql_compiler;

pub use crate::core::{PortQueryConfig, PortQueryConnection, PortQueryError, PortQueryResult};
