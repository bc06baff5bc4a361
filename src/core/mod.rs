// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod config;
pub mod connection;
pub mod error;
pub mod network;
pub mod query;
pub mod util;

pub use config::PortQueryConfig;
pub use connection::PortQueryConnection;
pub use error::{PortQueryError, PortQueryResult};
