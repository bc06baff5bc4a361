// SPDX-License-Identifier: MIT OR Apache-2.0

//! PortQuery Core Error Types

use thiserror::Error;

use crate::sql_compiler::SosqlError;

/// Result type for PortQuery operations
pub type PortQueryResult<T> = Result<T, PortQueryError>;

#[derive(Error, Debug)]
pub enum PortQueryError {
    #[error("Parse error: {0}")]
    Parse(#[from] SosqlError),

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        config_key: Option<String>,
    },

    #[error("No statement prepared")]
    NoStatement,

    #[error("Could not resolve host '{host}': {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Runtime error: {message}")]
    Runtime { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PortQueryError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: None,
        }
    }

    /// Create a configuration error with a specific key
    pub fn configuration_with_key(message: impl Into<String>, config_key: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            config_key: Some(config_key.into()),
        }
    }

    pub fn resolve(host: impl Into<String>, source: std::io::Error) -> Self {
        Self::Resolve {
            host: host.into(),
            source,
        }
    }

    /// Create a runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }
}
