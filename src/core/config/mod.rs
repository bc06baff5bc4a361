// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Scan Configuration
//!
//! Settings that govern how a prepared query is executed. Defaults can be
//! overridden from a TOML document and then per field by the caller (the CLI
//! applies its flags on top of the file).
//!
//! ```toml
//! timeout_secs = 2
//! thread_count = 0   # 0 = one worker per CPU
//! delay_ms = 0
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{PortQueryError, PortQueryResult};
use crate::core::util::thread_pool::default_thread_count;

pub const TIMEOUT_SECS_DEFAULT: u64 = 2;
pub const THREAD_COUNT_DEFAULT: usize = 0;
pub const DELAY_MS_DEFAULT: u64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortQueryConfig {
    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,
    /// Worker threads; `0` resolves to the number of CPUs.
    pub thread_count: usize,
    /// Pause between submitted probes, in milliseconds.
    pub delay_ms: u64,
}

impl Default for PortQueryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: TIMEOUT_SECS_DEFAULT,
            thread_count: THREAD_COUNT_DEFAULT,
            delay_ms: DELAY_MS_DEFAULT,
        }
    }
}

impl PortQueryConfig {
    pub fn from_toml_str(content: &str) -> PortQueryResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PortQueryError::configuration(format!("invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> PortQueryResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PortQueryError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> PortQueryResult<()> {
        if self.timeout_secs == 0 {
            return Err(PortQueryError::configuration_with_key(
                "timeout must be at least one second",
                "timeout_secs",
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Worker count with `0` resolved against the hardware.
    pub fn effective_thread_count(&self) -> usize {
        if self.thread_count == 0 {
            default_thread_count()
        } else {
            self.thread_count
        }
    }
}
