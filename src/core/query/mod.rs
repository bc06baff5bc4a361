// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod scan_runner;

pub use scan_runner::{ResultCallback, ScanRunner, ScanSummary, UserContext};
