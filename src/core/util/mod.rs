// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod thread_pool;
pub mod work_queue;

pub use thread_pool::ThreadPool;
pub use work_queue::{Job, WorkQueue};
