//! # Runtime Configuration
//!
//! Coroutine runtime tuning read from the environment at startup.
//!
//! ### `FRONTCTL_STACK_SIZE`
//!
//! Stack size of every `may` coroutine, in decimal (`131072`) or hex
//! (`0x20000`). Template rendering runs on the connection coroutine, so the
//! default is larger than a bare router would need.
//!
//! Default: `0x20000` (128 KB)
//!
//! ### `FRONTCTL_WORKERS`
//!
//! Number of `may` worker threads. Unset keeps `may`'s default (one per core).
//!
//! ```bash
//! FRONTCTL_STACK_SIZE=0x40000 FRONTCTL_WORKERS=4 frontctl serve
//! ```

use std::env;
use tracing::{info, warn};

pub const STACK_SIZE_VAR: &str = "FRONTCTL_STACK_SIZE";
pub const WORKERS_VAR: &str = "FRONTCTL_WORKERS";

/// Default coroutine stack size in bytes.
pub const DEFAULT_STACK_SIZE: usize = 0x20000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub stack_size: usize,
    /// `None` keeps the runtime default.
    pub workers: Option<usize>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            workers: None,
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup. Invalid values fall back
    /// to the defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(STACK_SIZE_VAR) {
            match parse_size(&raw) {
                Some(size) if size > 0 => config.stack_size = size,
                _ => warn!(var = STACK_SIZE_VAR, value = %raw, "Ignoring invalid stack size"),
            }
        }
        if let Some(raw) = lookup(WORKERS_VAR) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.workers = Some(n),
                _ => warn!(var = WORKERS_VAR, value = %raw, "Ignoring invalid worker count"),
            }
        }
        config
    }

    /// Push the settings into the global `may` configuration. Call before
    /// the first coroutine is spawned.
    pub fn apply(&self) {
        let cfg = may::config();
        cfg.set_stack_size(self.stack_size);
        if let Some(workers) = self.workers {
            cfg.set_workers(workers);
        }
        info!(
            stack_size = self.stack_size,
            workers = ?self.workers,
            "Coroutine runtime configured"
        );
    }
}

fn parse_size(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
