//! # CLI Module
//!
//! `frontctl serve` starts the HTTP server with the bundled controllers;
//! `frontctl routes` prints the routing table.
//!
//! ```bash
//! frontctl serve --config config/config.yaml --addr 0.0.0.0:8080
//! frontctl routes
//! ```
//!
//! Logging and the coroutine runtime are configured from the environment
//! (see [`logging`](crate::logging) and
//! [`runtime_config`](crate::runtime_config)).

mod commands;


pub use commands::{resolve_config, run, run_cli, Cli, Commands};
