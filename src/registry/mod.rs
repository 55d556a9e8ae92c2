//! # Registry Module
//!
//! The [`HandlerRegistry`] maps request paths to handlers. It is populated
//! once at startup and then shared read-only by the dispatcher, so lookups
//! take `&self` and never lock.
//!
//! ## Patterns
//!
//! A pattern is either an exact path (`/front-controller/v3/members`) or a
//! template with whole-segment variables (`/validation/v1/items/{itemId}`).
//! Variable values are handed to handlers as path parameters and take
//! precedence over query and form values with the same name.
//!
//! ```rust,ignore
//! use frontctl::handler::Handler;
//! use frontctl::registry::HandlerRegistry;
//! use http::Method;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_route(
//!     Method::GET,
//!     "/validation/v1/items/add",
//!     Handler::static_view("validation/v1/addForm"),
//! )?;
//! ```
//!
//! Registration errors ([`RegistryError`](crate::error::RegistryError)) are
//! meant to abort startup.

mod core;
#[cfg(test)]
mod tests;

pub use core::{HandlerMatch, HandlerRegistry, RouteInfo};
