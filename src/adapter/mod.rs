//! # Adapter Module
//!
//! Handler adapters normalize the different [`Handler`](crate::handler::Handler)
//! call styles to one contract: `handle(exchange, handler) → Handled`.
//!
//! The dispatcher keeps an ordered adapter list and picks the first adapter
//! whose `supports` returns true. [`default_adapters`] covers every handler
//! variant exactly once, so the order of that list never changes which
//! adapter runs; it only matters for custom lists that overlap.
//!
//! Adapters never catch handler errors. A failing handler's
//! [`ProcessingError`](crate::error::ProcessingError) reaches the dispatcher
//! unchanged.

mod core;

pub use core::{
    default_adapters, Handled, HandlerAdapter, ModelControllerAdapter, ParamControllerAdapter,
    RawControllerAdapter, StaticViewAdapter,
};
