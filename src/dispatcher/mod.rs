//! # Dispatcher Module
//!
//! The front controller. Every request enters through
//! [`Dispatcher::serve`], which runs a fixed pipeline and stops at the first
//! step that fails:
//!
//! 1. **Resolve**: look the path up in the
//!    [`HandlerRegistry`](crate::registry::HandlerRegistry). Unknown paths end
//!    as `404`, known paths with the wrong method as `405`.
//! 2. **Adapt**: pick the first [`HandlerAdapter`](crate::adapter::HandlerAdapter)
//!    that supports the handler.
//! 3. **Invoke**: run the handler through the adapter. Panics are caught and
//!    reported as internal errors so the server keeps running.
//! 4. **Render**: a `Render` result goes to the
//!    [`ViewRenderer`](crate::view::ViewRenderer), a `Redirect` becomes a
//!    `302`, a `Json` result is serialized. Raw handlers have already written
//!    their response.
//!
//! ## Error Boundary
//!
//! `serve` is the only place errors turn into responses. Paths under a JSON
//! error prefix (default `/api`) and requests that accept
//! `application/json` get an `{"code", "message"}` body; everything else gets
//! the `error` view, or plain text if that view cannot be rendered. Messages
//! of 5xx responses are replaced by a generic one.
//!
//! ## Example
//!
//! ```rust,ignore
//! use frontctl::dispatcher::{Dispatcher, WebRequest};
//! use frontctl::view::TemplateRenderer;
//! use http::Method;
//! use std::sync::Arc;
//!
//! let dispatcher = Dispatcher::builder(registry, Arc::new(TemplateRenderer::new("views")))
//!     .json_error_prefixes(["/api"])
//!     .build();
//! let response = dispatcher.serve(&WebRequest::new(Method::GET, "/front-controller/v3/members"));
//! assert_eq!(response.status, 200);
//! ```

mod core;
mod exchange;

pub use core::{Dispatcher, DispatcherBuilder, DEFAULT_ERROR_VIEW, DEFAULT_JSON_ERROR_PREFIX};
pub use exchange::{
    Exchange, HeaderVec, ParamVec, WebRequest, WebResponse, MAX_INLINE_HEADERS, MAX_INLINE_PARAMS,
};
