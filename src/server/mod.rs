//! # Server Module
//!
//! HTTP transport for the dispatcher, built on `may_minihttp`. Each
//! connection is served on a `may` coroutine; [`AppService`] converts the
//! raw request to a [`WebRequest`](crate::dispatcher::WebRequest), calls
//! [`Dispatcher::serve`](crate::dispatcher::Dispatcher::serve) and writes the
//! [`WebResponse`](crate::dispatcher::WebResponse) back.
//!
//! - Query strings and `application/x-www-form-urlencoded` bodies become
//!   request parameters, query first.
//! - A valid ULID in `X-Request-Id` is reused as the request id.
//! - `GET /health` is answered here and never reaches the dispatcher.
//!
//! ```rust,ignore
//! let handle = frontctl::server::serve(dispatcher, "127.0.0.1:8080")?;
//! handle.wait_ready()?;
//! handle.join().ok();
//! ```

mod http_server;
mod request;
mod response;
mod service;

pub use http_server::{serve, HttpServer, ServerHandle, MAX_REQUEST_HEADERS};
pub use request::{build_request, parse_request, FORM_CONTENT_TYPE};
pub use response::write_response;
pub use service::{health_endpoint, AppService, HEALTH_PATH};
