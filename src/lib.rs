//! # frontctl
//!
//! **frontctl** is a front-controller dispatch core on the `may` coroutine
//! runtime. One entry point maps a request path to a handler, normalizes the
//! request parameters, invokes the handler through a pluggable adapter and
//! resolves what the handler returns into a rendered view, a redirect or a
//! JSON body.
//!
//! ## Architecture
//!
//! - **[`registry`]** - path → handler table with exact and `{var}` patterns
//! - **[`handler`]** - the handler variants and their controller traits
//! - **[`adapter`]** - adapters normalizing each handler style to one contract
//! - **[`dispatcher`]** - the resolve / adapt / invoke / render pipeline and error boundary
//! - **[`model`]** - per-request parameter and model maps
//! - **[`view`]** - view results, redirects and the `minijinja` renderer
//! - **[`server`]** - HTTP transport on `may_minihttp`
//! - **[`domain`]** / **[`controllers`]** - in-memory stores and the bundled controllers
//! - **[`config`]**, **[`runtime_config`]**, **[`logging`]**, **[`cli`]** - startup plumbing
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Dispatcher
//!     participant Registry as HandlerRegistry
//!     participant Adapter as HandlerAdapter
//!     participant Handler
//!     participant Renderer as ViewRenderer
//!
//!     Client->>Server: POST /validation/v1/items/add
//!     Server->>Server: Decode query + form body
//!     Server->>Dispatcher: serve(WebRequest)
//!     Dispatcher->>Registry: lookup(POST, path)
//!     alt No binding
//!         Registry-->>Dispatcher: NotFound / MethodNotAllowed
//!         Dispatcher-->>Client: 404 / 405
//!     end
//!     Registry-->>Dispatcher: HandlerMatch
//!     Dispatcher->>Adapter: first adapter that supports(handler)
//!     Adapter->>Adapter: Build ParamMap / ModelMap
//!     Adapter->>Handler: process(...)
//!     Handler-->>Adapter: ViewResult
//!     Adapter-->>Dispatcher: Handled::View
//!     alt Render
//!         Dispatcher->>Renderer: render(view, model)
//!         Renderer-->>Dispatcher: HTML
//!     else Redirect
//!         Dispatcher->>Dispatcher: Expand {placeholders}, append query
//!     end
//!     Dispatcher-->>Server: WebResponse
//!     Server-->>Client: 200 / 302 / error body
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use frontctl::dispatcher::Dispatcher;
//! use frontctl::handler::Handler;
//! use frontctl::registry::HandlerRegistry;
//! use frontctl::view::TemplateRenderer;
//! use std::sync::Arc;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register("/hello", Handler::static_view("hello"))?;
//!
//! let dispatcher = Dispatcher::builder(registry, Arc::new(TemplateRenderer::new("views"))).build();
//! let handle = frontctl::server::serve(Arc::new(dispatcher), "127.0.0.1:8080")?;
//! handle.join().ok();
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod model;
pub mod registry;
pub mod runtime_config;
pub mod server;
pub mod view;

pub use dispatcher::{Dispatcher, WebRequest, WebResponse};
pub use error::{DispatchError, ProcessingError, RegistryError, RenderError};
pub use handler::Handler;
pub use model::{ModelMap, ParamMap};
pub use registry::HandlerRegistry;
pub use view::{Redirect, ViewResult};
