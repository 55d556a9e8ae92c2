//! Dispatcher core: resolve, adapt, invoke, render.
//!
//! This is the request hot path. [`Dispatcher::serve`] is the only place
//! where errors become responses.

use super::exchange::{Exchange, WebRequest, WebResponse};
use crate::adapter::{default_adapters, Handled, HandlerAdapter};
use crate::error::{DispatchError, ProcessingError};
use crate::handler::Handler;
use crate::model::ModelMap;
use crate::registry::{HandlerMatch, HandlerRegistry};
use crate::view::{ViewRenderer, ViewResult};
use http::Method;
use serde_json::json;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use url::form_urlencoded;

/// View rendered for non-JSON error responses.
pub const DEFAULT_ERROR_VIEW: &str = "error";

/// Path prefix that selects JSON error bodies unless configured otherwise.
pub const DEFAULT_JSON_ERROR_PREFIX: &str = "/api";

/// Message sent for every 5xx response; details stay in the log.
const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Front controller shared by every connection.
///
/// Built once by [`DispatcherBuilder`] and then only read, so it is shared
/// as `Arc<Dispatcher>` without locking.
pub struct Dispatcher {
    registry: HandlerRegistry,
    adapters: Vec<Arc<dyn HandlerAdapter>>,
    renderer: Arc<dyn ViewRenderer>,
    json_error_prefixes: Vec<String>,
    error_view: String,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adapters: Vec<_> = self.adapters.iter().map(|a| a.name()).collect();
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("adapters", &adapters)
            .field("json_error_prefixes", &self.json_error_prefixes)
            .field("error_view", &self.error_view)
            .finish_non_exhaustive()
    }
}

/// Assembles a [`Dispatcher`].
pub struct DispatcherBuilder {
    registry: HandlerRegistry,
    renderer: Arc<dyn ViewRenderer>,
    adapters: Option<Vec<Arc<dyn HandlerAdapter>>>,
    json_error_prefixes: Vec<String>,
    error_view: String,
}

impl DispatcherBuilder {
    /// Replace the default adapter list. Order decides which adapter wins
    /// when several support the same handler.
    #[must_use]
    pub fn adapters(mut self, adapters: Vec<Arc<dyn HandlerAdapter>>) -> Self {
        self.adapters = Some(adapters);
        self
    }

    /// Paths starting with any of these get JSON error bodies.
    #[must_use]
    pub fn json_error_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.json_error_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn error_view(mut self, view: impl Into<String>) -> Self {
        self.error_view = view.into();
        self
    }

    #[must_use]
    pub fn build(self) -> Dispatcher {
        let adapters = self.adapters.unwrap_or_else(default_adapters);
        info!(
            routes = self.registry.len(),
            adapters = adapters.len(),
            json_error_prefixes = ?self.json_error_prefixes,
            "Dispatcher built"
        );
        Dispatcher {
            registry: self.registry,
            adapters,
            renderer: self.renderer,
            json_error_prefixes: self.json_error_prefixes,
            error_view: self.error_view,
        }
    }
}

impl Dispatcher {
    /// Start building a dispatcher around a populated registry.
    #[must_use]
    pub fn builder(registry: HandlerRegistry, renderer: Arc<dyn ViewRenderer>) -> DispatcherBuilder {
        DispatcherBuilder {
            registry,
            renderer,
            adapters: None,
            json_error_prefixes: vec![DEFAULT_JSON_ERROR_PREFIX.to_string()],
            error_view: DEFAULT_ERROR_VIEW.to_string(),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Step 1: find the handler bound to the request path.
    pub fn resolve(&self, request: &WebRequest) -> Result<HandlerMatch, DispatchError> {
        self.registry.lookup(&request.method, &request.path)
    }

    /// Step 2: first adapter whose `supports` accepts the handler.
    pub fn pick_adapter(&self, handler: &Handler) -> Result<&dyn HandlerAdapter, DispatchError> {
        self.adapters
            .iter()
            .find(|a| a.supports(handler))
            .map(|a| &**a)
            .ok_or(DispatchError::NoAdapter {
                kind: handler.kind().as_str(),
            })
    }

    /// Steps 1 to 3: resolve, adapt and invoke.
    ///
    /// Raw handlers write into `response` and yield [`Handled::Committed`].
    /// A panicking handler is reported as [`ProcessingError::Internal`].
    pub fn dispatch(
        &self,
        request: &WebRequest,
        response: &mut WebResponse,
    ) -> Result<Handled, DispatchError> {
        let matched = self.resolve(request)?;
        let adapter = self.pick_adapter(&matched.handler)?;

        debug!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            pattern = %matched.pattern,
            handler_kind = %matched.handler.kind(),
            adapter = adapter.name(),
            "Handler resolved"
        );

        let mut exchange = Exchange {
            request,
            path_params: &matched.path_params,
            response,
            views: self.renderer.as_ref(),
        };
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            adapter.handle(&mut exchange, &matched.handler)
        }));

        match outcome {
            Ok(result) => {
                debug!(
                    request_id = %request.request_id,
                    pattern = %matched.pattern,
                    execution_time_us = started.elapsed().as_micros() as u64,
                    ok = result.is_ok(),
                    "Handler returned"
                );
                result
            }
            Err(payload) => {
                let panic_message = panic_message(&*payload);
                error!(
                    request_id = %request.request_id,
                    pattern = %matched.pattern,
                    panic_message = %panic_message,
                    "Handler panicked"
                );
                Err(ProcessingError::Internal(format!("handler panicked: {panic_message}")).into())
            }
        }
    }

    /// Run the whole pipeline and always produce a response.
    #[must_use]
    pub fn serve(&self, request: &WebRequest) -> WebResponse {
        let started = Instant::now();
        let mut response = WebResponse::default();

        let result = match self.trailing_slash_redirect(request) {
            Some(location) => Ok(WebResponse::moved_permanently(location)),
            None => self
                .dispatch(request, &mut response)
                .and_then(|handled| match handled {
                    Handled::Committed => Ok(response),
                    Handled::View(view) => self.render(request, view),
                }),
        };
        let response = match result {
            Ok(response) => response,
            Err(err) => self.error_response(request, &err),
        };

        info!(
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
            status = response.status,
            latency_ms = started.elapsed().as_millis() as u64,
            "Request complete"
        );
        response
    }

    /// Location without the trailing slash for a `GET` or `HEAD` on a
    /// non-root path that resolves once the slash is dropped. Relative links
    /// in the rendered page (form actions) then resolve against the parent
    /// directory as they would for the canonical path.
    fn trailing_slash_redirect(&self, request: &WebRequest) -> Option<String> {
        if !matches!(request.method, Method::GET | Method::HEAD) {
            return None;
        }
        let trimmed = request.path.strip_suffix('/').filter(|p| !p.is_empty())?;
        self.registry.lookup(&request.method, trimmed).ok()?;

        let mut location = trimmed.to_string();
        if !request.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(request.params.iter().map(|(k, v)| (&**k, v.as_str())))
                .finish();
            location.push('?');
            location.push_str(&query);
        }
        debug!(
            request_id = %request.request_id,
            path = %request.path,
            location = %location,
            "Dropping trailing slash"
        );
        Some(location)
    }

    /// Step 4: turn a [`ViewResult`] into a response.
    fn render(&self, request: &WebRequest, view: ViewResult) -> Result<WebResponse, DispatchError> {
        match view {
            ViewResult::Render { view, model } => {
                let body = self
                    .renderer
                    .render(&view, &model)
                    .map_err(ProcessingError::from)?;
                Ok(WebResponse::html(200, body))
            }
            ViewResult::Redirect(redirect) => {
                let location = redirect.location();
                debug!(
                    request_id = %request.request_id,
                    location = %location,
                    "Redirecting"
                );
                Ok(WebResponse::redirect(location))
            }
            ViewResult::Json { status, body } => Ok(WebResponse::json(status, &body)),
        }
    }

    fn wants_json(&self, request: &WebRequest) -> bool {
        request.accepts_json()
            || self
                .json_error_prefixes
                .iter()
                .any(|p| request.path.starts_with(p.as_str()))
    }

    /// The error boundary: map any failure to a status code and body.
    fn error_response(&self, request: &WebRequest, err: &DispatchError) -> WebResponse {
        let status = err.status();
        let code = err.code();
        let message = if status >= 500 {
            error!(
                request_id = %request.request_id,
                method = %request.method,
                path = %request.path,
                status,
                code,
                error = %err,
                "Request failed"
            );
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            warn!(
                request_id = %request.request_id,
                method = %request.method,
                path = %request.path,
                status,
                code,
                error = %err,
                "Request rejected"
            );
            err.to_string()
        };

        if self.wants_json(request) {
            return WebResponse::json(status, &json!({ "code": code, "message": message }));
        }

        let model = ModelMap::new()
            .with("status", status)
            .with("code", code)
            .with("message", message.as_str());
        match self.renderer.render(&self.error_view, &model) {
            Ok(body) => WebResponse::html(status, body),
            Err(render_err) => {
                warn!(
                    request_id = %request.request_id,
                    error_view = %self.error_view,
                    error = %render_err,
                    "Error view unavailable, falling back to plain text"
                );
                WebResponse::text(status, format!("{status} {code}: {message}"))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
