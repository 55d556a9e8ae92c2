//! Transport-neutral request/response types and the per-invocation exchange.

use crate::error::ProcessingError;
use crate::ids::RequestId;
use crate::model::{ModelMap, ParamMap};
use crate::view::ViewRenderer;
use http::Method;
use serde_json::Value;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::Arc;

/// Parameters kept inline before spilling to the heap.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Headers kept inline before spilling to the heap.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Ordered `(name, value)` parameter pairs. Duplicates are preserved.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Ordered `(name, value)` header pairs.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// An inbound request as the dispatcher sees it.
#[derive(Debug, Clone)]
pub struct WebRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Path without query string
    pub path: String,
    /// Query string parameters followed by form body parameters, in arrival order
    pub params: ParamVec,
    /// Header names are stored lowercase
    pub headers: HeaderVec,
}

impl WebRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            params: ParamVec::new(),
            headers: HeaderVec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((Arc::from(name), value.into()));
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers
            .push((Arc::from(name.to_ascii_lowercase()), value.into()));
        self
    }

    /// First value of a parameter.
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn accepts_json(&self) -> bool {
        self.header("accept")
            .is_some_and(|a| a.contains("application/json"))
    }
}

/// An outbound response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResponse {
    pub status: u16,
    pub headers: HeaderVec,
    pub body: Vec<u8>,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self::new(200)
    }
}

impl WebResponse {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderVec::new(),
            body: Vec::new(),
        }
    }

    #[must_use]
    pub fn html(status: u16, body: String) -> Self {
        let mut res = Self::new(status);
        res.set_header("content-type", "text/html; charset=utf-8".to_string());
        res.body = body.into_bytes();
        res
    }

    #[must_use]
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut res = Self::new(status);
        res.set_header("content-type", "text/plain; charset=utf-8".to_string());
        res.body = body.into().into_bytes();
        res
    }

    #[must_use]
    pub fn json(status: u16, body: &Value) -> Self {
        let mut res = Self::new(status);
        res.set_header("content-type", "application/json".to_string());
        res.body = serde_json::to_vec(body).unwrap_or_default();
        res
    }

    /// `302 Found` pointing at `location`.
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        let mut res = Self::new(302);
        res.set_header("location", location.into());
        res
    }

    /// `301 Moved Permanently` pointing at `location`.
    #[must_use]
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        let mut res = Self::new(301);
        res.set_header("location", location.into());
        res
    }

    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    #[must_use]
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Everything a handler invocation can touch.
///
/// Param-style adapters only read from it; raw handlers write the response
/// directly and may render a view through [`Exchange::render`].
pub struct Exchange<'a> {
    pub request: &'a WebRequest,
    /// Variables captured from a templated route, e.g. `itemId` in `/items/{itemId}`
    pub path_params: &'a ParamVec,
    pub response: &'a mut WebResponse,
    pub views: &'a dyn ViewRenderer,
}

impl Exchange<'_> {
    /// Normalized parameters for this invocation.
    #[must_use]
    pub fn params(&self) -> ParamMap {
        ParamMap::extract(self.request, self.path_params)
    }

    /// Render `view` with `model` into the response as `200 text/html`.
    pub fn render(&mut self, view: &str, model: &ModelMap) -> Result<(), ProcessingError> {
        let rendered = self.views.render(view, model)?;
        *self.response = WebResponse::html(200, rendered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = WebRequest::new(Method::GET, "/").with_header("Accept", "application/json");
        assert_eq!(req.header("ACCEPT"), Some("application/json"));
        assert!(req.accepts_json());
    }

    #[test]
    fn test_set_header_replaces() {
        let mut res = WebResponse::text(200, "hi");
        res.set_header("Content-Type", "text/csv".to_string());
        assert_eq!(res.get_header("content-type"), Some("text/csv"));
        assert_eq!(res.headers.len(), 1);
    }

    #[test]
    fn test_redirect_sets_location() {
        let res = WebResponse::redirect("/items/1");
        assert_eq!(res.status, 302);
        assert_eq!(res.get_header("location"), Some("/items/1"));
        assert!(res.body.is_empty());
    }
}
