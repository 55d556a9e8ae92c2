use crate::dispatcher::{HeaderVec, ParamVec, WebRequest};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use http::Method;
use may_minihttp::Request;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{debug, info};

/// Content type whose body is decoded into request parameters.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Convert a `may_minihttp` request into a transport-neutral [`WebRequest`].
///
/// # Errors
///
/// Returns `InvalidInput` when the method token is not a valid HTTP method,
/// or any I/O error raised while reading the body.
pub fn parse_request(req: Request) -> io::Result<WebRequest> {
    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let mut body = Vec::new();
    req.body().read_to_end(&mut body)?;

    build_request(req.method(), req.path(), headers, &body)
}

/// Assemble a [`WebRequest`] from already-extracted parts.
///
/// `raw_path` may carry a query string. Query parameters come first in the
/// parameter list, followed by form body parameters when the content type is
/// [`FORM_CONTENT_TYPE`].
pub fn build_request(
    method: &str,
    raw_path: &str,
    headers: HeaderVec,
    body: &[u8],
) -> io::Result<WebRequest> {
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let (path, query) = match raw_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (raw_path, None),
    };

    let mut params = ParamVec::new();
    if let Some(query) = query {
        params.extend(decode_pairs(query.as_bytes()));
    }
    let query_count = params.len();

    let content_type = header_value(&headers, "content-type").unwrap_or("");
    if !body.is_empty() && is_form(content_type) {
        params.extend(decode_pairs(body));
        debug!(
            body_size_bytes = body.len(),
            form_param_count = params.len() - query_count,
            "Form body decoded"
        );
    }

    let request_id = RequestId::from_header_or_new(header_value(&headers, REQUEST_ID_HEADER));
    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query_param_count = query_count,
        param_count = params.len(),
        headers_count = headers.len(),
        "HTTP request parsed"
    );

    Ok(WebRequest {
        request_id,
        method,
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        params,
        headers,
    })
}

fn decode_pairs(input: &[u8]) -> impl Iterator<Item = (Arc<str>, String)> + '_ {
    url::form_urlencoded::parse(input).map(|(k, v)| (Arc::from(k.as_ref()), v.into_owned()))
}

fn header_value<'a>(headers: &'a HeaderVec, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

fn is_form(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderVec {
        pairs
            .iter()
            .map(|(k, v)| (Arc::from(*k), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_query_params_decoded() {
        let req = build_request("GET", "/members?name=Alice%20B&age=30", HeaderVec::new(), b"")
            .unwrap();
        assert_eq!(req.path, "/members");
        assert_eq!(req.param("name"), Some("Alice B"));
        assert_eq!(req.param("age"), Some("30"));
    }

    #[test]
    fn test_form_body_follows_query() {
        let h = headers(&[("content-type", "application/x-www-form-urlencoded; charset=UTF-8")]);
        let req = build_request("POST", "/save?username=q", h, b"username=form&age=20+1").unwrap();
        let names: Vec<_> = req.params.iter().map(|(k, v)| (&**k, v.as_str())).collect();
        assert_eq!(
            names,
            vec![("username", "q"), ("username", "form"), ("age", "20 1")]
        );
    }

    #[test]
    fn test_non_form_body_ignored() {
        let h = headers(&[("content-type", "application/json")]);
        let req = build_request("POST", "/save", h, br#"{"a":1}"#).unwrap();
        assert!(req.params.is_empty());
    }

    #[test]
    fn test_request_id_header_honoured() {
        let id = RequestId::new().to_string();
        let h = headers(&[("x-request-id", id.as_str())]);
        let req = build_request("GET", "/", h, b"").unwrap();
        assert_eq!(req.request_id.to_string(), id);
    }

    #[test]
    fn test_invalid_method_rejected() {
        let err = build_request("BAD METHOD", "/", HeaderVec::new(), b"").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
