use crate::dispatcher::WebResponse;
use dashmap::DashMap;
use may_minihttp::Response;
use std::sync::OnceLock;
use tracing::warn;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "OK",
    }
}

/// `may_minihttp` only takes `&'static str` header lines. Lines for values
/// that are not known up front are leaked once and reused afterwards, up to
/// [`MAX_LEAKED_HEADER_LINES`] distinct lines per process.
static HEADER_LINES: OnceLock<DashMap<String, &'static str>> = OnceLock::new();

/// Bound on the leaked header-line cache. Once reached, responses needing a
/// new line are replaced with a 500.
pub const MAX_LEAKED_HEADER_LINES: usize = 4096;

fn header_line(name: &str, value: &str) -> Option<&'static str> {
    if name.eq_ignore_ascii_case("content-type") {
        match value {
            "text/html; charset=utf-8" => return Some("Content-Type: text/html; charset=utf-8"),
            "text/plain; charset=utf-8" => return Some("Content-Type: text/plain; charset=utf-8"),
            "application/json" => return Some("Content-Type: application/json"),
            _ => {}
        }
    }
    let line = format!("{}: {value}", canonical_name(name));
    cached_line(
        HEADER_LINES.get_or_init(DashMap::new),
        MAX_LEAKED_HEADER_LINES,
        line,
    )
}

/// Look `line` up in `cache`, leaking it on first use. `None` when the line
/// is new and the cache already holds `cap` entries.
fn cached_line(
    cache: &DashMap<String, &'static str>,
    cap: usize,
    line: String,
) -> Option<&'static str> {
    if let Some(existing) = cache.get(&line) {
        return Some(*existing);
    }
    if cache.len() >= cap {
        return None;
    }
    Some(
        *cache
            .entry(line.clone())
            .or_insert_with(|| Box::leak(line.into_boxed_str())),
    )
}

/// `content-type` → `Content-Type`
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Write a dispatcher response to the wire.
pub fn write_response(res: &mut Response, response: WebResponse) {
    let mut lines = Vec::with_capacity(response.headers.len());
    for (name, value) in &response.headers {
        match header_line(name, value) {
            Some(line) => lines.push(line),
            None => {
                warn!(
                    header = %name,
                    cap = MAX_LEAKED_HEADER_LINES,
                    "header line cache full, answering 500"
                );
                res.status_code(500, status_reason(500));
                res.header("Content-Type: text/plain; charset=utf-8");
                res.body_vec(b"internal error".to_vec());
                return;
            }
        }
    }
    res.status_code(usize::from(response.status), status_reason(response.status));
    for line in lines {
        res.header(line);
    }
    res.body_vec(response.body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(302), "Found");
        assert_eq!(status_reason(404), "Not Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
    }

    #[test]
    fn test_header_lines() {
        assert_eq!(
            header_line("content-type", "application/json"),
            Some("Content-Type: application/json")
        );
        let a = header_line("location", "/validation/v1/items/1?status=true").unwrap();
        let b = header_line("location", "/validation/v1/items/1?status=true").unwrap();
        assert_eq!(a, "Location: /validation/v1/items/1?status=true");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_header_line_cache_is_bounded() {
        let cache = DashMap::new();
        let cap = 8;
        let served = (0..100)
            .filter_map(|i| cached_line(&cache, cap, format!("Location: /members/{i}")))
            .count();
        assert_eq!(served, cap);
        assert_eq!(cache.len(), cap);

        // lines already cached keep being served after the cap is reached
        let again = cached_line(&cache, cap, "Location: /members/3".to_string()).unwrap();
        assert_eq!(again, "Location: /members/3");
        assert!(cached_line(&cache, cap, "Location: /members/200".to_string()).is_none());
        assert_eq!(cache.len(), cap);
    }

    #[test]
    fn test_canonical_name() {
        assert_eq!(canonical_name("x-request-id"), "X-Request-Id");
    }
}
