use crate::dispatcher::ParamVec;
use crate::error::{DispatchError, RegistryError};
use crate::handler::Handler;
use http::Method;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a successful [`HandlerRegistry::lookup`].
#[derive(Debug, Clone)]
pub struct HandlerMatch {
    pub handler: Arc<Handler>,
    /// The pattern the handler was registered under, e.g. `/items/{itemId}`
    pub pattern: Arc<str>,
    /// Variables captured from a templated pattern, percent-decoded
    pub path_params: ParamVec,
}

/// One row of the routing table, as listed by [`HandlerRegistry::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// `None` means the binding accepts every method.
    pub method: Option<Method>,
    pub pattern: Arc<str>,
    pub kind: &'static str,
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method.as_ref().map_or("*", Method::as_str);
        write!(f, "{method:<7} {:<40} {}", self.pattern, self.kind)
    }
}

enum Matcher {
    Exact,
    Template {
        regex: Regex,
        param_names: Vec<Arc<str>>,
    },
}

struct Binding {
    method: Option<Method>,
    pattern: Arc<str>,
    matcher: Matcher,
    handler: Arc<Handler>,
}

impl Binding {
    fn accepts(&self, method: &Method) -> bool {
        self.method.as_ref().map_or(true, |m| m == method)
    }
}

/// Path → handler table, built once at startup.
///
/// Lookup order:
/// 1. exact paths before templated ones,
/// 2. method-specific bindings before any-method bindings,
/// 3. templated paths in registration order.
///
/// A trailing slash is ignored everywhere except on the root path.
#[derive(Default)]
pub struct HandlerRegistry {
    bindings: Vec<Binding>,
    /// Normalized exact path → indices into `bindings`
    exact: HashMap<String, Vec<usize>>,
    /// Indices of templated bindings, in registration order
    templated: Vec<usize>,
    /// `(method, shape)` pairs already bound; `shape` has variable names erased
    bound: HashSet<(Option<Method>, String)>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `path` for every method.
    pub fn register(&mut self, path: &str, handler: Handler) -> Result<(), RegistryError> {
        self.insert(None, path, handler)
    }

    /// Bind `handler` to `path` for `method` only.
    pub fn register_route(
        &mut self,
        method: Method,
        path: &str,
        handler: Handler,
    ) -> Result<(), RegistryError> {
        self.insert(Some(method), path, handler)
    }

    fn insert(
        &mut self,
        method: Option<Method>,
        path: &str,
        handler: Handler,
    ) -> Result<(), RegistryError> {
        let pattern = normalize(path);
        let parsed = parse_pattern(pattern)?;

        if !self.bound.insert((method.clone(), parsed.shape)) {
            return Err(RegistryError::DuplicatePath {
                method: method.as_ref().map_or("*", Method::as_str).to_string(),
                pattern: pattern.to_string(),
            });
        }

        let kind = handler.kind();
        let idx = self.bindings.len();
        let matcher = if parsed.param_names.is_empty() {
            self.exact.entry(pattern.to_string()).or_default().push(idx);
            Matcher::Exact
        } else {
            self.templated.push(idx);
            Matcher::Template {
                regex: parsed.regex,
                param_names: parsed.param_names,
            }
        };
        self.bindings.push(Binding {
            method: method.clone(),
            pattern: Arc::from(pattern),
            matcher,
            handler: Arc::new(handler),
        });

        info!(
            method = method.as_ref().map_or("*", Method::as_str),
            pattern = %pattern,
            handler_kind = %kind,
            "Handler registered"
        );
        Ok(())
    }

    /// Find the handler for `method` + `path`.
    ///
    /// Returns [`DispatchError::MethodNotAllowed`] when some binding matches
    /// the path but none accepts the method.
    pub fn lookup(&self, method: &Method, path: &str) -> Result<HandlerMatch, DispatchError> {
        let path = normalize(path);
        let mut path_known = false;

        if let Some(indices) = self.exact.get(path) {
            path_known = true;
            if let Some(binding) = self.pick(indices, method) {
                return Ok(matched(binding, ParamVec::new()));
            }
        }

        let mut any_method: Option<(&Binding, ParamVec)> = None;
        for &idx in &self.templated {
            let binding = &self.bindings[idx];
            let Matcher::Template { regex, param_names } = &binding.matcher else {
                continue;
            };
            let Some(caps) = regex.captures(path) else {
                continue;
            };
            path_known = true;
            if !binding.accepts(method) {
                continue;
            }
            let params: ParamVec = param_names
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (Arc::clone(name), decode(m.as_str()))))
                .collect();
            if binding.method.is_some() {
                return Ok(matched(binding, params));
            }
            if any_method.is_none() {
                any_method = Some((binding, params));
            }
        }
        if let Some((binding, params)) = any_method {
            return Ok(matched(binding, params));
        }

        debug!(method = %method, path = %path, path_known, "No handler matched");
        if path_known {
            Err(DispatchError::MethodNotAllowed {
                method: method.to_string(),
                path: path.to_string(),
            })
        } else {
            Err(DispatchError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
        }
    }

    /// Method-specific binding first, then the any-method one.
    fn pick(&self, indices: &[usize], method: &Method) -> Option<&Binding> {
        let candidates = || indices.iter().map(|&i| &self.bindings[i]);
        candidates()
            .find(|b| b.method.as_ref() == Some(method))
            .or_else(|| candidates().find(|b| b.method.is_none()))
    }

    /// All bindings in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.bindings
            .iter()
            .map(|b| RouteInfo {
                method: b.method.clone(),
                pattern: Arc::clone(&b.pattern),
                kind: b.handler.kind().as_str(),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("routes", &self.routes())
            .finish()
    }
}

fn matched(binding: &Binding, path_params: ParamVec) -> HandlerMatch {
    HandlerMatch {
        handler: Arc::clone(&binding.handler),
        pattern: Arc::clone(&binding.pattern),
        path_params,
    }
}

/// Strip one trailing slash, except from the root path.
fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

struct ParsedPattern {
    regex: Regex,
    param_names: Vec<Arc<str>>,
    /// Pattern with every variable replaced by `{}`
    shape: String,
}

/// Compile a `/items/{itemId}` style pattern.
///
/// A segment is either literal text or exactly one `{name}` variable where
/// `name` is an identifier. Variable names must be unique per pattern.
fn parse_pattern(pattern: &str) -> Result<ParsedPattern, RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    };
    if !pattern.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }

    let mut regex_src = String::with_capacity(pattern.len() + 8);
    regex_src.push('^');
    let mut shape = String::with_capacity(pattern.len());
    let mut param_names: Vec<Arc<str>> = Vec::new();

    for segment in pattern.split('/').skip(1) {
        if segment.is_empty() && pattern != "/" {
            return Err(invalid("empty path segment"));
        }
        shape.push('/');
        regex_src.push('/');
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            if !is_identifier(name) {
                return Err(invalid("variable name must be an identifier"));
            }
            if param_names.iter().any(|n| &**n == name) {
                return Err(invalid("variable name used twice"));
            }
            param_names.push(Arc::from(name));
            regex_src.push_str("([^/]+)");
            shape.push_str("{}");
        } else if segment.contains(['{', '}']) {
            return Err(invalid("variables must span a whole segment"));
        } else {
            regex_src.push_str(&regex::escape(segment));
            shape.push_str(segment);
        }
    }
    regex_src.push('$');

    let regex = Regex::new(&regex_src).map_err(|e| invalid(&e.to_string()))?;
    Ok(ParsedPattern {
        regex,
        param_names,
        shape,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Percent-decode a captured path segment. Invalid escapes are kept verbatim.
fn decode(segment: &str) -> String {
    if !segment.contains('%') {
        return segment.to_string();
    }
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}
