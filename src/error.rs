//! Error taxonomy for registration, dispatch, handler processing and rendering.
//!
//! Only [`Dispatcher::serve`](crate::dispatcher::Dispatcher::serve) turns these
//! into responses; every other layer returns them unchanged.

use thiserror::Error;

/// Startup-time routing table errors. Always fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("path already bound: {method} {pattern}")]
    DuplicatePath { method: String, pattern: String },

    #[error("invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Failures raised by handler business logic.
///
/// Expected bad input (a form that fails validation) is *not* one of these;
/// handlers report it as a normal view with an `errors` model entry.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// Caller supplied an argument the handler cannot work with.
    #[error("{0}")]
    BadRequest(String),

    /// Domain-level rejection that is reported back to the user.
    #[error("{0}")]
    User(String),

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("model attribute could not be serialized: {0}")]
    Model(#[from] serde_json::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Unexpected fault, including a panicking handler.
    #[error("{0}")]
    Internal(String),
}

impl ProcessingError {
    /// HTTP status the error boundary answers with.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ProcessingError::BadRequest(_) | ProcessingError::User(_) => 400,
            ProcessingError::NotFound(_) => 404,
            ProcessingError::Model(_)
            | ProcessingError::Render(_)
            | ProcessingError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ProcessingError::BadRequest(_) => "BAD",
            ProcessingError::User(_) => "USER-EX",
            ProcessingError::NotFound(_) => "NOT-FOUND",
            ProcessingError::Model(_)
            | ProcessingError::Render(_)
            | ProcessingError::Internal(_) => "EX",
        }
    }
}

/// Everything that can end a dispatch before a view is produced.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no handler bound to {method} {path}")]
    NotFound { method: String, path: String },

    #[error("{method} not allowed for {path}")]
    MethodNotAllowed { method: String, path: String },

    /// No registered adapter supports the handler. A wiring bug.
    #[error("no adapter supports handler of kind {kind}")]
    NoAdapter { kind: &'static str },

    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl DispatchError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound { .. } => 404,
            DispatchError::MethodNotAllowed { .. } => 405,
            DispatchError::NoAdapter { .. } => 500,
            DispatchError::Processing(e) => e.status(),
        }
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NotFound { .. } => "NOT-FOUND",
            DispatchError::MethodNotAllowed { .. } => "METHOD-NOT-ALLOWED",
            DispatchError::NoAdapter { .. } => "EX",
            DispatchError::Processing(e) => e.code(),
        }
    }
}

/// View rendering failures. The renderer never falls back silently.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view name is empty")]
    EmptyViewName,

    #[error("no template for view '{view}' at {path}")]
    TemplateNotFound { view: String, path: String },

    #[error("template error in view '{view}': {message}")]
    Template { view: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_status_and_codes() {
        assert_eq!(ProcessingError::BadRequest("x".into()).status(), 400);
        assert_eq!(ProcessingError::BadRequest("x".into()).code(), "BAD");
        assert_eq!(ProcessingError::User("x".into()).code(), "USER-EX");
        assert_eq!(ProcessingError::NotFound("x".into()).status(), 404);
        assert_eq!(ProcessingError::Internal("x".into()).status(), 500);
        assert_eq!(
            ProcessingError::Render(RenderError::EmptyViewName).code(),
            "EX"
        );
    }

    #[test]
    fn test_dispatch_status() {
        let nf = DispatchError::NotFound {
            method: "GET".into(),
            path: "/unknown".into(),
        };
        assert_eq!(nf.status(), 404);
        assert_eq!(DispatchError::NoAdapter { kind: "raw" }.status(), 500);
        let wrapped: DispatchError = ProcessingError::User("no".into()).into();
        assert_eq!(wrapped.status(), 400);
        assert_eq!(wrapped.to_string(), "no");
    }
}
