use super::request::parse_request;
use super::response::write_response;
use crate::dispatcher::{Dispatcher, WebResponse};
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::warn;

/// Path answered by [`health_endpoint`] without going through the dispatcher.
pub const HEALTH_PATH: &str = "/health";

/// `may_minihttp` service that feeds every request to the [`Dispatcher`].
///
/// Cloned once per connection; clones share the dispatcher.
#[derive(Clone, Debug)]
pub struct AppService {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_response(res, WebResponse::json(200, &json!({ "status": "ok" })));
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let request = match parse_request(req) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejecting unparseable request");
                write_response(
                    res,
                    WebResponse::json(400, &json!({ "code": "BAD", "message": e.to_string() })),
                );
                return Ok(());
            }
        };

        if request.method == http::Method::GET && request.path == HEALTH_PATH {
            return health_endpoint(res);
        }

        let response = self.dispatcher.serve(&request);
        write_response(res, response);
        Ok(())
    }
}
