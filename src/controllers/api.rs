//! JSON endpoint whose failures are mapped to `{code, message}` bodies by
//! the dispatcher's error boundary.

use crate::error::ProcessingError;
use crate::handler::Handler;
use crate::model::ParamMap;
use crate::view::ViewResult;
use serde::Serialize;

pub const MEMBER_PATH: &str = "/api2/members/{id}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub member_id: String,
    pub name: String,
}

/// Look up a member by id. A few ids fail on purpose:
///
/// | id | outcome |
/// |---|---|
/// | `ex` | 500 `EX` |
/// | `bad` | 400 `BAD` |
/// | `user-ex` | 400 `USER-EX` |
pub fn get_member(id: &str) -> Result<MemberDto, ProcessingError> {
    match id {
        "ex" => Err(ProcessingError::Internal("invalid user".to_string())),
        "bad" => Err(ProcessingError::BadRequest("invalid input value".to_string())),
        "user-ex" => Err(ProcessingError::User("user error".to_string())),
        _ => Ok(MemberDto {
            member_id: id.to_string(),
            name: format!("hello {id}"),
        }),
    }
}

/// `GET /api2/members/{id}`
pub fn member() -> Handler {
    Handler::params(|params: &ParamMap| {
        let id = params
            .get("id")
            .ok_or_else(|| ProcessingError::BadRequest("id is required".to_string()))?;
        let body = serde_json::to_value(get_member(id)?)?;
        Ok::<_, ProcessingError>(ViewResult::json(200, body))
    })
}
