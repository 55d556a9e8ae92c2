//! Member list, form and save, once per handler style.
//!
//! The three styles render the same views so they can be compared side by
//! side: `v1` drives the exchange itself, `v3` returns a [`ViewResult`] from
//! parameters alone, `v4` fills a caller-owned model and returns a view name.

use crate::dispatcher::Exchange;
use crate::domain::{Member, MemberRepository};
use crate::error::ProcessingError;
use crate::handler::Handler;
use crate::model::{ModelMap, ParamMap};
use crate::view::ViewResult;
use std::sync::Arc;
use tracing::info;

pub const V1_BASE: &str = "/front-controller/v1/members";
pub const V3_BASE: &str = "/front-controller/v3/members";
pub const V4_BASE: &str = "/front-controller/v4/members";

pub const MEMBERS_VIEW: &str = "members";
pub const NEW_FORM_VIEW: &str = "new-form";
pub const SAVE_RESULT_VIEW: &str = "save-result";

/// Read `username` and `age` from a submitted form.
fn member_from(params: &ParamMap) -> Result<Member, ProcessingError> {
    let username = params
        .get_non_blank("username")
        .ok_or_else(|| ProcessingError::BadRequest("username is required".to_string()))?;
    let age = params
        .parse::<u32>("age")?
        .ok_or_else(|| ProcessingError::BadRequest("age is required".to_string()))?;
    Ok(Member::new(username, age))
}

fn save(repo: &MemberRepository, params: &ParamMap) -> Result<Member, ProcessingError> {
    let member = repo.save(member_from(params)?);
    info!(member_id = member.id, username = %member.username, "Member joined");
    Ok(member)
}

// v1: raw controllers

pub fn list_v1(repo: Arc<MemberRepository>) -> Handler {
    Handler::raw(move |exchange: &mut Exchange<'_>| {
        let mut model = ModelMap::new();
        model.add_attribute("members", &repo.find_all())?;
        exchange.render(MEMBERS_VIEW, &model)
    })
}

pub fn new_form_v1() -> Handler {
    Handler::raw(|exchange: &mut Exchange<'_>| exchange.render(NEW_FORM_VIEW, &ModelMap::new()))
}

pub fn save_v1(repo: Arc<MemberRepository>) -> Handler {
    Handler::raw(move |exchange: &mut Exchange<'_>| {
        let member = save(&repo, &exchange.params())?;
        let mut model = ModelMap::new();
        model.add_attribute("member", &member)?;
        exchange.render(SAVE_RESULT_VIEW, &model)
    })
}

// v3: parameters in, view result out

pub fn new_form_v3() -> Handler {
    Handler::params(|_: &ParamMap| Ok::<_, ProcessingError>(ViewResult::view(NEW_FORM_VIEW)))
}

pub fn save_v3(repo: Arc<MemberRepository>) -> Handler {
    Handler::params(move |params: &ParamMap| {
        let member = save(&repo, params)?;
        let mut model = ModelMap::new();
        model.add_attribute("member", &member)?;
        Ok::<_, ProcessingError>(ViewResult::render(SAVE_RESULT_VIEW, model))
    })
}

pub fn list_v3(repo: Arc<MemberRepository>) -> Handler {
    Handler::params(move |_: &ParamMap| {
        let mut model = ModelMap::new();
        model.add_attribute("members", &repo.find_all())?;
        Ok::<_, ProcessingError>(ViewResult::render(MEMBERS_VIEW, model))
    })
}

// v4: parameters and model in, view name out

pub fn new_form_v4() -> Handler {
    Handler::params_and_model(|_: &ParamMap, _: &mut ModelMap| {
        Ok::<_, ProcessingError>(NEW_FORM_VIEW.to_string())
    })
}

pub fn save_v4(repo: Arc<MemberRepository>) -> Handler {
    Handler::params_and_model(move |params: &ParamMap, model: &mut ModelMap| {
        let member = save(&repo, params)?;
        model.add_attribute("member", &member)?;
        Ok::<_, ProcessingError>(SAVE_RESULT_VIEW.to_string())
    })
}

pub fn list_v4(repo: Arc<MemberRepository>) -> Handler {
    Handler::params_and_model(move |_: &ParamMap, model: &mut ModelMap| {
        model.add_attribute("members", &repo.find_all())?;
        Ok::<_, ProcessingError>(MEMBERS_VIEW.to_string())
    })
}
