//! # Handler Module
//!
//! A [`Handler`] is the unit of per-route business logic. Handlers come in a
//! closed set of call styles, each a variant of the enum:
//!
//! | Variant | Receives | Returns |
//! |---|---|---|
//! | [`Handler::Raw`] | the whole [`Exchange`] | writes the response itself |
//! | [`Handler::Params`] | [`ParamMap`] | [`ViewResult`] |
//! | [`Handler::ParamsAndModel`] | [`ParamMap`] + `&mut` [`ModelMap`] | view name |
//! | [`Handler::StaticView`] | nothing | fixed view name |
//!
//! Controllers implement one of the traits below, or are plain closures with
//! the matching signature:
//!
//! ```rust,ignore
//! use frontctl::handler::Handler;
//! use frontctl::model::{ModelMap, ParamMap};
//!
//! let form = Handler::params_and_model(
//!     |_: &ParamMap, _: &mut ModelMap| Ok::<_, ProcessingError>("new-form".to_string()),
//! );
//! ```
//!
//! Handlers may hold shared collaborators such as a store behind an `Arc`;
//! those collaborators own their concurrency discipline.

use crate::dispatcher::Exchange;
use crate::error::ProcessingError;
use crate::model::{ModelMap, ParamMap};
use crate::view::ViewResult;
use std::fmt;

/// Full control over the exchange; used for legacy-style controllers.
pub trait RawController: Send + Sync {
    fn process(&self, exchange: &mut Exchange<'_>) -> Result<(), ProcessingError>;
}

/// Parameters in, view result out.
pub trait ParamController: Send + Sync {
    fn process(&self, params: &ParamMap) -> Result<ViewResult, ProcessingError>;
}

/// Parameters and a caller-owned model in, view name out.
///
/// The handler must not expect any attribute to be present in `model` on entry.
pub trait ModelController: Send + Sync {
    fn process(&self, params: &ParamMap, model: &mut ModelMap)
        -> Result<String, ProcessingError>;
}

impl<F> RawController for F
where
    F: Fn(&mut Exchange<'_>) -> Result<(), ProcessingError> + Send + Sync,
{
    fn process(&self, exchange: &mut Exchange<'_>) -> Result<(), ProcessingError> {
        self(exchange)
    }
}

impl<F> ParamController for F
where
    F: Fn(&ParamMap) -> Result<ViewResult, ProcessingError> + Send + Sync,
{
    fn process(&self, params: &ParamMap) -> Result<ViewResult, ProcessingError> {
        self(params)
    }
}

impl<F> ModelController for F
where
    F: Fn(&ParamMap, &mut ModelMap) -> Result<String, ProcessingError> + Send + Sync,
{
    fn process(
        &self,
        params: &ParamMap,
        model: &mut ModelMap,
    ) -> Result<String, ProcessingError> {
        self(params, model)
    }
}

/// Discriminant of a [`Handler`], used for logging and adapter errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Raw,
    Params,
    ParamsAndModel,
    StaticView,
}

impl HandlerKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HandlerKind::Raw => "raw",
            HandlerKind::Params => "params",
            HandlerKind::ParamsAndModel => "params_and_model",
            HandlerKind::StaticView => "static_view",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered unit of business logic.
pub enum Handler {
    Raw(Box<dyn RawController>),
    Params(Box<dyn ParamController>),
    ParamsAndModel(Box<dyn ModelController>),
    /// Always renders this view with an empty model.
    StaticView(String),
}

impl Handler {
    pub fn raw<C: RawController + 'static>(controller: C) -> Self {
        Handler::Raw(Box::new(controller))
    }

    pub fn params<C: ParamController + 'static>(controller: C) -> Self {
        Handler::Params(Box::new(controller))
    }

    pub fn params_and_model<C: ModelController + 'static>(controller: C) -> Self {
        Handler::ParamsAndModel(Box::new(controller))
    }

    pub fn static_view(view: impl Into<String>) -> Self {
        Handler::StaticView(view.into())
    }

    #[must_use]
    pub fn kind(&self) -> HandlerKind {
        match self {
            Handler::Raw(_) => HandlerKind::Raw,
            Handler::Params(_) => HandlerKind::Params,
            Handler::ParamsAndModel(_) => HandlerKind::ParamsAndModel,
            Handler::StaticView(_) => HandlerKind::StaticView,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::StaticView(view) => f.debug_tuple("StaticView").field(view).finish(),
            other => f.debug_tuple("Handler").field(&other.kind()).finish(),
        }
    }
}
