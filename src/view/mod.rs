//! # View Module
//!
//! Handlers finish by producing a [`ViewResult`]: a logical view plus its
//! model, an explicit [`Redirect`], or a JSON body. The dispatcher hands
//! `Render` results to a [`ViewRenderer`]; the stock implementation is
//! [`TemplateRenderer`], which resolves view names against a template
//! directory and renders them with `minijinja`.
//!
//! ```rust,ignore
//! use frontctl::view::{Redirect, ViewResult};
//!
//! // Re-render the form
//! let again = ViewResult::render("validation/v1/addForm", model);
//!
//! // Post/redirect/get
//! let done: ViewResult = Redirect::to("/validation/v1/items/{itemId}")
//!     .attribute("itemId", saved.id)
//!     .attribute("status", true)
//!     .into();
//! ```

mod renderer;
mod result;

pub use renderer::{TemplateRenderer, ViewRenderer};
pub use result::{Redirect, ViewResult};
