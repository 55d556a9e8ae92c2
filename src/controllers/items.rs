//! Item registration with hand-rolled form validation.
//!
//! A submission that fails validation is not an error: the form view is
//! rendered again with the submitted `item` and an `errors` map keyed by
//! field name (`globalError` for rules spanning several fields). A valid
//! submission is saved and answered with post/redirect/get.

use crate::domain::{Item, ItemRepository};
use crate::error::ProcessingError;
use crate::handler::Handler;
use crate::model::{ModelMap, ParamMap};
use crate::view::{Redirect, ViewResult};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, info};

pub const BASE: &str = "/validation/v1/items";

pub const ITEMS_VIEW: &str = "validation/v1/items";
pub const ITEM_VIEW: &str = "validation/v1/item";
pub const ADD_FORM_VIEW: &str = "validation/v1/addForm";

pub const PRICE_RANGE: RangeInclusive<i64> = 1_000..=1_000_000;
pub const MAX_QUANTITY: i64 = 9_999;
pub const MIN_TOTAL: i64 = 10_000;

/// Key for errors that belong to no single field.
pub const GLOBAL_ERROR: &str = "globalError";

pub type FieldErrors = BTreeMap<String, String>;

/// Bind the form to an [`Item`]. Numbers that do not parse are reported as
/// field errors rather than rejected outright.
pub fn bind_item(params: &ParamMap) -> (Item, FieldErrors) {
    let mut errors = FieldErrors::new();
    let mut number = |field: &str| match params.parse::<i64>(field) {
        Ok(value) => value,
        Err(_) => {
            errors.insert(field.to_string(), format!("{field} must be a whole number."));
            None
        }
    };
    let price = number("price");
    let quantity = number("quantity");
    let item = Item {
        id: 0,
        item_name: params.get("itemName").unwrap_or_default().to_string(),
        price,
        quantity,
    };
    (item, errors)
}

/// Apply the registration rules, adding to `errors`.
pub fn validate_item(item: &Item, errors: &mut FieldErrors) {
    if item.item_name.trim().is_empty() {
        errors.insert("itemName".into(), "Item name is required.".into());
    }
    if !item.price.is_some_and(|p| PRICE_RANGE.contains(&p)) {
        errors
            .entry("price".into())
            .or_insert_with(|| "Price must be between 1,000 and 1,000,000.".into());
    }
    if !item.quantity.is_some_and(|q| q <= MAX_QUANTITY) {
        errors
            .entry("quantity".into())
            .or_insert_with(|| "Quantity must be at most 9,999.".into());
    }
    if let (Some(price), Some(quantity)) = (item.price, item.quantity) {
        let total = price.saturating_mul(quantity);
        if total < MIN_TOTAL {
            errors.insert(
                GLOBAL_ERROR.into(),
                format!("Price * quantity must be at least 10,000. Current total = {total}"),
            );
        }
    }
}

fn item_id(params: &ParamMap) -> Result<u64, ProcessingError> {
    params
        .parse::<u64>("itemId")?
        .ok_or_else(|| ProcessingError::BadRequest("itemId is required".to_string()))
}

/// `GET /validation/v1/items`
pub fn list(repo: Arc<ItemRepository>) -> Handler {
    Handler::params_and_model(move |_: &ParamMap, model: &mut ModelMap| {
        model.add_attribute("items", &repo.find_all())?;
        Ok::<_, ProcessingError>(ITEMS_VIEW.to_string())
    })
}

/// `GET /validation/v1/items/{itemId}`; a `status` parameter marks a
/// redirect after a successful save.
pub fn detail(repo: Arc<ItemRepository>) -> Handler {
    Handler::params_and_model(move |params: &ParamMap, model: &mut ModelMap| {
        let item = repo.find_by_id(item_id(params)?)?;
        model.add_attribute("item", &item)?;
        model.insert("status", params.get("status") == Some("true"));
        Ok::<_, ProcessingError>(ITEM_VIEW.to_string())
    })
}

/// `GET /validation/v1/items/add`
pub fn add_form() -> Handler {
    Handler::static_view(ADD_FORM_VIEW)
}

/// `POST /validation/v1/items/add`
pub fn add(repo: Arc<ItemRepository>) -> Handler {
    Handler::params(move |params: &ParamMap| {
        let (item, mut errors) = bind_item(params);
        validate_item(&item, &mut errors);

        if !errors.is_empty() {
            debug!(errors = ?errors, "Item form rejected");
            let mut model = ModelMap::new();
            model.add_attribute("item", &item)?;
            model.add_attribute("errors", &errors)?;
            return Ok::<_, ProcessingError>(ViewResult::render(ADD_FORM_VIEW, model));
        }

        let saved = repo.save(item);
        info!(item_id = saved.id, item_name = %saved.item_name, "Item saved");
        Ok(Redirect::to(format!("{BASE}/{{itemId}}"))
            .attribute("itemId", saved.id)
            .attribute("status", true)
            .into())
    })
}
