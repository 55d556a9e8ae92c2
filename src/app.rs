//! Wiring of the bundled application: stores, routes, renderer, dispatcher.

use crate::config::AppConfig;
use crate::controllers::{register_all, Stores};
use crate::dispatcher::Dispatcher;
use crate::error::RegistryError;
use crate::registry::HandlerRegistry;
use std::sync::Arc;

/// Registry holding every bundled route.
pub fn build_registry(stores: &Stores) -> Result<HandlerRegistry, RegistryError> {
    let mut registry = HandlerRegistry::new();
    register_all(&mut registry, stores)?;
    Ok(registry)
}

/// Dispatcher for the bundled routes, configured from `config`.
pub fn build_dispatcher(config: &AppConfig, stores: &Stores) -> Result<Dispatcher, RegistryError> {
    let registry = build_registry(stores)?;
    Ok(Dispatcher::builder(registry, Arc::new(config.views.renderer()))
        .json_error_prefixes(config.errors.json_prefixes.iter().cloned())
        .error_view(config.errors.view.clone())
        .build())
}
