//! Bundled controllers and their route table.
//!
//! - [`members`]: member list/form/save in the raw (`v1`), params (`v3`) and
//!   params+model (`v4`) handler styles
//! - [`items`]: item registration with form validation
//! - [`api`]: a JSON endpoint with mapped failures

pub mod api;
pub mod items;
pub mod members;

use crate::domain::{ItemRepository, MemberRepository};
use crate::error::RegistryError;
use crate::registry::HandlerRegistry;
use http::Method;
use std::sync::Arc;

/// Stores shared by the controllers.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    pub members: Arc<MemberRepository>,
    pub items: Arc<ItemRepository>,
}

/// Register every bundled route.
///
/// # Errors
///
/// Fails if `registry` already binds one of the paths.
pub fn register_all(registry: &mut HandlerRegistry, stores: &Stores) -> Result<(), RegistryError> {
    use members::{V1_BASE, V3_BASE, V4_BASE};

    let m = &stores.members;
    registry.register(V1_BASE, members::list_v1(Arc::clone(m)))?;
    registry.register(&format!("{V1_BASE}/new-form"), members::new_form_v1())?;
    registry.register(&format!("{V1_BASE}/save"), members::save_v1(Arc::clone(m)))?;

    registry.register(V3_BASE, members::list_v3(Arc::clone(m)))?;
    registry.register(&format!("{V3_BASE}/new-form"), members::new_form_v3())?;
    registry.register(&format!("{V3_BASE}/save"), members::save_v3(Arc::clone(m)))?;

    registry.register(V4_BASE, members::list_v4(Arc::clone(m)))?;
    registry.register(&format!("{V4_BASE}/new-form"), members::new_form_v4())?;
    registry.register(&format!("{V4_BASE}/save"), members::save_v4(Arc::clone(m)))?;

    let i = &stores.items;
    registry.register_route(Method::GET, items::BASE, items::list(Arc::clone(i)))?;
    let add = format!("{}/add", items::BASE);
    registry.register_route(Method::GET, &add, items::add_form())?;
    registry.register_route(Method::POST, &add, items::add(Arc::clone(i)))?;
    registry.register_route(
        Method::GET,
        &format!("{}/{{itemId}}", items::BASE),
        items::detail(Arc::clone(i)),
    )?;

    registry.register_route(Method::GET, api::MEMBER_PATH, api::member())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_twice_fails() {
        let stores = Stores::default();
        let mut registry = HandlerRegistry::new();
        register_all(&mut registry, &stores).unwrap();
        assert_eq!(registry.len(), 14);
        assert!(matches!(
            register_all(&mut registry, &stores),
            Err(RegistryError::DuplicatePath { .. })
        ));
    }
}
