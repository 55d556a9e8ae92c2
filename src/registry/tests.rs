use super::HandlerRegistry;
use crate::error::{DispatchError, ProcessingError, RegistryError};
use crate::handler::{Handler, HandlerKind};
use crate::model::ParamMap;
use crate::view::ViewResult;
use http::Method;
use std::sync::Arc;

fn view(name: &'static str) -> Handler {
    Handler::params(move |_: &ParamMap| Ok::<_, ProcessingError>(ViewResult::view(name)))
}

fn param<'a>(m: &'a super::HandlerMatch, name: &str) -> Option<&'a str> {
    m.path_params
        .iter()
        .find(|(k, _)| &**k == name)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_lookup_returns_bound_handler() {
    let mut reg = HandlerRegistry::new();
    reg.register("/members", view("members")).unwrap();
    reg.register("/members/new-form", Handler::static_view("new-form"))
        .unwrap();

    let first = reg.lookup(&Method::GET, "/members").unwrap();
    let again = reg.lookup(&Method::POST, "/members").unwrap();
    assert!(Arc::ptr_eq(&first.handler, &again.handler));
    assert_eq!(&*first.pattern, "/members");

    let form = reg.lookup(&Method::GET, "/members/new-form").unwrap();
    assert!(!Arc::ptr_eq(&first.handler, &form.handler));
    assert_eq!(form.handler.kind(), HandlerKind::StaticView);
}

#[test]
fn test_unknown_path_is_not_found() {
    let mut reg = HandlerRegistry::new();
    reg.register("/members", view("members")).unwrap();
    match reg.lookup(&Method::GET, "/unknown") {
        Err(DispatchError::NotFound { method, path }) => {
            assert_eq!(method, "GET");
            assert_eq!(path, "/unknown");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_trailing_slash_ignored() {
    let mut reg = HandlerRegistry::new();
    reg.register("/members/", view("members")).unwrap();
    assert!(reg.lookup(&Method::GET, "/members").is_ok());
    assert!(reg.lookup(&Method::GET, "/members/").is_ok());
}

#[test]
fn test_root_path() {
    let mut reg = HandlerRegistry::new();
    reg.register("/", view("index")).unwrap();
    assert!(reg.lookup(&Method::GET, "/").is_ok());
    assert!(reg.lookup(&Method::GET, "/x").is_err());
}

#[test]
fn test_duplicate_registration_fails() {
    let mut reg = HandlerRegistry::new();
    reg.register("/members", view("a")).unwrap();
    let err = reg.register("/members/", view("b")).unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicatePath {
            method: "*".into(),
            pattern: "/members".into()
        }
    );
}

#[test]
fn test_templates_differing_only_in_names_are_duplicates() {
    let mut reg = HandlerRegistry::new();
    reg.register_route(Method::GET, "/items/{itemId}", view("a"))
        .unwrap();
    let err = reg
        .register_route(Method::GET, "/items/{id}", view("b"))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicatePath { .. }));
    // A different method on the same shape is fine
    reg.register_route(Method::POST, "/items/{id}", view("c"))
        .unwrap();
}

#[test]
fn test_invalid_patterns() {
    let mut reg = HandlerRegistry::new();
    for bad in ["members", "/a//b", "/items/{}", "/items/x{id}", "/a/{id}/{id}", "/{1x}"] {
        let err = reg.register(bad, view("x")).unwrap_err();
        assert!(
            matches!(err, RegistryError::InvalidPattern { .. }),
            "{bad} should be invalid"
        );
    }
    assert!(reg.is_empty());
}

#[test]
fn test_template_binds_variables() {
    let mut reg = HandlerRegistry::new();
    reg.register_route(Method::GET, "/validation/v1/items/{itemId}", view("item"))
        .unwrap();
    let m = reg
        .lookup(&Method::GET, "/validation/v1/items/42")
        .unwrap();
    assert_eq!(&*m.pattern, "/validation/v1/items/{itemId}");
    assert_eq!(param(&m, "itemId"), Some("42"));
}

#[test]
fn test_path_variables_are_decoded() {
    let mut reg = HandlerRegistry::new();
    reg.register("/api2/members/{id}", view("member")).unwrap();
    let m = reg.lookup(&Method::GET, "/api2/members/user%20ex").unwrap();
    assert_eq!(param(&m, "id"), Some("user ex"));
    let m = reg.lookup(&Method::GET, "/api2/members/bad%zz").unwrap();
    assert_eq!(param(&m, "id"), Some("bad%zz"));
    let m = reg.lookup(&Method::GET, "/api2/members/%ED%99%8D").unwrap();
    assert_eq!(param(&m, "id"), Some("홍"));
}

#[test]
fn test_exact_beats_template() {
    let mut reg = HandlerRegistry::new();
    reg.register_route(Method::GET, "/items/{itemId}", view("item"))
        .unwrap();
    reg.register_route(Method::GET, "/items/add", Handler::static_view("addForm"))
        .unwrap();
    let m = reg.lookup(&Method::GET, "/items/add").unwrap();
    assert_eq!(m.handler.kind(), HandlerKind::StaticView);
    assert!(m.path_params.is_empty());
}

#[test]
fn test_method_specific_beats_any_method() {
    let mut reg = HandlerRegistry::new();
    reg.register("/items/add", Handler::static_view("any")).unwrap();
    reg.register_route(Method::POST, "/items/add", view("save"))
        .unwrap();
    assert_eq!(
        reg.lookup(&Method::POST, "/items/add").unwrap().handler.kind(),
        HandlerKind::Params
    );
    assert_eq!(
        reg.lookup(&Method::GET, "/items/add").unwrap().handler.kind(),
        HandlerKind::StaticView
    );
}

#[test]
fn test_wrong_method_is_method_not_allowed() {
    let mut reg = HandlerRegistry::new();
    reg.register_route(Method::GET, "/items/add", Handler::static_view("addForm"))
        .unwrap();
    reg.register_route(Method::GET, "/items/{itemId}", view("item"))
        .unwrap();
    assert!(matches!(
        reg.lookup(&Method::DELETE, "/items/add"),
        Err(DispatchError::MethodNotAllowed { .. })
    ));
    assert!(matches!(
        reg.lookup(&Method::PUT, "/items/7"),
        Err(DispatchError::MethodNotAllowed { .. })
    ));
}

#[test]
fn test_routes_listing_in_registration_order() {
    let mut reg = HandlerRegistry::new();
    reg.register("/b", view("b")).unwrap();
    reg.register_route(Method::GET, "/a/{id}", Handler::static_view("a"))
        .unwrap();
    let routes = reg.routes();
    assert_eq!(routes.len(), 2);
    assert_eq!(&*routes[0].pattern, "/b");
    assert_eq!(routes[0].method, None);
    assert_eq!(routes[1].method, Some(Method::GET));
    assert_eq!(routes[1].kind, "static_view");
    assert!(routes[1].to_string().starts_with("GET"));
}
