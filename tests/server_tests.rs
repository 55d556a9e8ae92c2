//! End-to-end tests over real sockets
//!
//! Each test starts the bundled application on a random port with
//! [`TestServer`], sends raw HTTP/1.1 requests and inspects the wire
//! response. The server is stopped when the fixture drops, even if the test
//! panics.

mod common;
use common::http::{get, parse_parts, post_form, send_request};
use common::test_server::TestServer;
use serde_json::{json, Value};

#[test]
fn test_health_endpoint() {
    let server = TestServer::start();
    let parts = parse_parts(&get(&server.addr(), "/health"));
    assert_eq!(parts.status, 200);
    assert_eq!(parts.header("content-type"), Some("application/json"));
    let body: Value = serde_json::from_str(&parts.body).unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[test]
fn test_form_post_saves_member() {
    let server = TestServer::start();
    let resp = post_form(
        &server.addr(),
        "/front-controller/v4/members/save",
        "username=hong+gildong&age=27",
    );
    let parts = parse_parts(&resp);
    assert_eq!(parts.status, 200);
    assert_eq!(parts.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(parts.body.contains("username=hong gildong"));
    assert_eq!(server.stores.members.len(), 1);
}

#[test]
fn test_query_parameters_reach_handler() {
    let server = TestServer::start();
    let parts = parse_parts(&get(
        &server.addr(),
        "/front-controller/v3/members/save?username=kim&age=20",
    ));
    assert_eq!(parts.status, 200);
    assert!(parts.body.contains("username=kim"));
}

#[test]
fn test_item_redirect_location() {
    let server = TestServer::start();
    let parts = parse_parts(&post_form(
        &server.addr(),
        "/validation/v1/items/add",
        "itemName=A&price=10000&quantity=10",
    ));
    assert_eq!(parts.status, 302);
    assert_eq!(
        parts.header("location"),
        Some("/validation/v1/items/1?status=true")
    );

    let parts = parse_parts(&get(&server.addr(), "/validation/v1/items/1?status=true"));
    assert_eq!(parts.status, 200);
    assert!(parts.body.contains("<dd>A</dd>"));
}

#[test]
fn test_api_errors_are_json() {
    let server = TestServer::start();
    let parts = parse_parts(&get(&server.addr(), "/api2/members/ex"));
    assert_eq!(parts.status, 500);
    assert_eq!(parts.header("content-type"), Some("application/json"));
    let body: Value = serde_json::from_str(&parts.body).unwrap();
    assert_eq!(body, json!({ "code": "EX", "message": "internal error" }));
}

#[test]
fn test_unknown_path_is_404_html() {
    let server = TestServer::start();
    let parts = parse_parts(&get(&server.addr(), "/does/not/exist"));
    assert_eq!(parts.status, 404);
    assert_eq!(parts.header("content-type"), Some("text/html; charset=utf-8"));
    assert!(parts.body.contains("404 NOT-FOUND"));
}

#[test]
fn test_request_id_header_is_accepted() {
    let server = TestServer::start();
    let resp = send_request(
        &server.addr(),
        "GET /api2/members/spring HTTP/1.1\r\nHost: localhost\r\nX-Request-Id: 01ARZ3NDEKTSV4RRFFQ69G5FAV\r\n\r\n",
    );
    let parts = parse_parts(&resp);
    assert_eq!(parts.status, 200);
    let body: Value = serde_json::from_str(&parts.body).unwrap();
    assert_eq!(body["memberId"], "spring");
}

#[test]
fn test_trailing_slash_form_page_redirects() {
    let server = TestServer::start();
    let parts = parse_parts(&get(&server.addr(), "/front-controller/v1/members/new-form/"));
    assert_eq!(parts.status, 301);
    assert_eq!(
        parts.header("location"),
        Some("/front-controller/v1/members/new-form")
    );
}
