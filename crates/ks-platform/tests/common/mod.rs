#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use ks_platform::{PlatformServices, PublicEndpoint, StoreOptions};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

pub const ROLES_URL: &str = "/OS-ROLES/roles";
pub const PERMISSIONS_URL: &str = "/OS-ROLES/permissions";
pub const USERS_URL: &str = "/OS-ROLES/users";
pub const BASE_URL: &str = "http://localhost/v3";

pub type TestApp = NormalizePath<Router>;

pub fn test_app() -> (TestApp, PlatformServices) {
    let services = PlatformServices::new(StoreOptions::default(), PublicEndpoint::new(BASE_URL));
    let (router, _api) = services.router().split_for_parts();
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);
    (app, services)
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn send(app: &TestApp, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("response")
}

pub async fn send_status(app: &TestApp, method: &str, uri: &str) -> StatusCode {
    send(app, empty_request(method, uri)).await.status()
}

pub async fn get_json(app: &TestApp, uri: &str) -> serde_json::Value {
    let response = send(app, empty_request("GET", uri)).await;
    assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
    read_json(response).await
}

pub async fn create_role(app: &TestApp, name: &str, is_editable: Option<bool>) -> serde_json::Value {
    let mut role = serde_json::json!({ "name": name });
    if let Some(is_editable) = is_editable {
        role["is_editable"] = serde_json::json!(is_editable);
    }
    let response = send(app, json_request("POST", ROLES_URL, serde_json::json!({ "role": role }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["role"].clone()
}

pub async fn create_permission(app: &TestApp, name: &str, is_editable: Option<bool>) -> serde_json::Value {
    let mut permission = serde_json::json!({ "name": name });
    if let Some(is_editable) = is_editable {
        permission["is_editable"] = serde_json::json!(is_editable);
    }
    let body = serde_json::json!({ "permission": permission });
    let response = send(app, json_request("POST", PERMISSIONS_URL, body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["permission"].clone()
}

pub async fn create_user(app: &TestApp, name: &str) -> String {
    let body = serde_json::json!({ "user": { "name": name } });
    let response = send(app, json_request("POST", "/users", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json(response).await["user"]["id"]
        .as_str()
        .expect("user id")
        .to_string()
}

pub fn id_of(entity: &serde_json::Value) -> String {
    entity["id"].as_str().expect("id").to_string()
}

pub fn role_permission_url(role_id: &str, permission_id: &str) -> String {
    format!("{}/{}/permissions/{}", ROLES_URL, role_id, permission_id)
}

pub fn role_user_url(role_id: &str, user_id: &str) -> String {
    format!("{}/{}/users/{}", ROLES_URL, role_id, user_id)
}

pub fn assert_list_links(links: &serde_json::Value, expected_self: &str) {
    assert_eq!(links["self"], expected_self);
    assert!(links["previous"].is_null());
    assert!(links["next"].is_null());
}
