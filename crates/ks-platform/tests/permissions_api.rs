mod common;

use axum::http::StatusCode;
use common::*;

fn assert_permission(permission: &serde_json::Value, name: &str, is_editable: bool) {
    assert!(permission["id"].is_string());
    assert_eq!(permission["name"], name);
    assert_eq!(permission["is_editable"], is_editable);
}

#[tokio::test]
async fn permission_create_default() {
    let (app, _) = test_app();
    let permission = create_permission(&app, "write", None).await;
    assert_permission(&permission, "write", true);
}

#[tokio::test]
async fn permission_create_not_editable() {
    let (app, _) = test_app();
    let permission = create_permission(&app, "write", Some(false)).await;
    assert_permission(&permission, "write", false);
}

#[tokio::test]
async fn permissions_list() {
    let (app, _) = test_app();
    create_permission(&app, "read", None).await;
    create_permission(&app, "write", None).await;

    let body = get_json(&app, PERMISSIONS_URL).await;
    let permissions = body["permissions"].as_array().unwrap();
    assert_eq!(permissions.len(), 2);
    assert_eq!(permissions[0]["name"], "read");
    assert_list_links(&body["links"], &format!("{}{}", BASE_URL, PERMISSIONS_URL));
}

#[tokio::test]
async fn get_permission() {
    let (app, _) = test_app();
    let permission_id = id_of(&create_permission(&app, "write", None).await);

    let body = get_json(&app, &format!("{}/{}", PERMISSIONS_URL, permission_id)).await;
    let permission = &body["permission"];
    assert_permission(permission, "write", true);
    assert_eq!(
        permission["links"]["self"],
        format!("{}{}/{}", BASE_URL, PERMISSIONS_URL, permission_id)
    );
}

#[tokio::test]
async fn update_permission() {
    let (app, _) = test_app();
    let permission_id = id_of(&create_permission(&app, "write", None).await);

    let body = serde_json::json!({ "permission": { "name": "write_new" } });
    let url = format!("{}/{}", PERMISSIONS_URL, permission_id);
    let response = send(&app, json_request("PATCH", &url, body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let permission = read_json(response).await["permission"].clone();
    assert_permission(&permission, "write_new", true);
    assert_eq!(permission["id"], permission_id.as_str());
}

#[tokio::test]
async fn update_permission_to_taken_name_conflicts() {
    let (app, _) = test_app();
    create_permission(&app, "read", None).await;
    let permission_id = id_of(&create_permission(&app, "write", None).await);

    let body = serde_json::json!({ "permission": { "name": "read" } });
    let url = format!("{}/{}", PERMISSIONS_URL, permission_id);
    let response = send(&app, json_request("PATCH", &url, body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn update_permission_rejects_malformed_json() {
    let (app, _) = test_app();
    let permission_id = id_of(&create_permission(&app, "write", None).await);

    let req = axum::http::Request::builder()
        .method("PATCH")
        .uri(format!("{}/{}", PERMISSIONS_URL, permission_id))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .expect("request");
    let response = send(&app, req).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_permission() {
    let (app, _) = test_app();
    let permission_id = id_of(&create_permission(&app, "write", None).await);
    let url = format!("{}/{}", PERMISSIONS_URL, permission_id);

    assert_eq!(send_status(&app, "DELETE", &url).await, StatusCode::NO_CONTENT);
    assert_eq!(send_status(&app, "GET", &url).await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_permissions_for_role() {
    let (app, _) = test_app();
    let role_id = id_of(&create_role(&app, "A", None).await);
    let p1 = id_of(&create_permission(&app, "p1", None).await);
    let p2 = id_of(&create_permission(&app, "p2", None).await);

    send_status(&app, "PUT", &role_permission_url(&role_id, &p1)).await;
    send_status(&app, "PUT", &role_permission_url(&role_id, &p2)).await;

    let url = format!("{}/{}/permissions", ROLES_URL, role_id);
    let body = get_json(&app, &url).await;
    assert_eq!(body["permissions"].as_array().unwrap().len(), 2);
    assert_list_links(&body["links"], &format!("{}{}", BASE_URL, url));
}

#[tokio::test]
async fn dont_list_deleted_permissions_for_role() {
    let (app, _) = test_app();
    let role_id = id_of(&create_role(&app, "A", None).await);
    let p1 = id_of(&create_permission(&app, "p1", None).await);
    let p2 = id_of(&create_permission(&app, "p2", None).await);

    send_status(&app, "PUT", &role_permission_url(&role_id, &p1)).await;
    send_status(&app, "PUT", &role_permission_url(&role_id, &p2)).await;
    send_status(&app, "DELETE", &format!("{}/{}", PERMISSIONS_URL, p2)).await;

    let body = get_json(&app, &format!("{}/{}/permissions/", ROLES_URL, role_id)).await;
    let permissions = body["permissions"].as_array().unwrap();
    assert_eq!(permissions.len(), 1);
    assert_eq!(permissions[0]["name"], "p1");
}

#[tokio::test]
async fn list_permissions_for_unknown_role_not_found() {
    let (app, _) = test_app();
    let status = send_status(&app, "GET", &format!("{}/missing/permissions", ROLES_URL)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ----------------------------------------------------------------------
// Identity collaborator
// ----------------------------------------------------------------------

#[tokio::test]
async fn users_create_get_and_list() {
    let (app, _) = test_app();
    let user_id = create_user(&app, "alice").await;

    let body = get_json(&app, &format!("/users/{}", user_id)).await;
    assert_eq!(body["user"]["name"], "alice");
    assert_eq!(body["user"]["domain_id"], "default");
    assert_eq!(body["user"]["enabled"], true);

    let body = get_json(&app, "/users").await;
    assert_eq!(body["users"].as_array().unwrap().len(), 1);
    assert_list_links(&body["links"], &format!("{}/users", BASE_URL));
}

#[tokio::test]
async fn users_duplicate_name_in_domain_conflicts() {
    let (app, _) = test_app();
    create_user(&app, "alice").await;

    let body = serde_json::json!({ "user": { "name": "alice" } });
    let response = send(&app, json_request("POST", "/users", body)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_unknown_user_not_found() {
    let (app, _) = test_app();
    assert_eq!(send_status(&app, "DELETE", "/users/missing").await, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_user_has_no_roles() {
    let (app, _) = test_app();
    let role_id = id_of(&create_role(&app, "editor", None).await);
    let user_id = create_user(&app, "alice").await;
    send_status(&app, "PUT", &role_user_url(&role_id, &user_id)).await;

    send_status(&app, "DELETE", &format!("/users/{}", user_id)).await;

    let status = send_status(&app, "GET", &format!("{}/{}/roles", USERS_URL, user_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
