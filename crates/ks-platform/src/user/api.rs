//! Users API
//!
//! REST endpoints for the identity collaborator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::role::api::IDENTITY_USERS_PATH;
use crate::role::store::RoleAssociationStore;
use crate::shared::api_common::{ApiJson, CollectionLinks, EntityLinks, PublicEndpoint};
use crate::shared::error::PlatformError;
use crate::user::directory::InMemoryUserDirectory;
use crate::user::entity::User;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewUser {
    pub name: String,
    pub domain_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub user: NewUser,
}

/// User response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub domain_id: String,
    pub enabled: bool,
    pub links: EntityLinks,
}

impl UserResponse {
    fn new(user: User, endpoint: &PublicEndpoint) -> Self {
        let links = endpoint.entity(IDENTITY_USERS_PATH, &user.id);
        Self {
            id: user.id,
            name: user.name,
            domain_id: user.domain_id,
            enabled: user.enabled,
            links,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub links: CollectionLinks,
}

/// Users service state
#[derive(Clone)]
pub struct UsersState {
    pub directory: Arc<InMemoryUserDirectory>,
    pub store: Arc<RoleAssociationStore>,
    pub endpoint: PublicEndpoint,
}

/// Create a user
#[utoipa::path(
    post,
    path = "",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate user name in domain")
    )
)]
pub async fn create_user(
    State(state): State<UsersState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserEnvelope>), PlatformError> {
    let user = state.directory.create_user(req.user.name, req.user.domain_id)?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope { user: UserResponse::new(user, &state.endpoint) }),
    ))
}

/// List users
#[utoipa::path(
    get,
    path = "",
    tag = "users",
    responses(
        (status = 200, description = "List of users", body = UserListResponse)
    )
)]
pub async fn list_users(
    State(state): State<UsersState>,
) -> Result<Json<UserListResponse>, PlatformError> {
    let users = state
        .directory
        .list_users()
        .into_iter()
        .map(|u| UserResponse::new(u, &state.endpoint))
        .collect();

    Ok(Json(UserListResponse {
        users,
        links: state.endpoint.collection(IDENTITY_USERS_PATH),
    }))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserEnvelope),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserEnvelope>, PlatformError> {
    let user = state.directory.get_user(&user_id)?;
    Ok(Json(UserEnvelope { user: UserResponse::new(user, &state.endpoint) }))
}

/// Delete user
///
/// Role memberships of the user are dropped along with it.
#[utoipa::path(
    delete,
    path = "/{user_id}",
    tag = "users",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    state.directory.delete_user(&user_id)?;
    let removed = state.store.remove_user(&user_id);
    tracing::debug!(user_id = %user_id, removed_links = removed, "User role links removed");
    Ok(StatusCode::NO_CONTENT)
}

/// Create the users router (nest under `/users`)
pub fn users_router(state: UsersState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_user, list_users))
        .routes(routes!(get_user, delete_user))
        .with_state(state)
}
