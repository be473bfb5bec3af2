//! OS-ROLES API
//!
//! REST endpoints for roles, permissions and their associations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::role::entity::{EntityPatch, Permission, Role};
use crate::role::store::RoleAssociationStore;
use crate::shared::api_common::{ApiJson, CollectionLinks, EntityLinks, PublicEndpoint};
use crate::shared::error::PlatformError;

pub const EXTENSION_PREFIX: &str = "/OS-ROLES";
pub const ROLES_PATH: &str = "/OS-ROLES/roles";
pub const PERMISSIONS_PATH: &str = "/OS-ROLES/permissions";
pub const USERS_PATH: &str = "/OS-ROLES/users";
/// Collection under which the identity collaborator exposes users
pub const IDENTITY_USERS_PATH: &str = "/users";

fn default_editable() -> bool {
    true
}

/// Body of a role or permission create request
#[derive(Debug, Deserialize, ToSchema)]
pub struct NewEntity {
    pub name: String,
    #[serde(default = "default_editable")]
    pub is_editable: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoleRequest {
    pub role: NewEntity,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePermissionRequest {
    pub permission: NewEntity,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    pub role: EntityPatch,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePermissionRequest {
    pub permission: EntityPatch,
}

/// Role response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub is_editable: bool,
    pub links: EntityLinks,
}

impl RoleResponse {
    fn new(role: Role, endpoint: &PublicEndpoint) -> Self {
        let links = endpoint.entity(ROLES_PATH, &role.id);
        Self {
            id: role.id,
            name: role.name,
            is_editable: role.is_editable,
            links,
        }
    }
}

/// Permission response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub is_editable: bool,
    pub links: EntityLinks,
}

impl PermissionResponse {
    fn new(permission: Permission, endpoint: &PublicEndpoint) -> Self {
        let links = endpoint.entity(PERMISSIONS_PATH, &permission.id);
        Self {
            id: permission.id,
            name: permission.name,
            is_editable: permission.is_editable,
            links,
        }
    }
}

/// User reference listed under a role
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUserResponse {
    pub id: String,
    pub links: EntityLinks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleEnvelope {
    pub role: RoleResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionEnvelope {
    pub permission: PermissionResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleListResponse {
    pub roles: Vec<RoleResponse>,
    pub links: CollectionLinks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionListResponse {
    pub permissions: Vec<PermissionResponse>,
    pub links: CollectionLinks,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUserListResponse {
    pub users: Vec<RoleUserResponse>,
    pub links: CollectionLinks,
}

/// Roles service state
#[derive(Clone)]
pub struct RolesState {
    pub store: Arc<RoleAssociationStore>,
    pub endpoint: PublicEndpoint,
}

impl RolesState {
    fn role_list(&self, roles: Vec<Role>, path: &str) -> RoleListResponse {
        RoleListResponse {
            roles: roles
                .into_iter()
                .map(|r| RoleResponse::new(r, &self.endpoint))
                .collect(),
            links: self.endpoint.collection(path),
        }
    }

    fn permission_list(&self, permissions: Vec<Permission>, path: &str) -> PermissionListResponse {
        PermissionListResponse {
            permissions: permissions
                .into_iter()
                .map(|p| PermissionResponse::new(p, &self.endpoint))
                .collect(),
            links: self.endpoint.collection(path),
        }
    }
}

// ----------------------------------------------------------------------
// Roles
// ----------------------------------------------------------------------

/// Create a role
#[utoipa::path(
    post,
    path = "/roles",
    tag = "os-roles",
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleEnvelope),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate role name")
    )
)]
pub async fn create_role(
    State(state): State<RolesState>,
    ApiJson(req): ApiJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleEnvelope>), PlatformError> {
    let role = state.store.create_role(&req.role.name, req.role.is_editable)?;
    Ok((
        StatusCode::CREATED,
        Json(RoleEnvelope { role: RoleResponse::new(role, &state.endpoint) }),
    ))
}

/// List roles
#[utoipa::path(
    get,
    path = "/roles",
    tag = "os-roles",
    responses(
        (status = 200, description = "List of roles", body = RoleListResponse)
    )
)]
pub async fn list_roles(
    State(state): State<RolesState>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    let roles = state.store.list_roles();
    Ok(Json(state.role_list(roles, ROLES_PATH)))
}

/// Get role by ID
#[utoipa::path(
    get,
    path = "/roles/{role_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role found", body = RoleEnvelope),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    State(state): State<RolesState>,
    Path(role_id): Path<String>,
) -> Result<Json<RoleEnvelope>, PlatformError> {
    let role = state.store.get_role(&role_id)?;
    Ok(Json(RoleEnvelope { role: RoleResponse::new(role, &state.endpoint) }))
}

/// Update role
#[utoipa::path(
    patch,
    path = "/roles/{role_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleEnvelope),
        (status = 404, description = "Role not found"),
        (status = 409, description = "Mismatched id or duplicate name")
    )
)]
pub async fn update_role(
    State(state): State<RolesState>,
    Path(role_id): Path<String>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> Result<Json<RoleEnvelope>, PlatformError> {
    let role = state.store.update_role(&role_id, req.role)?;
    Ok(Json(RoleEnvelope { role: RoleResponse::new(role, &state.endpoint) }))
}

/// Delete role
#[utoipa::path(
    delete,
    path = "/roles/{role_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<RolesState>,
    Path(role_id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    state.store.delete_role(&role_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------------------------------------------------------------
// Role <-> Permission
// ----------------------------------------------------------------------

/// Add permission to role
#[utoipa::path(
    put,
    path = "/roles/{role_id}/permissions/{permission_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID"),
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    responses(
        (status = 204, description = "Permission linked"),
        (status = 404, description = "Role or permission not found")
    )
)]
pub async fn add_permission_to_role(
    State(state): State<RolesState>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    state.store.link_role_permission(&role_id, &permission_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove permission from role
#[utoipa::path(
    delete,
    path = "/roles/{role_id}/permissions/{permission_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID"),
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    responses(
        (status = 204, description = "Permission unlinked"),
        (status = 404, description = "Role or permission not found")
    )
)]
pub async fn remove_permission_from_role(
    State(state): State<RolesState>,
    Path((role_id, permission_id)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    state.store.unlink_role_permission(&role_id, &permission_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List permissions for role
#[utoipa::path(
    get,
    path = "/roles/{role_id}/permissions",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Permissions linked to the role", body = PermissionListResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn list_permissions_for_role(
    State(state): State<RolesState>,
    Path(role_id): Path<String>,
) -> Result<Json<PermissionListResponse>, PlatformError> {
    let permissions = state.store.list_permissions_for_role(&role_id)?;
    let path = format!("{}/{}/permissions", ROLES_PATH, role_id);
    Ok(Json(state.permission_list(permissions, &path)))
}

// ----------------------------------------------------------------------
// Role <-> User
// ----------------------------------------------------------------------

/// Add user to role
#[utoipa::path(
    put,
    path = "/roles/{role_id}/users/{user_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User linked"),
        (status = 404, description = "Role or user not found")
    )
)]
pub async fn add_user_to_role(
    State(state): State<RolesState>,
    Path((role_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    state.store.link_role_user(&role_id, &user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove user from role
#[utoipa::path(
    delete,
    path = "/roles/{role_id}/users/{user_id}",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID"),
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User unlinked"),
        (status = 404, description = "Role or user not found")
    )
)]
pub async fn remove_user_from_role(
    State(state): State<RolesState>,
    Path((role_id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, PlatformError> {
    state.store.unlink_role_user(&role_id, &user_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List users for role
#[utoipa::path(
    get,
    path = "/roles/{role_id}/users",
    tag = "os-roles",
    params(
        ("role_id" = String, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Users linked to the role", body = RoleUserListResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn list_users_for_role(
    State(state): State<RolesState>,
    Path(role_id): Path<String>,
) -> Result<Json<RoleUserListResponse>, PlatformError> {
    let users = state
        .store
        .list_users_for_role(&role_id)?
        .into_iter()
        .map(|id| RoleUserResponse {
            links: state.endpoint.entity(IDENTITY_USERS_PATH, &id),
            id,
        })
        .collect();

    Ok(Json(RoleUserListResponse {
        users,
        links: state
            .endpoint
            .collection(&format!("{}/{}/users", ROLES_PATH, role_id)),
    }))
}

/// List roles for user
#[utoipa::path(
    get,
    path = "/users/{user_id}/roles",
    tag = "os-roles",
    params(
        ("user_id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Roles linked to the user", body = RoleListResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_roles_for_user(
    State(state): State<RolesState>,
    Path(user_id): Path<String>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    let roles = state.store.list_roles_for_user(&user_id)?;
    let path = format!("{}/{}/roles", USERS_PATH, user_id);
    Ok(Json(state.role_list(roles, &path)))
}

// ----------------------------------------------------------------------
// Permissions
// ----------------------------------------------------------------------

/// Create a permission
#[utoipa::path(
    post,
    path = "/permissions",
    tag = "os-roles",
    request_body = CreatePermissionRequest,
    responses(
        (status = 201, description = "Permission created", body = PermissionEnvelope),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Duplicate permission name")
    )
)]
pub async fn create_permission(
    State(state): State<RolesState>,
    ApiJson(req): ApiJson<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<PermissionEnvelope>), PlatformError> {
    let permission = state
        .store
        .create_permission(&req.permission.name, req.permission.is_editable)?;
    Ok((
        StatusCode::CREATED,
        Json(PermissionEnvelope {
            permission: PermissionResponse::new(permission, &state.endpoint),
        }),
    ))
}

/// List permissions
#[utoipa::path(
    get,
    path = "/permissions",
    tag = "os-roles",
    responses(
        (status = 200, description = "List of permissions", body = PermissionListResponse)
    )
)]
pub async fn list_permissions(
    State(state): State<RolesState>,
) -> Result<Json<PermissionListResponse>, PlatformError> {
    let permissions = state.store.list_permissions();
    Ok(Json(state.permission_list(permissions, PERMISSIONS_PATH)))
}

/// Get permission by ID
#[utoipa::path(
    get,
    path = "/permissions/{permission_id}",
    tag = "os-roles",
    params(
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    responses(
        (status = 200, description = "Permission found", body = PermissionEnvelope),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn get_permission(
    State(state): State<RolesState>,
    Path(permission_id): Path<String>,
) -> Result<Json<PermissionEnvelope>, PlatformError> {
    let permission = state.store.get_permission(&permission_id)?;
    Ok(Json(PermissionEnvelope {
        permission: PermissionResponse::new(permission, &state.endpoint),
    }))
}

/// Update permission
#[utoipa::path(
    patch,
    path = "/permissions/{permission_id}",
    tag = "os-roles",
    params(
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    request_body = UpdatePermissionRequest,
    responses(
        (status = 200, description = "Permission updated", body = PermissionEnvelope),
        (status = 404, description = "Permission not found"),
        (status = 409, description = "Mismatched id or duplicate name")
    )
)]
pub async fn update_permission(
    State(state): State<RolesState>,
    Path(permission_id): Path<String>,
    ApiJson(req): ApiJson<UpdatePermissionRequest>,
) -> Result<Json<PermissionEnvelope>, PlatformError> {
    let permission = state.store.update_permission(&permission_id, req.permission)?;
    Ok(Json(PermissionEnvelope {
        permission: PermissionResponse::new(permission, &state.endpoint),
    }))
}

/// Delete permission
#[utoipa::path(
    delete,
    path = "/permissions/{permission_id}",
    tag = "os-roles",
    params(
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    responses(
        (status = 204, description = "Permission deleted"),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn delete_permission(
    State(state): State<RolesState>,
    Path(permission_id): Path<String>,
) -> Result<StatusCode, PlatformError> {
    state.store.delete_permission(&permission_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// List roles for permission
#[utoipa::path(
    get,
    path = "/permissions/{permission_id}/roles",
    tag = "os-roles",
    params(
        ("permission_id" = String, Path, description = "Permission ID")
    ),
    responses(
        (status = 200, description = "Roles holding the permission", body = RoleListResponse),
        (status = 404, description = "Permission not found")
    )
)]
pub async fn list_roles_for_permission(
    State(state): State<RolesState>,
    Path(permission_id): Path<String>,
) -> Result<Json<RoleListResponse>, PlatformError> {
    let roles = state.store.list_roles_for_permission(&permission_id)?;
    let path = format!("{}/{}/roles", PERMISSIONS_PATH, permission_id);
    Ok(Json(state.role_list(roles, &path)))
}

/// Create the OS-ROLES router (nest under [`EXTENSION_PREFIX`])
pub fn roles_router(state: RolesState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_role, list_roles))
        .routes(routes!(get_role, update_role, delete_role))
        .routes(routes!(add_permission_to_role, remove_permission_from_role))
        .routes(routes!(list_permissions_for_role))
        .routes(routes!(add_user_to_role, remove_user_from_role))
        .routes(routes!(list_users_for_role))
        .routes(routes!(list_roles_for_user))
        .routes(routes!(create_permission, list_permissions))
        .routes(routes!(get_permission, update_permission, delete_permission))
        .routes(routes!(list_roles_for_permission))
        .with_state(state)
}
