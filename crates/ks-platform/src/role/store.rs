//! Role Association Store
//!
//! Owns roles and permissions together with their many-to-many links to
//! each other and to users. A single mutex guards all state so that link
//! mutations and cascading deletes never interleave.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::role::entity::{validate_name, EntityPatch, Permission, Role};
use crate::shared::error::{PlatformError, Result};
use crate::user::directory::UserDirectory;

/// Store behaviour switches
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Reject a role or permission whose name is already taken
    pub enforce_unique_names: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            enforce_unique_names: true,
        }
    }
}

/// Common surface of roles and permissions used by the CRUD helpers
trait NamedEntity: Clone {
    const KIND: &'static str;

    fn build(name: String, is_editable: bool) -> Self;
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
}

impl NamedEntity for Role {
    const KIND: &'static str = Role::KIND;

    fn build(name: String, is_editable: bool) -> Self {
        Role::new(name).with_editable(is_editable)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl NamedEntity for Permission {
    const KIND: &'static str = Permission::KIND;

    fn build(name: String, is_editable: bool) -> Self {
        Permission::new(name).with_editable(is_editable)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

fn name_taken<E: NamedEntity>(entities: &IndexMap<String, E>, name: &str, except_id: Option<&str>) -> bool {
    entities
        .iter()
        .any(|(id, e)| e.name() == name && Some(id.as_str()) != except_id)
}

fn insert_entity<E: NamedEntity>(
    entities: &mut IndexMap<String, E>,
    enforce_unique: bool,
    name: &str,
    is_editable: bool,
) -> Result<E> {
    let name = validate_name(E::KIND, name)?;
    if enforce_unique && name_taken(entities, &name, None) {
        return Err(PlatformError::duplicate_name(E::KIND, &name));
    }

    let entity = E::build(name, is_editable);
    entities.insert(entity.id().to_string(), entity.clone());
    Ok(entity)
}

fn patch_entity<E: NamedEntity>(
    entities: &mut IndexMap<String, E>,
    enforce_unique: bool,
    id: &str,
    patch: EntityPatch,
) -> Result<E> {
    if !entities.contains_key(id) {
        return Err(PlatformError::not_found(E::KIND, id));
    }

    if let Some(body_id) = patch.id.as_deref() {
        if body_id != id {
            return Err(PlatformError::conflict(
                E::KIND,
                format!("id in body ({}) does not match id in path ({})", body_id, id),
            ));
        }
    }

    let new_name = match patch.name {
        Some(name) => {
            let name = validate_name(E::KIND, &name)?;
            if enforce_unique && name_taken(entities, &name, Some(id)) {
                return Err(PlatformError::duplicate_name(E::KIND, &name));
            }
            Some(name)
        }
        None => None,
    };

    let entity = entities
        .get_mut(id)
        .ok_or_else(|| PlatformError::not_found(E::KIND, id))?;
    if let Some(name) = new_name {
        entity.set_name(name);
    }
    Ok(entity.clone())
}

#[derive(Default)]
struct StoreState {
    roles: IndexMap<String, Role>,
    permissions: IndexMap<String, Permission>,
    /// (role_id, permission_id)
    role_permissions: IndexSet<(String, String)>,
    /// (role_id, user_id)
    role_users: IndexSet<(String, String)>,
}

impl StoreState {
    fn require_role(&self, role_id: &str) -> Result<&Role> {
        self.roles
            .get(role_id)
            .ok_or_else(|| PlatformError::not_found(Role::KIND, role_id))
    }

    fn require_permission(&self, permission_id: &str) -> Result<&Permission> {
        self.permissions
            .get(permission_id)
            .ok_or_else(|| PlatformError::not_found(Permission::KIND, permission_id))
    }
}

pub struct RoleAssociationStore {
    state: Mutex<StoreState>,
    users: Arc<dyn UserDirectory>,
    options: StoreOptions,
}

impl RoleAssociationStore {
    pub fn new(users: Arc<dyn UserDirectory>, options: StoreOptions) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            users,
            options,
        }
    }

    fn require_user(&self, user_id: &str) -> Result<()> {
        if self.users.user_exists(user_id) {
            Ok(())
        } else {
            Err(PlatformError::not_found("user", user_id))
        }
    }

    // ------------------------------------------------------------------
    // Roles
    // ------------------------------------------------------------------

    pub fn create_role(&self, name: &str, is_editable: bool) -> Result<Role> {
        let mut state = self.state.lock();
        let role = insert_entity(&mut state.roles, self.options.enforce_unique_names, name, is_editable)?;
        info!(role_id = %role.id, name = %role.name, is_editable, "Role created");
        Ok(role)
    }

    pub fn get_role(&self, role_id: &str) -> Result<Role> {
        self.state.lock().require_role(role_id).cloned()
    }

    pub fn update_role(&self, role_id: &str, patch: EntityPatch) -> Result<Role> {
        let mut state = self.state.lock();
        let role = patch_entity(&mut state.roles, self.options.enforce_unique_names, role_id, patch)?;
        info!(role_id = %role.id, name = %role.name, "Role updated");
        Ok(role)
    }

    /// Delete a role and every link that references it
    pub fn delete_role(&self, role_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state
            .roles
            .shift_remove(role_id)
            .ok_or_else(|| PlatformError::not_found(Role::KIND, role_id))?;

        let permissions_before = state.role_permissions.len();
        state.role_permissions.retain(|(r, _)| r != role_id);
        let users_before = state.role_users.len();
        state.role_users.retain(|(r, _)| r != role_id);

        info!(
            role_id = %role_id,
            permission_links = permissions_before - state.role_permissions.len(),
            user_links = users_before - state.role_users.len(),
            "Role deleted"
        );
        Ok(())
    }

    pub fn list_roles(&self) -> Vec<Role> {
        self.state.lock().roles.values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Permissions
    // ------------------------------------------------------------------

    pub fn create_permission(&self, name: &str, is_editable: bool) -> Result<Permission> {
        let mut state = self.state.lock();
        let permission = insert_entity(
            &mut state.permissions,
            self.options.enforce_unique_names,
            name,
            is_editable,
        )?;
        info!(permission_id = %permission.id, name = %permission.name, is_editable, "Permission created");
        Ok(permission)
    }

    pub fn get_permission(&self, permission_id: &str) -> Result<Permission> {
        self.state.lock().require_permission(permission_id).cloned()
    }

    pub fn update_permission(&self, permission_id: &str, patch: EntityPatch) -> Result<Permission> {
        let mut state = self.state.lock();
        let permission = patch_entity(
            &mut state.permissions,
            self.options.enforce_unique_names,
            permission_id,
            patch,
        )?;
        info!(permission_id = %permission.id, name = %permission.name, "Permission updated");
        Ok(permission)
    }

    /// Delete a permission and every role link that references it
    pub fn delete_permission(&self, permission_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state
            .permissions
            .shift_remove(permission_id)
            .ok_or_else(|| PlatformError::not_found(Permission::KIND, permission_id))?;

        let before = state.role_permissions.len();
        state.role_permissions.retain(|(_, p)| p != permission_id);

        info!(
            permission_id = %permission_id,
            role_links = before - state.role_permissions.len(),
            "Permission deleted"
        );
        Ok(())
    }

    pub fn list_permissions(&self) -> Vec<Permission> {
        self.state.lock().permissions.values().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Role <-> Permission
    // ------------------------------------------------------------------

    /// Link a permission to a role. Linking twice is a no-op.
    pub fn link_role_permission(&self, role_id: &str, permission_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.require_role(role_id)?;
        state.require_permission(permission_id)?;

        let added = state
            .role_permissions
            .insert((role_id.to_string(), permission_id.to_string()));
        debug!(role_id = %role_id, permission_id = %permission_id, added, "Permission linked to role");
        Ok(())
    }

    /// Unlink a permission from a role. Removing an absent link is a no-op;
    /// both the role and the permission must exist.
    pub fn unlink_role_permission(&self, role_id: &str, permission_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.require_role(role_id)?;
        state.require_permission(permission_id)?;

        let removed = state
            .role_permissions
            .shift_remove(&(role_id.to_string(), permission_id.to_string()));
        debug!(role_id = %role_id, permission_id = %permission_id, removed, "Permission unlinked from role");
        Ok(())
    }

    pub fn list_permissions_for_role(&self, role_id: &str) -> Result<Vec<Permission>> {
        let state = self.state.lock();
        state.require_role(role_id)?;

        Ok(state
            .role_permissions
            .iter()
            .filter(|(r, _)| r == role_id)
            .filter_map(|(_, p)| state.permissions.get(p).cloned())
            .collect())
    }

    pub fn list_roles_for_permission(&self, permission_id: &str) -> Result<Vec<Role>> {
        let state = self.state.lock();
        state.require_permission(permission_id)?;

        Ok(state
            .role_permissions
            .iter()
            .filter(|(_, p)| p == permission_id)
            .filter_map(|(r, _)| state.roles.get(r).cloned())
            .collect())
    }

    // ------------------------------------------------------------------
    // Role <-> User
    // ------------------------------------------------------------------

    /// Link a user to a role. Linking twice is a no-op.
    pub fn link_role_user(&self, role_id: &str, user_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.require_role(role_id)?;
        self.require_user(user_id)?;

        let added = state
            .role_users
            .insert((role_id.to_string(), user_id.to_string()));
        debug!(role_id = %role_id, user_id = %user_id, added, "User linked to role");
        Ok(())
    }

    /// Unlink a user from a role. Removing an absent link is a no-op;
    /// both the role and the user must exist.
    pub fn unlink_role_user(&self, role_id: &str, user_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.require_role(role_id)?;
        self.require_user(user_id)?;

        let removed = state
            .role_users
            .shift_remove(&(role_id.to_string(), user_id.to_string()));
        debug!(role_id = %role_id, user_id = %user_id, removed, "User unlinked from role");
        Ok(())
    }

    /// Ids of the users linked to a role that still exist in the directory
    pub fn list_users_for_role(&self, role_id: &str) -> Result<Vec<String>> {
        let state = self.state.lock();
        state.require_role(role_id)?;

        Ok(state
            .role_users
            .iter()
            .filter(|(r, u)| r == role_id && self.users.user_exists(u))
            .map(|(_, u)| u.clone())
            .collect())
    }

    pub fn list_roles_for_user(&self, user_id: &str) -> Result<Vec<Role>> {
        let state = self.state.lock();
        self.require_user(user_id)?;

        Ok(state
            .role_users
            .iter()
            .filter(|(_, u)| u == user_id)
            .filter_map(|(r, _)| state.roles.get(r).cloned())
            .collect())
    }

    /// Deletion signal from the user collaborator: drops every role link
    /// held by the user and returns how many were removed.
    pub fn remove_user(&self, user_id: &str) -> usize {
        let mut state = self.state.lock();
        let before = state.role_users.len();
        state.role_users.retain(|(_, u)| u != user_id);
        let removed = before - state.role_users.len();

        info!(user_id = %user_id, role_links = removed, "User links removed");
        removed
    }
}
