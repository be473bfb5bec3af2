//! Role Aggregate
//!
//! Roles, permissions and the role-permission / role-user associations.

pub mod entity;
pub mod store;
pub mod api;

// Re-export main types
pub use entity::{EntityPatch, Permission, Role};
pub use store::{RoleAssociationStore, StoreOptions};
pub use api::{RolesState, roles_router};
