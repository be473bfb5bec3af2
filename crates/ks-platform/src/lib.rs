//! OS-ROLES Platform
//!
//! Role/permission/user association store with:
//! - Role and permission CRUD with optional unique names
//! - Idempotent role-permission and role-user links
//! - Cascading cleanup when roles, permissions or users go away
//! - SCIM document converters
//!
//! ## Module Organization (Aggregate-based)
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `store` / `directory` - In-memory state
//! - `api` - REST endpoints

// Aggregates
pub mod role;
pub mod user;

// Conversion
pub mod scim;

// Shared infrastructure
pub mod shared;

// Wiring
pub mod app;
pub mod seed;

// Re-export common types from shared
pub use shared::error::{PlatformError, Result};
pub use shared::api_common::PublicEndpoint;

// Re-export main types
pub use role::entity::{EntityPatch, Permission, Role};
pub use role::store::{RoleAssociationStore, StoreOptions};
pub use user::entity::User;
pub use user::directory::{InMemoryUserDirectory, UserDirectory};
pub use app::PlatformServices;
pub use seed::DevDataSeeder;
