//! SCIM Converters
//!
//! Mapping between SCIM resource documents and the platform's native
//! user, group, role and organization representations.

pub mod converter;

pub use converter::{
    EXTENSION_SCHEMA, ROLE_SEPARATOR,
    group_from_scim, group_to_scim, list_groups_to_scim,
    list_organizations_to_scim, list_roles_to_scim, list_users_to_scim,
    organization_from_scim, organization_to_scim,
    role_from_scim, role_to_scim,
    user_from_scim, user_to_scim,
};
