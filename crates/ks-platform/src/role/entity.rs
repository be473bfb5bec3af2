//! Role and Permission Entities
//!
//! Authorization model for the OS-ROLES extension. Both entities share the
//! same shape: an opaque id, a name and an `is_editable` flag.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::shared::error::{PlatformError, Result};
use crate::shared::new_id;

fn default_editable() -> bool {
    true
}

/// Role definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default = "default_editable")]
    pub is_editable: bool,
}

/// Permission definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: String,
    pub name: String,
    #[serde(default = "default_editable")]
    pub is_editable: bool,
}

/// Partial update of a role or permission.
///
/// `id`, when present, must match the identifier being updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct EntityPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl EntityPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Mapping conversion shared by both entity kinds.
///
/// Field lists are explicit: unknown keys are dropped on the way in and
/// only `id`, `name` and `is_editable` are produced on the way out.
macro_rules! impl_entity {
    ($ty:ident, $kind:literal) => {
        impl $ty {
            pub const KIND: &'static str = $kind;

            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    id: new_id(),
                    name: name.into(),
                    is_editable: true,
                }
            }

            pub fn with_editable(mut self, is_editable: bool) -> Self {
                self.is_editable = is_editable;
                self
            }

            pub fn to_value(&self) -> Value {
                serde_json::json!({
                    "id": self.id,
                    "name": self.name,
                    "is_editable": self.is_editable,
                })
            }

            /// Build from a mapping. A missing `id` gets a fresh one.
            pub fn from_value(value: &Value) -> Result<Self> {
                let map = value.as_object().ok_or_else(|| {
                    PlatformError::validation(format!("{} must be an object", $kind))
                })?;

                let name = map
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| PlatformError::validation(format!("{} name is required", $kind)))?;

                let id = match map.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Null) | None => new_id(),
                    Some(_) => {
                        return Err(PlatformError::validation(format!("{} id must be a string", $kind)))
                    }
                };

                let is_editable = match map.get("is_editable") {
                    Some(Value::Bool(flag)) => *flag,
                    Some(Value::Null) | None => true,
                    Some(_) => {
                        return Err(PlatformError::validation("is_editable must be a boolean"))
                    }
                };

                Ok(Self {
                    id,
                    name: name.to_string(),
                    is_editable,
                })
            }
        }
    };
}

impl_entity!(Role, "role");
impl_entity!(Permission, "permission");

/// Name validation applied on create and rename. The name is kept as given.
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(PlatformError::validation(format!("{} name must not be empty", kind)));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_role_defaults() {
        let role = Role::new("editor");
        assert_eq!(role.name, "editor");
        assert!(role.is_editable);
        assert_eq!(role.id.len(), 32);
        assert!(role.id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Permission::new("a").id, Permission::new("a").id);
    }

    #[test]
    fn test_to_value_field_list() {
        let role = Role::new("editor").with_editable(false);
        let value = role.to_value();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(value["name"], "editor");
        assert_eq!(value["is_editable"], false);
    }

    #[test]
    fn test_from_value_defaults_editable() {
        let permission = Permission::from_value(&json!({"name": "write", "extra": 1})).unwrap();
        assert_eq!(permission.name, "write");
        assert!(permission.is_editable);
        assert_eq!(permission.id.len(), 32);
    }

    #[test]
    fn test_from_value_keeps_id() {
        let role = Role::from_value(&json!({"id": "r1", "name": "admin", "is_editable": false})).unwrap();
        assert_eq!(role, Role { id: "r1".into(), name: "admin".into(), is_editable: false });
        assert_eq!(Role::from_value(&role.to_value()).unwrap(), role);
    }

    #[test]
    fn test_from_value_rejects_bad_mappings() {
        assert!(Role::from_value(&json!({"is_editable": true})).is_err());
        assert!(Role::from_value(&json!("editor")).is_err());
        assert!(Role::from_value(&json!({"name": "x", "is_editable": "yes"})).is_err());
        assert!(Role::from_value(&json!({"name": "x", "id": 7})).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("role", "  editor ").unwrap(), "  editor ");
        assert!(matches!(
            validate_name("role", "   "),
            Err(PlatformError::Validation { .. })
        ));
    }

    #[test]
    fn test_patch_deserialization() {
        let patch: EntityPatch = serde_json::from_value(json!({"name": "renamed"})).unwrap();
        assert_eq!(patch, EntityPatch::rename("renamed"));
    }
}
