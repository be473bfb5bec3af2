//! User Entity
//!
//! Users belong to the identity collaborator; the role store only ever
//! refers to them by id.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::new_id;

pub const DEFAULT_DOMAIN_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub domain_id: String,
    pub enabled: bool,
}

impl User {
    pub fn new(name: impl Into<String>, domain_id: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            domain_id: domain_id.unwrap_or_else(|| DEFAULT_DOMAIN_ID.to_string()),
            enabled: true,
        }
    }
}
