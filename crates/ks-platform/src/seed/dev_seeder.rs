//! Development Data Seeder
//!
//! Seeds a demo user, role and permission when the server runs in dev mode.

use std::sync::Arc;
use tracing::info;

use crate::role::store::RoleAssociationStore;
use crate::shared::error::Result;
use crate::user::directory::InMemoryUserDirectory;

const DEMO_USER: &str = "demo";
const DEMO_ROLE: &str = "editor";
const DEMO_PERMISSION: &str = "write";

/// Development data seeder
pub struct DevDataSeeder {
    store: Arc<RoleAssociationStore>,
    directory: Arc<InMemoryUserDirectory>,
}

impl DevDataSeeder {
    pub fn new(store: Arc<RoleAssociationStore>, directory: Arc<InMemoryUserDirectory>) -> Self {
        Self { store, directory }
    }

    /// Seed all development data
    pub fn seed(&self) -> Result<()> {
        info!("Seeding development data...");

        let user = self.directory.create_user(DEMO_USER, None)?;
        let role = self.store.create_role(DEMO_ROLE, true)?;
        let permission = self.store.create_permission(DEMO_PERMISSION, true)?;

        self.store.link_role_permission(&role.id, &permission.id)?;
        self.store.link_role_user(&role.id, &user.id)?;

        info!(
            user_id = %user.id,
            role_id = %role.id,
            permission_id = %permission.id,
            "Development data seeded"
        );
        Ok(())
    }
}
