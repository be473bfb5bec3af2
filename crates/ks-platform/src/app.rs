//! Application wiring
//!
//! Builds the shared services and the combined OpenAPI router so the server
//! binary and the HTTP tests serve exactly the same routes.

use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

use crate::role::api::{roles_router, RolesState, EXTENSION_PREFIX, IDENTITY_USERS_PATH};
use crate::role::store::{RoleAssociationStore, StoreOptions};
use crate::shared::api_common::PublicEndpoint;
use crate::user::api::{users_router, UsersState};
use crate::user::directory::InMemoryUserDirectory;

/// Shared services behind the HTTP API
#[derive(Clone)]
pub struct PlatformServices {
    pub store: Arc<RoleAssociationStore>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub endpoint: PublicEndpoint,
}

impl PlatformServices {
    pub fn new(options: StoreOptions, endpoint: PublicEndpoint) -> Self {
        let directory = Arc::new(InMemoryUserDirectory::new());
        let store = Arc::new(RoleAssociationStore::new(directory.clone(), options));
        Self { store, directory, endpoint }
    }

    /// OS-ROLES routes nested under `/OS-ROLES`, users under `/users`
    pub fn router(&self) -> OpenApiRouter {
        let roles_state = RolesState {
            store: self.store.clone(),
            endpoint: self.endpoint.clone(),
        };
        let users_state = UsersState {
            directory: self.directory.clone(),
            store: self.store.clone(),
            endpoint: self.endpoint.clone(),
        };

        OpenApiRouter::new()
            .nest(EXTENSION_PREFIX, roles_router(roles_state))
            .nest(IDENTITY_USERS_PATH, users_router(users_state))
    }
}

impl Default for PlatformServices {
    fn default() -> Self {
        Self::new(StoreOptions::default(), PublicEndpoint::default())
    }
}
