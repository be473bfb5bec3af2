//! User Aggregate
//!
//! Minimal identity collaborator: the role store needs user existence
//! checks and a deletion signal, nothing more.

pub mod entity;
pub mod directory;
pub mod api;

pub use entity::User;
pub use directory::{InMemoryUserDirectory, UserDirectory};
pub use api::{UsersState, users_router};
