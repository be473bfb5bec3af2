//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod api_common;

pub use error::{PlatformError, Result};
pub use api_common::{ApiJson, CollectionLinks, EntityLinks, PublicEndpoint};

/// New opaque identifier: 32 lowercase hex characters
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
