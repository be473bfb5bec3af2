//! Common API types and utilities

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::shared::error::PlatformError;

/// JSON body extractor that reports rejections in the platform error format.
/// Malformed bodies become `400 Bad Request`; failures to read the body stay
/// server errors.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;
        Ok(Self(value))
    }
}

fn rejection_error(rejection: JsonRejection) -> PlatformError {
    if rejection.status().is_server_error() {
        PlatformError::internal(rejection.body_text())
    } else {
        PlatformError::validation(rejection.body_text())
    }
}

/// `links` member of a single entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EntityLinks {
    #[serde(rename = "self")]
    pub self_url: String,
}

/// `links` member of a collection
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_url: String,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl CollectionLinks {
    pub fn unpaged(self_url: String) -> Self {
        Self {
            self_url,
            previous: None,
            next: None,
        }
    }
}

/// Base URL under which resources are advertised in `links`
#[derive(Debug, Clone)]
pub struct PublicEndpoint {
    base_url: String,
}

impl PublicEndpoint {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn collection(&self, path: &str) -> CollectionLinks {
        CollectionLinks::unpaged(format!("{}{}", self.base_url, path))
    }

    pub fn entity(&self, collection_path: &str, id: &str) -> EntityLinks {
        EntityLinks {
            self_url: format!("{}{}/{}", self.base_url, collection_path, id),
        }
    }
}

impl Default for PublicEndpoint {
    fn default() -> Self {
        Self::new("http://localhost:5000/v3")
    }
}
