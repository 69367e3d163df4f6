//! Resource services: one transport call per CRUD intent.
//!
//! A service passes paths and payloads through unchanged and returns the
//! transport's result as-is. No validation and no retries happen here.

mod auth;

pub use auth::{AuthService, LoginResponse, LOGIN_PATH};

use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::actor_framework::{Deletable, Entity};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, HttpMethod, Transport};

pub struct ResourceService<T: Entity> {
    transport: Arc<dyn Transport>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> ResourceService<T> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            _entity: PhantomData,
        }
    }

    fn request(&self, method: HttpMethod, path: String) -> ApiRequest {
        ApiRequest::new(method, path).authorized(T::REQUIRES_AUTH)
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", T::PATH, id)
    }

    #[instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn list(&self) -> ApiResult<Vec<T>> {
        debug!("Sending request");
        let response = self
            .transport
            .send(self.request(HttpMethod::Get, T::PATH.to_string()))
            .await?;
        response.into_list()
    }

    #[instrument(skip(self, draft), fields(resource = T::RESOURCE))]
    pub async fn create(&self, draft: &T::Draft) -> ApiResult<T> {
        debug!("Sending request");
        let body = serde_json::to_value(draft)?;
        let request = self.request(HttpMethod::Post, T::PATH.to_string()).with_body(body);
        self.transport.send(request).await?.into_item()
    }

    #[instrument(skip(self, patch), fields(resource = T::RESOURCE))]
    pub async fn update(&self, id: &str, patch: &T::Patch) -> ApiResult<T> {
        debug!("Sending request");
        let body = serde_json::to_value(patch)?;
        let request = self.request(T::UPDATE_METHOD, Self::item_path(id)).with_body(body);
        self.transport.send(request).await?.into_item()
    }

    /// Store-internal delete; the public entry point is [`ResourceService::delete`],
    /// which exists only for kinds the API can delete.
    pub(crate) async fn delete_unchecked(&self, id: &str) -> ApiResult<()> {
        debug!(resource = T::RESOURCE, id, "Sending delete request");
        self.transport
            .send(self.request(HttpMethod::Delete, Self::item_path(id)))
            .await?;
        Ok(())
    }
}

impl<T: Deletable> ResourceService<T> {
    #[instrument(skip(self), fields(resource = T::RESOURCE))]
    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.delete_unchecked(id).await
    }
}
