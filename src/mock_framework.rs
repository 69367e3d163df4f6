//! # Mock Framework
//!
//! Utilities for testing in isolation.
//!
//! [`MockTransport`] stands in for the HTTP layer under services and stores;
//! [`envelope`] builds the `data.data` success body the API returns.
//!
//! Use [`create_mock_client`] to get a store client without a store behind it,
//! then helpers like [`expect_create`] or [`expect_update`] to answer requests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::actor_framework::{Entity, ResourceClient, ResourceRequest, Response, StoreSnapshot};
use crate::error::ApiResult;
use crate::transport::{ApiRequest, ApiResponse, Transport};

mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
    }
}

/// A 200 response wrapping `data` the way every resource endpoint does.
pub fn envelope(data: Value) -> ApiResult<ApiResponse> {
    Ok(ApiResponse::new(
        200,
        json!({ "message": "Fetch successful", "data": { "data": data } }),
    ))
}

/// Answers successive calls with `responses`, in order.
pub fn in_turn(
    responses: Vec<ApiResult<ApiResponse>>,
) -> impl FnMut(ApiRequest) -> ApiResult<ApiResponse> + Send + 'static {
    let mut responses = std::collections::VecDeque::from(responses);
    move |request| {
        responses
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected extra call: {} {}", request.method, request.path))
    }
}

/// Creates a client and the receiver its requests land on.
///
/// The snapshot channel starts settled with `items`; the returned sender lets
/// a test publish further states.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
    items: Vec<T>,
) -> (
    ResourceClient<T>,
    mpsc::Receiver<ResourceRequest<T>>,
    tokio::sync::watch::Sender<StoreSnapshot<T>>,
) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (state_tx, state_rx) = tokio::sync::watch::channel(StoreSnapshot {
        items,
        ..StoreSnapshot::default()
    });
    (ResourceClient::new(sender, state_rx), receiver, state_tx)
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Draft, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Next message must be an Update request.
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(String, T::Patch, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Next message must be a Remove request.
pub async fn expect_remove<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(String, Response<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Remove { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Blog, BlogDraft};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver, _state) = create_mock_client::<Blog>(10, Vec::new());

        let create_task = tokio::spawn(async move { client.create(BlogDraft::new("Hello", "<p>hi</p>")).await });

        let (draft, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(draft.title, "Hello");
        let created = Blog {
            id: Some("b1".to_string()),
            title: draft.title,
            content: draft.content,
            created_at: None,
            updated_at: None,
        };
        responder.send(Ok(created.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(created));
    }

    #[tokio::test]
    async fn test_envelope_unwraps_to_list() {
        let response = envelope(json!([{"_id": "b1", "title": "T"}])).unwrap();
        assert_eq!(response.message.as_deref(), Some("Fetch successful"));
        let blogs: Vec<Blog> = response.into_list().unwrap();
        assert_eq!(blogs[0].title, "T");
    }
}
