use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn, Instrument};

use crate::error::{ApiResult, StoreError};
use crate::patch::{apply_patch, CollectionPatch};
use crate::services::ResourceService;
use crate::transport::HttpMethod;

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A remote collection the dashboard caches: where it lives, how it is
/// written, and the hooks that normalise payloads before they are sent.
pub trait Entity: Clone + Debug + Send + Sync + DeserializeOwned + 'static {
    type Draft: Serialize + Debug + Send + Sync + 'static;
    type Patch: Serialize + Debug + Send + Sync + 'static;

    /// Name used in logs.
    const RESOURCE: &'static str;
    /// Collection path, e.g. `/api/products`.
    const PATH: &'static str;
    const UPDATE_METHOD: HttpMethod = HttpMethod::Put;
    /// Send the bearer token with every call.
    const REQUIRES_AUTH: bool = false;

    /// Server-assigned identifier; `None` until persisted.
    fn id(&self) -> Option<&str>;

    // --- Lifecycle Hooks ---

    fn on_create(draft: Self::Draft) -> Result<Self::Draft, StoreError> {
        Ok(draft)
    }

    fn on_update(patch: Self::Patch) -> Result<Self::Patch, StoreError> {
        Ok(patch)
    }
}

/// Kinds the API lets the dashboard delete.
pub trait Deletable: Entity {}

/// Published state of one store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub refetch_toggle: bool,
}

impl<T> Default for StoreSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            refetch_toggle: false,
        }
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Load {
        respond_to: Option<Response<usize>>,
    },
    Refetch {
        respond_to: Option<Response<usize>>,
    },
    Create {
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Update {
        id: String,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Remove {
        id: String,
        respond_to: Response<()>,
    },
    Apply {
        patch: CollectionPatch<T>,
        respond_to: Response<bool>,
    },
}

/// Finished network work, handed back to the actor that spawned it.
enum Completion<T: Entity> {
    Loaded {
        result: ApiResult<Vec<T>>,
        respond_to: Option<Response<usize>>,
    },
    Created {
        result: ApiResult<T>,
        respond_to: Response<T>,
    },
    Updated {
        id: String,
        result: ApiResult<T>,
        respond_to: Response<T>,
    },
    Removed {
        id: String,
        result: ApiResult<()>,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns one cached collection. It is the only writer of that collection;
/// network calls run in spawned tasks and report back through `completions`,
/// so snapshots stay readable while requests are in flight.
pub struct ResourceStore<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    completions_tx: mpsc::UnboundedSender<Completion<T>>,
    completions: mpsc::UnboundedReceiver<Completion<T>>,
    service: ResourceService<T>,
    state: watch::Sender<StoreSnapshot<T>>,
    pending_loads: usize,
    in_flight: usize,
}

impl<T: Entity> ResourceStore<T> {
    pub fn new(buffer_size: usize, service: ResourceService<T>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completions_tx, completions) = mpsc::unbounded_channel();
        // `run` always starts with a load.
        let (state, state_rx) = watch::channel(StoreSnapshot {
            loading: true,
            ..StoreSnapshot::default()
        });

        let store = Self {
            receiver,
            completions_tx,
            completions,
            service,
            state,
            pending_loads: 0,
            in_flight: 0,
        };
        (store, ResourceClient::new(sender, state_rx))
    }

    #[instrument(name = "resource_store", skip(self), fields(resource = T::RESOURCE))]
    pub async fn run(mut self) {
        info!("Store starting");
        self.start_load(None);

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => break,
                },
                Some(done) = self.completions.recv() => self.complete(done),
            }
        }

        // Clients are gone; let outstanding calls land before stopping.
        while self.in_flight > 0 {
            match self.completions.recv().await {
                Some(done) => self.complete(done),
                None => break,
            }
        }
        info!("Store stopped");
    }

    fn handle(&mut self, msg: ResourceRequest<T>) {
        match msg {
            ResourceRequest::Load { respond_to } => self.start_load(respond_to),
            ResourceRequest::Refetch { respond_to } => {
                self.state.send_modify(|s| s.refetch_toggle = !s.refetch_toggle);
                debug!(toggle = self.state.borrow().refetch_toggle, "Refetch triggered");
                self.start_load(respond_to);
            }
            ResourceRequest::Create { draft, respond_to } => match T::on_create(draft) {
                Ok(draft) => {
                    let service = self.service.clone();
                    self.spawn(async move {
                        let result = service.create(&draft).await;
                        Completion::Created { result, respond_to }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Create rejected before sending");
                    let _ = respond_to.send(Err(e));
                }
            },
            ResourceRequest::Update { id, patch, respond_to } => match T::on_update(patch) {
                Ok(patch) => {
                    let service = self.service.clone();
                    self.spawn(async move {
                        let result = service.update(&id, &patch).await;
                        Completion::Updated { id, result, respond_to }
                    });
                }
                Err(e) => {
                    warn!(%id, error = %e, "Update rejected before sending");
                    let _ = respond_to.send(Err(e));
                }
            },
            ResourceRequest::Remove { id, respond_to } => {
                let service = self.service.clone();
                self.spawn(async move {
                    let result = service.delete_unchecked(&id).await;
                    Completion::Removed { id, result, respond_to }
                });
            }
            ResourceRequest::Apply { patch, respond_to } => {
                let applied = self.patch(patch);
                let _ = respond_to.send(Ok(applied));
            }
        }
    }

    fn start_load(&mut self, respond_to: Option<Response<usize>>) {
        self.pending_loads += 1;
        self.state.send_modify(|s| s.loading = true);

        let service = self.service.clone();
        self.spawn(async move {
            let result = service.list().await;
            Completion::Loaded { result, respond_to }
        });
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: std::future::Future<Output = Completion<T>> + Send + 'static,
    {
        self.in_flight += 1;
        let completions = self.completions_tx.clone();
        tokio::spawn(
            async move {
                let done = work.await;
                let _ = completions.send(done);
            }
            .in_current_span(),
        );
    }

    fn complete(&mut self, done: Completion<T>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match done {
            Completion::Loaded { result, respond_to } => {
                self.pending_loads = self.pending_loads.saturating_sub(1);
                let still_loading = self.pending_loads > 0;
                let reply = match result {
                    Ok(items) => {
                        let count = items.len();
                        self.state.send_modify(|s| {
                            s.items = items;
                            s.loading = still_loading;
                        });
                        info!(count, "Collection loaded");
                        Ok(count)
                    }
                    Err(e) => {
                        error!(error = %e, "Error fetching collection");
                        self.state.send_modify(|s| s.loading = still_loading);
                        Err(StoreError::from(e))
                    }
                };
                if let Some(respond_to) = respond_to {
                    let _ = respond_to.send(reply);
                }
            }
            Completion::Created { result, respond_to } => {
                let reply = result.map_err(StoreError::from).map(|item| {
                    self.patch(CollectionPatch::Created(item.clone()));
                    item
                });
                if let Err(e) = &reply {
                    error!(error = %e, "Create failed");
                }
                let _ = respond_to.send(reply);
            }
            Completion::Updated { id, result, respond_to } => {
                let reply = result.map_err(StoreError::from).map(|item| {
                    self.patch(CollectionPatch::Updated { id: id.clone(), item: item.clone() });
                    item
                });
                if let Err(e) = &reply {
                    error!(%id, error = %e, "Update failed");
                }
                let _ = respond_to.send(reply);
            }
            Completion::Removed { id, result, respond_to } => {
                let reply = result.map_err(StoreError::from).map(|()| {
                    self.patch(CollectionPatch::Removed(id.clone()));
                });
                if let Err(e) = &reply {
                    error!(%id, error = %e, "Delete failed");
                }
                let _ = respond_to.send(reply);
            }
        }
    }

    fn patch(&mut self, patch: CollectionPatch<T>) -> bool {
        let mut applied = false;
        self.state.send_modify(|s| applied = apply_patch(&mut s.items, patch));
        applied
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    state: watch::Receiver<StoreSnapshot<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>, state: watch::Receiver<StoreSnapshot<T>>) -> Self {
        Self { sender, state }
    }

    async fn call<R>(&self, make: impl FnOnce(Response<R>) -> ResourceRequest<T>) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor dropped".to_string()))?
    }

    /// Reloads the collection and returns how many items came back. On failure
    /// the cached collection is left as it was.
    pub async fn load(&self) -> Result<usize, StoreError> {
        self.call(|tx| ResourceRequest::Load { respond_to: Some(tx) }).await
    }

    /// Flips the refetch toggle and waits for the reload it causes.
    pub async fn refetch(&self) -> Result<usize, StoreError> {
        self.call(|tx| ResourceRequest::Refetch { respond_to: Some(tx) }).await
    }

    /// Flips the refetch toggle without waiting for the result.
    pub async fn trigger_refetch(&self) -> Result<(), StoreError> {
        self.sender
            .send(ResourceRequest::Refetch { respond_to: None })
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor closed".to_string()))
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, StoreError> {
        self.call(|respond_to| ResourceRequest::Create { draft, respond_to }).await
    }

    pub async fn update(&self, id: String, patch: T::Patch) -> Result<T, StoreError> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    /// Applies a patch obtained outside the store, e.g. from a direct service call.
    pub async fn apply(&self, patch: CollectionPatch<T>) -> Result<bool, StoreError> {
        self.call(|respond_to| ResourceRequest::Apply { patch, respond_to }).await
    }

    pub fn snapshot(&self) -> StoreSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn items(&self) -> Vec<T> {
        self.state.borrow().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.state
            .borrow()
            .items
            .iter()
            .find(|item| item.id() == Some(id))
            .cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreSnapshot<T>> {
        self.state.clone()
    }

    /// Waits until no load is in flight and returns that state.
    pub async fn settled(&self) -> Result<StoreSnapshot<T>, StoreError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|s| !s.loading)
            .await
            .map_err(|_| StoreError::ActorCommunicationError("Actor dropped".to_string()))?;
        Ok(snapshot.clone())
    }
}

impl<T: Deletable> ResourceClient<T> {
    pub async fn remove(&self, id: String) -> Result<(), StoreError> {
        self.call(|respond_to| ResourceRequest::Remove { id, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductDraft, Testimonial, TestimonialDraft};
    use crate::error::TransportError;
    use crate::mock_framework::{envelope, in_turn, MockTransport};
    use crate::transport::{ApiRequest, HttpMethod};
    use serde_json::json;
    use std::sync::Arc;

    fn is_list(path: &'static str) -> impl Fn(&ApiRequest) -> bool {
        move |req| req.method == HttpMethod::Get && req.path == path
    }

    fn start<T: Entity>(transport: MockTransport) -> ResourceClient<T> {
        let service = ResourceService::new(Arc::new(transport));
        let (store, client) = ResourceStore::<T>::new(8, service);
        tokio::spawn(store.run());
        client
    }

    #[tokio::test]
    async fn test_initial_load_replaces_collection() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(is_list("/api/products"))
            .times(1)
            .returning(|_| envelope(json!([{"_id": "p1", "name": "A", "price": 1.0}, {"_id": "p2", "name": "B", "price": 2.0}])));

        let client = start::<Product>(transport);
        let snapshot = client.settled().await.unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert!(!snapshot.loading);
        assert!(!snapshot.refetch_toggle);
        assert_eq!(client.get("p2").unwrap().name, "B");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_items() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(2).returning(in_turn(vec![
            envelope(json!([{"_id": "p1", "name": "A", "price": 1.0}])),
            Err(TransportError::Network("connection refused".into())),
        ]));

        let client = start::<Product>(transport);
        client.settled().await.unwrap();

        let err = client.load().await.unwrap_err();
        assert_eq!(err, StoreError::Transport(TransportError::Network("connection refused".into())));
        let snapshot = client.snapshot();
        assert_eq!(snapshot.items.len(), 1);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_refetch_flips_toggle_and_replaces() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(2).returning(in_turn(vec![
            envelope(json!([{"_id": "p1", "name": "A", "price": 1.0}, {"_id": "p2", "name": "B", "price": 1.0}])),
            envelope(json!([{"_id": "p3", "name": "C", "price": 1.0}])),
        ]));

        let client = start::<Product>(transport);
        assert_eq!(client.settled().await.unwrap().items.len(), 2);

        assert_eq!(client.refetch().await.unwrap(), 1);
        let snapshot = client.snapshot();
        assert!(snapshot.refetch_toggle);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id.as_deref(), Some("p3"));
    }

    #[tokio::test]
    async fn test_loading_until_first_list_arrives() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(1).returning(|_| envelope(json!(null)));

        let service = ResourceService::new(Arc::new(transport));
        let (store, client) = ResourceStore::<Product>::new(8, service);
        assert!(client.is_loading());
        assert!(client.items().is_empty());

        tokio::spawn(store.run());
        let snapshot = client.settled().await.unwrap();
        assert!(!snapshot.loading);
        assert!(snapshot.items.is_empty());
    }

    #[tokio::test]
    async fn test_create_hook_rejection_skips_network() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(is_list("/api/ratings"))
            .times(1)
            .returning(|_| envelope(json!([])));

        let client = start::<Testimonial>(transport);
        client.settled().await.unwrap();

        let err = client.create(TestimonialDraft::new("Asha", 9)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(client.items().is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_collection() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(2).returning(in_turn(vec![
            envelope(json!([{"_id": "p1", "name": "A", "price": 1.0}])),
            Err(TransportError::api(500, "db down")),
        ]));

        let client = start::<Product>(transport);
        client.settled().await.unwrap();

        assert!(client.create(ProductDraft::new("B", 2.0)).await.is_err());
        assert_eq!(client.items().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_external_patch() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| envelope(json!([{"_id": "p1", "name": "A", "price": 1.0}, {"_id": "p2", "name": "B", "price": 1.0}])));

        let client = start::<Product>(transport);
        client.settled().await.unwrap();

        assert!(client.apply(CollectionPatch::Removed("p1".into())).await.unwrap());
        assert!(!client.apply(CollectionPatch::Removed("p1".into())).await.unwrap());
        assert_eq!(client.items().len(), 1);
        assert!(client.get("p1").is_none());
    }

    #[tokio::test]
    async fn test_store_stops_when_clients_drop() {
        let mut transport = MockTransport::new();
        transport.expect_send().returning(|_| envelope(json!([])));

        let service = ResourceService::new(Arc::new(transport));
        let (store, client) = ResourceStore::<Product>::new(8, service);
        let handle = tokio::spawn(store.run());
        client.settled().await.unwrap();

        drop(client);
        handle.await.unwrap();
    }
}
