/// Generates the named CRUD surface of a store client wrapping
/// `inner: ResourceClient<$entity>`.
#[macro_export]
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $singular:ident, $plural:ident) => {
        paste::paste! {
            impl $client_name {
                pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                    Self { inner }
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<load_ $plural>](&self) -> Result<usize, $crate::error::StoreError> {
                    tracing::debug!("Sending request");
                    self.inner.load().await
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<refetch_ $plural>](&self) -> Result<usize, $crate::error::StoreError> {
                    tracing::debug!("Sending request");
                    self.inner.refetch().await
                }

                /// Flips the refetch toggle; the reload lands in later snapshots.
                pub async fn [<trigger_ $plural _refetch>](&self) -> Result<(), $crate::error::StoreError> {
                    self.inner.trigger_refetch().await
                }

                #[tracing::instrument(skip(self, draft))]
                pub async fn [<create_ $singular>](
                    &self,
                    draft: <$entity as $crate::actor_framework::Entity>::Draft,
                ) -> Result<$entity, $crate::error::StoreError> {
                    tracing::debug!("Sending request");
                    self.inner.create(draft).await
                }

                #[tracing::instrument(skip(self, patch))]
                pub async fn [<update_ $singular>](
                    &self,
                    id: String,
                    patch: <$entity as $crate::actor_framework::Entity>::Patch,
                ) -> Result<$entity, $crate::error::StoreError> {
                    tracing::debug!("Sending request");
                    self.inner.update(id, patch).await
                }

                pub async fn apply(
                    &self,
                    patch: $crate::patch::CollectionPatch<$entity>,
                ) -> Result<bool, $crate::error::StoreError> {
                    self.inner.apply(patch).await
                }

                pub fn [<get_ $singular>](&self, id: &str) -> Option<$entity> {
                    self.inner.get(id)
                }

                pub fn $plural(&self) -> Vec<$entity> {
                    self.inner.items()
                }

                pub fn is_loading(&self) -> bool {
                    self.inner.is_loading()
                }

                pub fn snapshot(&self) -> $crate::actor_framework::StoreSnapshot<$entity> {
                    self.inner.snapshot()
                }

                pub fn subscribe(&self) -> tokio::sync::watch::Receiver<$crate::actor_framework::StoreSnapshot<$entity>> {
                    self.inner.subscribe()
                }

                pub async fn settled(&self) -> Result<$crate::actor_framework::StoreSnapshot<$entity>, $crate::error::StoreError> {
                    self.inner.settled().await
                }
            }
        }
    };
}

/// Adds `delete_<singular>` for kinds the API can delete.
#[macro_export]
macro_rules! impl_client_delete {
    ($client_name:ident, $singular:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<delete_ $singular>](&self, id: String) -> Result<(), $crate::error::StoreError> {
                    tracing::debug!("Sending request");
                    self.inner.remove(id).await
                }
            }
        }
    };
}
