use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::Product;
use crate::error::StoreError;

/// Client for the product store.
#[derive(Clone)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl_client_methods!(ProductClient, Product, product, products);
impl_client_delete!(ProductClient, product);

impl ProductClient {
    /// Changes the offer of a cached product; the discounted price is
    /// recomputed before the update goes out.
    #[instrument(skip(self))]
    pub async fn set_offer(&self, id: String, offer: f64) -> Result<Product, StoreError> {
        debug!("Sending request");
        let product = self
            .inner
            .get(&id)
            .ok_or_else(|| StoreError::Validation(format!("Product {id} is not loaded")))?;
        self.inner.update(id, product.to_draft().with_offer(offer)).await
    }

    pub fn in_category(&self, category: &str) -> Vec<Product> {
        self.inner
            .items()
            .into_iter()
            .filter(|p| p.category.eq_ignore_ascii_case(category))
            .collect()
    }
}
