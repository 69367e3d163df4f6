use crate::actor_framework::{Deletable, Entity};
use crate::domain::{Product, ProductDraft};
use crate::error::StoreError;

impl Entity for Product {
    type Draft = ProductDraft;
    type Patch = ProductDraft;

    const RESOURCE: &'static str = "product";
    const PATH: &'static str = "/api/products";

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn on_create(draft: ProductDraft) -> Result<ProductDraft, StoreError> {
        prepare(draft)
    }

    /// Updates replace the whole product, so they get the same treatment.
    fn on_update(patch: ProductDraft) -> Result<ProductDraft, StoreError> {
        prepare(patch)
    }
}

impl Deletable for Product {}

fn prepare(mut draft: ProductDraft) -> Result<ProductDraft, StoreError> {
    if draft.name.trim().is_empty() {
        return Err(StoreError::Validation("Product name is required".to_string()));
    }
    draft.image_urls = draft
        .image_urls
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    draft.refresh_discount();
    Ok(draft)
}
