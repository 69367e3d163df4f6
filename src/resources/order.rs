use crate::actor_framework::Entity;
use crate::domain::{Order, OrderDraft, OrderPatch};
use crate::error::StoreError;

impl Entity for Order {
    type Draft = OrderDraft;
    type Patch = OrderPatch;

    const RESOURCE: &'static str = "order";
    const PATH: &'static str = "/api/orders";
    const REQUIRES_AUTH: bool = true;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn on_update(patch: OrderPatch) -> Result<OrderPatch, StoreError> {
        if patch.is_empty() {
            return Err(StoreError::Validation("Nothing to update on order".to_string()));
        }
        Ok(patch)
    }
}
