use tracing::{info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Order, OrderPatch, OrderStatus, PaymentStatus};
use crate::error::StoreError;

/// Client for the order store. Orders are never deleted from the dashboard;
/// only their status and payment status change.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl_client_methods!(OrderClient, Order, order, orders);

impl OrderClient {
    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: String, status: OrderStatus) -> Result<Order, StoreError> {
        info!("Updating order status");
        self.inner.update(id, OrderPatch::status(status)).await
    }

    #[instrument(skip(self))]
    pub async fn update_payment_status(&self, id: String, payment_status: PaymentStatus) -> Result<Order, StoreError> {
        info!("Updating payment status");
        self.inner.update(id, OrderPatch::payment_status(payment_status)).await
    }

    pub fn with_status(&self, status: OrderStatus) -> Vec<Order> {
        self.inner
            .items()
            .into_iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Sum of amounts over paid orders in the cache.
    pub fn paid_total(&self) -> f64 {
        self.inner
            .items()
            .iter()
            .filter(|order| order.payment_status == PaymentStatus::Paid)
            .map(|order| order.amount)
            .sum()
    }
}
