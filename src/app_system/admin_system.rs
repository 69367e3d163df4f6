use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::actor_framework::{Entity, ResourceClient, ResourceStore};
use crate::clients::{BlogClient, OrderClient, ProductClient, TestimonialClient};
use crate::config::AppConfig;
use crate::domain::{Blog, Order, Product, Testimonial};
use crate::error::{ApiResult, StoreError};
use crate::services::{AuthService, ResourceService};
use crate::transport::{HttpTransport, Navigator, TokenStore, Transport};

/// The dashboard's data layer: one store per resource over a shared transport.
///
/// Responsible for starting the stores, handing out their clients, and
/// waiting for them on shutdown.
pub struct AdminSystem {
    pub products: ProductClient,
    pub blogs: BlogClient,
    pub testimonials: TestimonialClient,
    pub orders: OrderClient,
    pub auth: AuthService,
    handles: Vec<JoinHandle<()>>,
}

impl AdminSystem {
    /// Builds the HTTP transport from `config` and starts every store.
    pub fn new(config: &AppConfig, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> ApiResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config, Arc::clone(&tokens), navigator)?);
        Ok(Self::with_transport(transport, tokens, config.store_buffer))
    }

    /// Starts every store over an existing transport. Each store begins its
    /// initial load immediately.
    pub fn with_transport(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>, buffer_size: usize) -> Self {
        let mut handles = Vec::with_capacity(4);

        let products = ProductClient::new(spawn_store::<Product>(&transport, buffer_size, &mut handles));
        let blogs = BlogClient::new(spawn_store::<Blog>(&transport, buffer_size, &mut handles));
        let testimonials = TestimonialClient::new(spawn_store::<Testimonial>(&transport, buffer_size, &mut handles));
        let orders = OrderClient::new(spawn_store::<Order>(&transport, buffer_size, &mut handles));
        let auth = AuthService::new(transport, tokens);

        info!(stores = handles.len(), "Admin system started");
        Self {
            products,
            blogs,
            testimonials,
            orders,
            auth,
            handles,
        }
    }

    /// Waits until no store has a load in flight.
    pub async fn settled(&self) -> Result<(), StoreError> {
        tokio::try_join!(
            self.products.settled(),
            self.blogs.settled(),
            self.testimonials.settled(),
            self.orders.settled(),
        )?;
        Ok(())
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        // Stores stop once every client handle is gone.
        drop(self.products);
        drop(self.blogs);
        drop(self.testimonials);
        drop(self.orders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Store task failed: {:?}", e);
                return Err(format!("Store task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

fn spawn_store<T: Entity>(
    transport: &Arc<dyn Transport>,
    buffer_size: usize,
    handles: &mut Vec<JoinHandle<()>>,
) -> ResourceClient<T> {
    let service = ResourceService::<T>::new(Arc::clone(transport));
    let (store, client) = ResourceStore::<T>::new(buffer_size, service);
    handles.push(tokio::spawn(store.run()));
    client
}
