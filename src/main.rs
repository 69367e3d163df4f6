use std::sync::Arc;

use tracing::{error, info, warn, Instrument};

use admin_sync::app_system::{setup_tracing, AdminSystem};
use admin_sync::config::AppConfig;
use admin_sync::display::format_amount;
use admin_sync::transport::{FileTokenStore, InMemoryNavigator, MemoryTokenStore, TokenStore, ROOT_PATH};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(api = %config.api_base_url, "Starting admin data layer");

    let tokens: Arc<dyn TokenStore> = match &config.token_file {
        Some(path) => Arc::new(FileTokenStore::new(path.clone())),
        None => Arc::new(MemoryTokenStore::new()),
    };
    if tokens.token().is_none() {
        warn!("No admin token found, order endpoints will be refused");
    }
    let navigator = Arc::new(InMemoryNavigator::new(ROOT_PATH));

    let system = AdminSystem::new(&config, tokens, navigator).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("initial_load");
    let loaded = async {
        info!("Waiting for every store to load");
        system.settled().await
    }
    .instrument(span)
    .await;
    if let Err(e) = loaded {
        error!(error = %e, "Initial load did not complete");
    }

    info!(
        products = system.products.products().len(),
        blogs = system.blogs.blogs().len(),
        testimonials = system.testimonials.testimonials().len(),
        orders = system.orders.orders().len(),
        paid = %format_amount(system.orders.paid_total()),
        "Stores loaded"
    );

    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
