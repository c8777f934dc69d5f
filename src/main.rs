mod app_system;
mod bridge;
mod clients;
mod domain;
mod order_store;
mod persistence;
mod product_store;
mod store_framework;
mod telemetry;

#[cfg(test)]
mod mock_framework;

use std::sync::Arc;

use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, SellmateApp};
use crate::bridge::{BridgeError, MemoryDocumentBridge};
use crate::clients::ProfileClient;
use crate::domain::{Profile, ProfilePatch};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting Sellmate");

    let storage_root = dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("sellmate");
    let app = SellmateApp::new(storage_root);

    let span = tracing::info_span!("order_history");
    let orders = async {
        info!("Loading order history");
        app.order_client
            .list_orders()
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(order_count = orders.len(), "Order history loaded");
    for order in &orders {
        info!(
            order_number = %order.order_number,
            status = %order.status,
            total = order.total,
            "Order"
        );
    }

    // Buyer flow: publishing a product synthesizes one pending order for it.
    let span = tracing::info_span!("checkout");
    let receipt = async {
        info!("Publishing a product");
        app.checkout_client
            .add_product("Mechanical Keyboard", "Hot-swappable 75% board", "2499.00")
            .await
    }
    .instrument(span)
    .await;

    match receipt {
        Ok(receipt) => {
            info!(order_number = %receipt.order_number, "Product published and order recorded")
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    let products = app
        .product_client
        .list_products()
        .await
        .map_err(|e| e.to_string())?;
    info!(product_count = products.len(), "Catalog loaded");

    // Profile round-trip over the in-memory stand-in for the remote
    // document service.
    let profile_client = ProfileClient::new(Arc::new(MemoryDocumentBridge::default()));
    let span = tracing::info_span!("profile");
    async {
        let profile = Profile {
            display_name: Some("Alice Reyes".to_string()),
            shipping_address: Some("14 Mabini St, Quezon City".to_string()),
            expertise: Some("electronics".to_string()),
            phone: Some("+63 917 555 0100".to_string()),
        };
        profile_client.save_profile("user_1", &profile).await?;

        profile_client
            .update_profile(
                "user_1",
                ProfilePatch {
                    phone: Some("+63 917 555 0199".to_string()),
                    ..Default::default()
                },
            )
            .await?;

        let middlemen = profile_client.find_by_expertise("electronics").await?;
        info!(middleman_count = middlemen.len(), "Middleman directory loaded");
        Ok::<(), BridgeError>(())
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // Shutdown the stores gracefully
    app.shutdown().await.map_err(|e| e.to_string())?;

    info!("Sellmate stopped cleanly");
    Ok(())
}
