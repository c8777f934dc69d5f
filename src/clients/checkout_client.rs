use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::clients::{OrderClient, ProductClient};
use crate::domain::{parse_price, OrderDraft, OrderStatus, ProductDraft};
use crate::order_store::OrderError;
use crate::telemetry::track_event;

/// The buyer-facing "add product" flow.
///
/// Publishes the product to the catalog, then synthesizes exactly one
/// pending order for it, carrying the product name as a denormalized copy.
#[derive(Clone)]
pub struct CheckoutClient {
    product_client: ProductClient,
    order_client: OrderClient,
}

/// Identifiers produced by one checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    pub product_id: String,
    pub order_id: String,
    pub order_number: String,
}

impl CheckoutClient {
    pub fn new(product_client: ProductClient, order_client: OrderClient) -> Self {
        Self {
            product_client,
            order_client,
        }
    }

    #[instrument(skip(self, description, price), fields(product_name = %name))]
    pub async fn add_product(
        &self,
        name: &str,
        description: &str,
        price: &str,
    ) -> Result<CheckoutReceipt, OrderError> {
        info!("Processing add_product checkout");

        // Validate the price up front so the order synthesis below cannot
        // fail after the product is already in the catalog.
        let total = parse_price(price).map_err(OrderError::ValidationError)?;

        let stamp = unix_millis();

        // Step 1: publish the product (appended to the catalog)
        let product_draft = ProductDraft {
            id: stamp.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: price.to_string(),
        };
        let product_id = match self.product_client.add_product(product_draft).await {
            Ok(id) => {
                info!(product_id = %id, "Product published");
                id
            }
            Err(e) => {
                error!(error = %e, "Product submission failed");
                return Err(OrderError::InvalidProduct(e.to_string()));
            }
        };

        // Step 2: record one order for it (prepended to the history)
        let order_draft = OrderDraft {
            id: stamp.to_string(),
            order_number: format!("ORDER-{stamp}"),
            date: Utc::now().format("%Y-%m-%d").to_string(),
            status: OrderStatus::Pending,
            total,
            items: 1,
            product_name: Some(name.to_string()),
        };
        let order_number = order_draft.order_number.clone();
        let order_id = self.order_client.add_order(order_draft).await?;
        info!(order_id = %order_id, order_number = %order_number, "Order recorded");

        track_event(
            "product_added",
            &[
                ("product_id", product_id.as_str()),
                ("order_id", order_id.as_str()),
            ],
        );

        Ok(CheckoutReceipt {
            product_id,
            order_id,
            order_number,
        })
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
