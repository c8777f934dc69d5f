use std::path::PathBuf;

use crate::app_system::scope::{ScopeError, StoreScope};
use crate::clients::{CheckoutClient, OrderClient, ProductClient};
use crate::domain::{Order, Product};
use crate::persistence::FileSnapshotStore;

const STORE_BUFFER: usize = 32;

/// Root composition: the order and product stores are each provided exactly
/// once here, wrapping the whole application, so there is one store instance
/// per entity type per app.
pub struct SellmateApp {
    pub order_client: OrderClient,
    pub product_client: ProductClient,
    pub checkout_client: CheckoutClient,
    scope: StoreScope,
}

impl SellmateApp {
    /// `storage_root` holds one snapshot file per store key.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        let storage_root = storage_root.into();
        let mut scope = StoreScope::root();

        let orders = scope.provide::<Order>(
            STORE_BUFFER,
            Box::new(FileSnapshotStore::new(storage_root.clone())),
        );
        let products = scope.provide::<Product>(
            STORE_BUFFER,
            Box::new(FileSnapshotStore::new(storage_root)),
        );

        let order_client = OrderClient::new(orders);
        let product_client = ProductClient::new(products);
        let checkout_client = CheckoutClient::new(product_client.clone(), order_client.clone());

        Self {
            order_client,
            product_client,
            checkout_client,
            scope,
        }
    }

    pub async fn shutdown(self) -> Result<(), ScopeError> {
        let Self {
            order_client,
            product_client,
            checkout_client,
            scope,
        } = self;

        // Drop every client handle so the store mailboxes close.
        drop(order_client);
        drop(product_client);
        drop(checkout_client);

        scope.shutdown().await
    }
}
