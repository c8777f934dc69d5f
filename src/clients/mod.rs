//! Typed clients over the generic store handles.
//!
//! Each client narrows [`StoreClient`]'s surface to its domain vocabulary
//! and maps framework errors into the domain's error enum.

use tracing::{debug, instrument};

use crate::domain::{Order, OrderDraft, Product, ProductDraft};
use crate::order_store::OrderError;
use crate::product_store::ProductError;
use crate::store_framework::StoreClient;

pub mod checkout_client;
pub mod profile_client;

pub use checkout_client::*;
pub use profile_client::*;

#[derive(Clone)]
pub struct OrderClient {
    inner: StoreClient<Order>,
}

impl OrderClient {
    pub fn new(inner: StoreClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft))]
    pub async fn add_order(&self, draft: OrderDraft) -> Result<String, OrderError> {
        debug!("Sending request");
        self.inner.add(draft).await.map_err(OrderError::from)
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderError> {
        debug!("Sending request");
        self.inner.list().await.map_err(OrderError::from)
    }
}

#[derive(Clone)]
pub struct ProductClient {
    inner: StoreClient<Product>,
}

impl ProductClient {
    pub fn new(inner: StoreClient<Product>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft))]
    pub async fn add_product(&self, draft: ProductDraft) -> Result<String, ProductError> {
        debug!("Sending request");
        self.inner.add(draft).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.inner.list().await.map_err(ProductError::from)
    }
}
