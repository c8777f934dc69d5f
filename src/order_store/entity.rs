use crate::domain::{Order, OrderDraft, OrderStatus};
use crate::store_framework::{InsertOrder, StoreEntity, StoreError};

impl StoreEntity for Order {
    type Id = String;
    type Draft = OrderDraft;

    const STORAGE_KEY: &'static str = "orders";
    // New orders show up at the top of the history.
    const INSERT_ORDER: InsertOrder = InsertOrder::Prepend;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_draft(draft: OrderDraft) -> Result<Self, StoreError> {
        if !draft.total.is_finite() || draft.total < 0.0 {
            return Err(StoreError::Validation(format!(
                "order total must be a non-negative amount, got {}",
                draft.total
            )));
        }
        if draft.items == 0 {
            return Err(StoreError::Validation(
                "order must contain at least one item".to_string(),
            ));
        }
        Ok(Self {
            id: draft.id,
            order_number: draft.order_number,
            date: draft.date,
            status: draft.status,
            total: draft.total,
            items: draft.items,
            product_name: draft.product_name,
        })
    }

    /// First-run order history shown to a fresh profile.
    fn seed() -> Vec<Self> {
        vec![
            Order {
                id: "1".to_string(),
                order_number: "ORDER-12345".to_string(),
                date: "2025-05-02".to_string(),
                status: OrderStatus::Delivered,
                total: 8399.44,
                items: 2,
                product_name: None,
            },
            Order {
                id: "2".to_string(),
                order_number: "ORDER-12346".to_string(),
                date: "2025-05-28".to_string(),
                status: OrderStatus::Pending,
                total: 4479.44,
                items: 1,
                product_name: None,
            },
            Order {
                id: "3".to_string(),
                order_number: "ORDER-12347".to_string(),
                date: "2025-06-11".to_string(),
                status: OrderStatus::Pending,
                total: 16799.44,
                items: 3,
                product_name: None,
            },
        ]
    }
}
